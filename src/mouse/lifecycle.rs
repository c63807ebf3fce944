//! Connection-session lifecycle hook.
//!
//! The integrator tick only runs while a BLE central is connected. The
//! embedded layer calls [`begin_session`] right after a connection is
//! established and drives the returned integrator from its tick task; when
//! the connection drops, the tick future is dropped with it, which halts
//! the tick source synchronously - no `on_move` can fire afterwards, and a
//! repeated disconnect has nothing left to stop.

use crate::mouse::aggregator::EventAggregator;
use crate::mouse::integrator::VelocityIntegrator;

/// Start a pointer session for a freshly established connection.
///
/// Clears any velocity left over from the previous session and returns a
/// zeroed integrator, so stale motion can never leak into the new link.
/// The pending report is deliberately untouched: button state is owned by
/// whoever writes it next.
pub fn begin_session(aggregator: &EventAggregator) -> VelocityIntegrator {
    aggregator.reset_velocity();
    VelocityIntegrator::new()
}
