//! Event aggregator - the shared pending-report state and its dirty signal.
//!
//! Producers (GATT event context, integrator tick) merge events in through
//! [`InputSink`]; the single dispatcher task blocks on [`EventAggregator::wait_dirty`]
//! and drains the state with [`EventAggregator::take_report`].
//!
//! All mutable state sits behind one `CriticalSectionRawMutex` domain, so
//! every entry point is safe from interrupt-priority contexts and the
//! dispatcher can never observe a torn `(dx, dy)` pair. The dirty signal is
//! a capacity-1 notification: any number of dirtying calls before the
//! consumer wakes collapse into a single wake-up.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;

use crate::mouse::report::{MouseReport, BUTTON_MASK};

/// Inbound event surface offered to the transport layer.
///
/// The transport (or a timer tick standing in for one) calls these from any
/// producer context; payloads are assumed well-formed fixed-width values,
/// length checking happens at the transport boundary.
pub trait InputSink {
    /// Discrete relative movement in pixels.
    fn on_move(&self, distx: i8, disty: i8);

    /// New velocity, in 1/256 pixel per tick per axis. Takes effect on
    /// subsequent integrator ticks; does not itself produce a report.
    fn on_velocity(&self, vx: i16, vy: i16);

    /// Button level state; only the low 3 bits are significant.
    fn on_buttons(&self, buttons: u8);
}

/// Everything a producer can have pending for the next report, plus the
/// velocity the integrator tick reads back.
#[derive(Default)]
struct PendingReport {
    buttons: u8,
    dx: i8,
    dy: i8,
    vx: i16,
    vy: i16,
}

/// Shared aggregation state between all producers and the one dispatcher.
///
/// Constructed once and handed around by reference; `const fn new` allows a
/// `static` in the embedded binary and a local in tests.
pub struct EventAggregator {
    pending: Mutex<CriticalSectionRawMutex, RefCell<PendingReport>>,
    dirty: Signal<CriticalSectionRawMutex, ()>,
}

impl EventAggregator {
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(RefCell::new(PendingReport {
                buttons: 0,
                dx: 0,
                dy: 0,
                vx: 0,
                vy: 0,
            })),
            dirty: Signal::new(),
        }
    }

    /// Block until a producer has changed the pending report.
    ///
    /// Unbounded by design: once a connection exists there is always
    /// eventually a next event.
    pub async fn wait_dirty(&self) {
        self.dirty.wait().await;
    }

    /// Snapshot the pending report and clear the motion accumulators.
    ///
    /// `dx`/`dy` are zeroed in the same critical section that reads them,
    /// so a concurrent `on_move` is either fully in this report or fully in
    /// the next - never lost, never double-counted. `buttons` is level
    /// state and survives the snapshot.
    pub fn take_report(&self) -> MouseReport {
        self.pending.lock(|p| {
            let mut p = p.borrow_mut();
            let report = MouseReport {
                buttons: p.buttons,
                dx: p.dx,
                dy: p.dy,
            };
            p.dx = 0;
            p.dy = 0;
            report
        })
    }

    /// Most recently written velocity, for the integrator tick.
    pub fn velocity(&self) -> (i16, i16) {
        self.pending.lock(|p| {
            let p = p.borrow();
            (p.vx, p.vy)
        })
    }

    /// Drop any stored velocity, e.g. when a new connection begins.
    /// Does not touch the pending report and does not signal.
    pub fn reset_velocity(&self) {
        self.pending.lock(|p| {
            let mut p = p.borrow_mut();
            p.vx = 0;
            p.vy = 0;
        });
    }

    /// Consume a pending dirty notification without blocking (test hook).
    #[cfg(test)]
    pub fn try_take_dirty(&self) -> bool {
        self.dirty.try_take().is_some()
    }
}

impl Default for EventAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSink for EventAggregator {
    fn on_move(&self, distx: i8, disty: i8) {
        let changed = self.pending.lock(|p| {
            let mut p = p.borrow_mut();
            // Wrapping is intentional: relative-mouse deltas live in
            // two's-complement modulo-256 space.
            let dx = p.dx.wrapping_add(distx);
            let dy = p.dy.wrapping_add(disty);
            let changed = dx != p.dx || dy != p.dy;
            p.dx = dx;
            p.dy = dy;
            changed
        });
        // Signalling outside the lock keeps the critical section minimal;
        // the signal is idempotent, so the ordering race with a concurrent
        // take_report costs at most one zero-delta report.
        if changed {
            self.dirty.signal(());
        }
    }

    fn on_velocity(&self, vx: i16, vy: i16) {
        self.pending.lock(|p| {
            let mut p = p.borrow_mut();
            p.vx = vx;
            p.vy = vy;
        });
    }

    fn on_buttons(&self, buttons: u8) {
        let state = buttons & BUTTON_MASK;
        let changed = self.pending.lock(|p| {
            let mut p = p.borrow_mut();
            let changed = p.buttons != state;
            p.buttons = state;
            changed
        });
        if changed {
            self.dirty.signal(());
        }
    }
}
