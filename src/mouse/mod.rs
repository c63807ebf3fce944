//! Event aggregation and report-synthesis engine.
//!
//! This is the part of the bridge with actual algorithmic content; the BLE
//! and USB modules are thin plumbing around it.
//!
//! - [`aggregator`] - merges producer events (discrete moves, velocity
//!   updates, button changes) into a single pending report and wakes the
//!   consumer exactly when something changed.
//! - [`integrator`] - turns a continuously-updated velocity into per-tick
//!   pixel deltas without losing sub-pixel motion.
//! - [`report`] - the 4-byte USB HID mouse report and its descriptor.
//! - [`dispatcher`] - the consumer side: wait, snapshot-and-clear, submit.
//! - [`lifecycle`] - per-connection session setup.
//!
//! Everything here is `no_std`, hardware-free, and exercised by the host
//! test suite.

pub mod aggregator;
pub mod dispatcher;
pub mod integrator;
pub mod lifecycle;
pub mod report;

pub use aggregator::{EventAggregator, InputSink};
pub use integrator::VelocityIntegrator;
pub use report::MouseReport;
