//! Report dispatcher - the single consumer of the event aggregator.
//!
//! One `dispatch_next` call is one wake/snapshot/submit cycle; the embedded
//! USB task loops over it forever, logging and discarding failures. Reports
//! are fire-and-forget: a missed HID report shows up as a momentarily
//! sticky cursor, which is preferable to ever blocking the loop.

use crate::error::Error;
use crate::mouse::aggregator::EventAggregator;
use crate::mouse::report::MOUSE_REPORT_SIZE;

/// Outbound transport for finished reports.
///
/// The embedded implementation writes the USB HID interrupt endpoint; host
/// tests substitute a recorder.
#[allow(async_fn_in_trait)]
pub trait ReportSink {
    async fn submit(&mut self, report: &[u8; MOUSE_REPORT_SIZE]) -> Result<(), Error>;
}

/// Wait for the aggregator to become dirty, then snapshot-and-clear it and
/// submit one report.
///
/// The snapshot happens before the submit attempt, so a failed submit does
/// not leave the motion queued for a retry - that displacement is simply
/// lost, while button level state survives in the aggregator.
pub async fn dispatch_next<S: ReportSink>(
    aggregator: &EventAggregator,
    sink: &mut S,
) -> Result<(), Error> {
    aggregator.wait_dirty().await;
    let report = aggregator.take_report();
    sink.submit(&report.to_bytes()).await
}
