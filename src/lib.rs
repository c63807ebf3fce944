//! Host-testable library interface for blemouse.
//!
//! The core engine (event aggregation, velocity integration, report
//! dispatch) is pure `no_std` logic on `embassy-sync` primitives and is
//! fully exercisable on the host: `cargo test`.
//!
//! The embedded binary (`main.rs`, `#![no_std]` + `#![no_main]`) consumes
//! this library with the `embedded` feature enabled, which additionally
//! compiles the SoftDevice GATT server and the embassy-usb HID device.

#![cfg_attr(not(test), no_std)]

pub mod ble;
pub mod config;
pub mod error;
pub mod mouse;
pub mod usb;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use crate::ble::protocol;
    use crate::error::Error;
    use crate::mouse::aggregator::{EventAggregator, InputSink};
    use crate::mouse::dispatcher::{dispatch_next, ReportSink};
    use crate::mouse::integrator::{AxisAccumulator, VelocityIntegrator};
    use crate::mouse::lifecycle::begin_session;
    use crate::mouse::report::{
        MouseReport, BUTTON_LEFT, BUTTON_MASK, BUTTON_MIDDLE, BUTTON_RIGHT, MOUSE_REPORT_SIZE,
    };

    /// `ReportSink` that records submissions, optionally failing them.
    struct RecordingSink {
        sent: Vec<[u8; MOUSE_REPORT_SIZE]>,
        fail: bool,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                sent: Vec::new(),
                fail: false,
            }
        }
    }

    impl ReportSink for RecordingSink {
        async fn submit(&mut self, report: &[u8; MOUSE_REPORT_SIZE]) -> Result<(), Error> {
            if self.fail {
                return Err(Error::Usb);
            }
            self.sent.push(*report);
            Ok(())
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Event Aggregator Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn move_events_accumulate_until_dispatch() {
        let agg = EventAggregator::new();
        agg.on_move(3, -2);
        agg.on_move(4, 1);
        agg.on_move(-1, -1);

        let report = agg.take_report();
        assert_eq!(report, MouseReport {
            buttons: 0,
            dx: 6,
            dy: -2,
        });
    }

    #[test]
    fn move_accumulation_wraps_modulo_256() {
        let agg = EventAggregator::new();
        // 100 + 100 = 200 = -56 in two's complement; wrap is intentional.
        agg.on_move(100, -100);
        agg.on_move(100, -100);

        let report = agg.take_report();
        assert_eq!(report.dx, -56);
        assert_eq!(report.dy, 56);
    }

    #[test]
    fn move_signals_consumer_on_change() {
        let agg = EventAggregator::new();
        agg.on_move(1, 0);
        assert!(agg.try_take_dirty());
    }

    #[test]
    fn zero_move_never_wakes_consumer() {
        let agg = EventAggregator::new();
        agg.on_move(0, 0);
        assert!(!agg.try_take_dirty());
    }

    #[test]
    fn dirty_signal_is_idempotent_while_unconsumed() {
        let agg = EventAggregator::new();
        agg.on_move(1, 1);
        agg.on_move(2, 2);
        agg.on_buttons(BUTTON_LEFT);

        // Three dirtying calls collapse into one pending wake-up.
        assert!(agg.try_take_dirty());
        assert!(!agg.try_take_dirty());

        // The merged state is still intact.
        let report = agg.take_report();
        assert_eq!(report, MouseReport {
            buttons: BUTTON_LEFT,
            dx: 3,
            dy: 3,
        });
    }

    #[test]
    fn dispatch_clears_motion_but_not_buttons() {
        let agg = EventAggregator::new();
        agg.on_buttons(BUTTON_RIGHT);
        agg.on_move(9, -9);
        let first = agg.take_report();
        assert_eq!(first.dx, 9);
        assert_eq!(first.dy, -9);

        // dx/dy read back as zero; button level state survives.
        let second = agg.take_report();
        assert_eq!(second, MouseReport {
            buttons: BUTTON_RIGHT,
            dx: 0,
            dy: 0,
        });
    }

    #[test]
    fn buttons_signal_on_change_only() {
        let agg = EventAggregator::new();
        agg.on_buttons(BUTTON_LEFT | BUTTON_MIDDLE);
        assert!(agg.try_take_dirty());

        // Same value again: no spurious wake-up.
        agg.on_buttons(BUTTON_LEFT | BUTTON_MIDDLE);
        assert!(!agg.try_take_dirty());

        agg.on_buttons(0);
        assert!(agg.try_take_dirty());
    }

    #[test]
    fn buttons_are_masked_to_three_bits() {
        let agg = EventAggregator::new();
        agg.on_buttons(0xFF);
        assert_eq!(agg.take_report().buttons, BUTTON_MASK);

        // A value differing only in masked-out bits is not a change.
        agg.on_buttons(0xF8 | BUTTON_MASK);
        agg.try_take_dirty();
        agg.on_buttons(BUTTON_MASK);
        assert!(!agg.try_take_dirty());
    }

    #[test]
    fn velocity_update_neither_signals_nor_moves() {
        let agg = EventAggregator::new();
        agg.on_velocity(512, -256);

        assert!(!agg.try_take_dirty());
        assert_eq!(agg.velocity(), (512, -256));
        let report = agg.take_report();
        assert_eq!((report.dx, report.dy), (0, 0));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Velocity Integrator Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn zero_velocity_produces_no_motion() {
        let mut axis = AxisAccumulator::new();
        for _ in 0..10 {
            assert_eq!(axis.step(0), 0);
        }
    }

    #[test]
    fn whole_pixel_velocity_moves_every_tick() {
        // 512 units = 2 px per tick, no remainder.
        let mut axis = AxisAccumulator::new();
        for _ in 0..5 {
            assert_eq!(axis.step(512), 2);
        }
    }

    #[test]
    fn fractional_velocity_paces_steadily() {
        // 128 units = half a pixel per tick: one pixel every other tick,
        // not a burst followed by silence.
        let mut axis = AxisAccumulator::new();
        let steps: Vec<i8> = (0..8).map(|_| axis.step(128)).collect();
        assert_eq!(steps, [0, 1, 0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn constant_velocity_converges_within_one_pixel() {
        for v in [1i16, 100, 300, 768, -300, -37, 12345] {
            let mut axis = AxisAccumulator::new();
            let n = 100i64;
            let total: i64 = (0..n).map(|_| i64::from(axis.step(v))).sum();
            let exact = i64::from(v) * n / 256;
            assert!(
                (total - exact).abs() <= 1,
                "velocity {v}: moved {total}, expected about {exact}"
            );
        }
    }

    #[test]
    fn negative_velocity_is_symmetric() {
        let mut pos = AxisAccumulator::new();
        let mut neg = AxisAccumulator::new();
        for _ in 0..50 {
            assert_eq!(pos.step(300), -neg.step(-300));
        }
    }

    #[test]
    fn per_tick_delta_is_clamped_not_wrapped() {
        // 32767 units is within one tick of the ±127 px report limit; the
        // step must saturate in the right direction, never flip sign.
        let mut axis = AxisAccumulator::new();
        for _ in 0..20 {
            let d = axis.step(32767);
            assert!((1..=127).contains(&d));
        }
    }

    #[test]
    fn direction_reversal_discards_remainder() {
        let mut axis = AxisAccumulator::new();
        axis.step(200); // leaves a 200-unit remainder heading positive
        assert_eq!(axis.step(-256), -1); // clean single pixel, no borrow
    }

    #[test]
    fn stop_discards_remainder() {
        let mut axis = AxisAccumulator::new();
        axis.step(255); // just under one pixel
        axis.step(0);
        // Restarting at the same speed must not instantly produce the
        // pixel the discarded remainder almost finished.
        assert_eq!(axis.step(255), 0);
    }

    #[test]
    fn integrator_handles_both_axes_independently() {
        let mut integ = VelocityIntegrator::new();
        assert_eq!(integ.tick(512, 0), (2, 0));
        assert_eq!(integ.tick(512, -256), (2, -1));
        assert_eq!(integ.tick(0, -256), (0, -1));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Lifecycle Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn new_session_starts_from_rest() {
        let agg = EventAggregator::new();

        // Previous session left a velocity behind.
        agg.on_velocity(2000, -2000);
        let mut integ = begin_session(&agg);

        // The session hook cleared it: ticks produce no motion until the
        // new central writes a velocity of its own.
        assert_eq!(agg.velocity(), (0, 0));
        for _ in 0..10 {
            let (vx, vy) = agg.velocity();
            assert_eq!(integ.tick(vx, vy), (0, 0));
        }
        assert!(!agg.try_take_dirty());
    }

    #[test]
    fn session_reset_does_not_touch_pending_report() {
        let agg = EventAggregator::new();
        agg.on_buttons(BUTTON_LEFT);
        agg.on_move(3, 3);
        agg.try_take_dirty();

        let _integ = begin_session(&agg);

        let report = agg.take_report();
        assert_eq!(report, MouseReport {
            buttons: BUTTON_LEFT,
            dx: 3,
            dy: 3,
        });
    }

    #[test]
    fn stopped_tick_source_produces_no_motion() {
        let agg = EventAggregator::new();
        agg.on_velocity(512, 0);
        {
            let mut integ = begin_session(&agg);
            agg.on_velocity(512, 0);
            let (vx, vy) = agg.velocity();
            let (dx, dy) = integ.tick(vx, vy);
            agg.on_move(dx, dy);
            assert!(agg.try_take_dirty());
            // Integrator dropped here: the tick source is stopped.
        }
        let _ = agg.take_report();

        // However much stale velocity remains, no ticks run and nothing
        // dirties the aggregator.
        assert_eq!(agg.velocity(), (512, 0));
        assert!(!agg.try_take_dirty());
        assert_eq!(agg.take_report(), MouseReport::empty());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Report Dispatcher Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn dispatch_submits_snapshot_and_clears() {
        let agg = EventAggregator::new();
        let mut sink = RecordingSink::new();

        agg.on_buttons(BUTTON_LEFT);
        block_on(dispatch_next(&agg, &mut sink)).unwrap();
        assert_eq!(sink.sent, [[0x01, 0x00, 0x00, 0x00]]);

        agg.on_move(5, -3);
        block_on(dispatch_next(&agg, &mut sink)).unwrap();
        // -3 is 0xFD as an unsigned byte; buttons persist across reports.
        assert_eq!(sink.sent[1], [0x01, 0x05, 0xFD, 0x00]);

        assert_eq!(agg.take_report().dx, 0);
    }

    #[test]
    fn failed_submit_drops_motion_but_keeps_button_state() {
        let agg = EventAggregator::new();
        let mut sink = RecordingSink::new();

        agg.on_buttons(BUTTON_MIDDLE);
        agg.on_move(40, 40);
        sink.fail = true;
        assert_eq!(block_on(dispatch_next(&agg, &mut sink)), Err(Error::Usb));
        assert!(sink.sent.is_empty());

        // Fire-and-forget: the failed report's displacement is gone, but
        // the next change dispatches normally with the button level intact.
        sink.fail = false;
        agg.on_move(1, 0);
        block_on(dispatch_next(&agg, &mut sink)).unwrap();
        assert_eq!(sink.sent, [[0x04, 0x01, 0x00, 0x00]]);
    }

    // ════════════════════════════════════════════════════════════════════════
    // BLE Protocol Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn decode_move_payload_is_signed() {
        assert_eq!(protocol::decode_move([0x05, 0xFD]), (5, -3));
        assert_eq!(protocol::decode_move([0x80, 0x7F]), (-128, 127));
    }

    #[test]
    fn decode_velocity_payload_is_little_endian() {
        assert_eq!(protocol::decode_velocity([0x00, 0x02, 0x00, 0x00]), (512, 0));
        assert_eq!(
            protocol::decode_velocity([0xFF, 0xFF, 0x00, 0x01]),
            (-1, 256)
        );
    }

    #[test]
    fn service_uuid_is_little_endian_of_canonical_form() {
        // 56beb2d8-64eb-4e33-96d4-e3f394041d0b, reversed bytewise.
        let mut big_endian = protocol::SIMPLE_MOUSE_SERVICE_UUID;
        big_endian.reverse();
        assert_eq!(
            big_endian,
            [
                0x56, 0xbe, 0xb2, 0xd8, 0x64, 0xeb, 0x4e, 0x33, 0x96, 0xd4, 0xe3, 0xf3, 0x94,
                0x04, 0x1d, 0x0b
            ]
        );
    }
}
