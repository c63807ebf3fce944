//! USB Device subsystem - presents an HID mouse to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb` with a single HID interface (boot-compatible 3-button
//! relative mouse). The writer task is the core's report dispatcher: it
//! blocks on the aggregator's dirty signal and pushes each finished 4-byte
//! report to the interrupt endpoint, fire-and-forget.

#[cfg(feature = "embedded")]
pub mod hid_device;
