//! Application-wide constants and compile-time configuration.
//!
//! Timing parameters, protocol constants, and device identity live here
//! so they can be tuned in one place.

// Core

/// Velocity integration tick period (ms).
///
/// The integrator converts the most recent velocity into pixel deltas once
/// per tick, only while a BLE central is connected.
pub const POINTER_TICK_MS: u64 = 8;

// BLE

/// GAP device name, also placed in the scan-response payload.
pub const BLE_DEVICE_NAME: &str = "blemouse";

/// Advertising interval (0.625 ms units). 160 = 100 ms.
pub const BLE_ADV_INTERVAL: u32 = 160;

/// ATT MTU for the single GATT connection. The largest inbound write is
/// the 4-byte velocity payload, so the minimum of 23 would do; 32 leaves
/// headroom without growing the SoftDevice RAM ask.
pub const BLE_ATT_MTU: u16 = 32;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "blemouse";
pub const USB_PRODUCT: &str = "BLE Simple Mouse Bridge";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms). 1 ms = 1000 Hz for lowest latency.
pub const USB_HID_POLL_MS: u8 = 1;
