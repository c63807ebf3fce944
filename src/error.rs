//! Unified error type for blemouse.
//!
//! We avoid `alloc` - all variants carry only fixed-size data. The
//! `defmt::Format` derive is feature-gated so the host-test build of the
//! core library stays free of embedded dependencies.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// USB HID endpoint write failed (endpoint disabled or bus gone).
    ///
    /// Reports are fire-and-forget: the dispatcher logs this and moves on.
    Usb,

    /// GATT service registration with the SoftDevice failed at startup.
    BleRegister,
}
