//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **Protocol** - UUIDs and payload decoding for the custom Simple
//!    Mouse Service (portable, host-testable).
//! 2. **Service** - the GATT server exposing the three write-only
//!    characteristics (move, velocity, buttons).
//! 3. **Peripheral** - advertising, connection lifecycle, and the
//!    per-connection integrator tick.
//!
//! Characteristic writes are handed straight to the core through the
//! `InputSink` trait; nothing BLE-specific crosses that boundary.

pub mod protocol;

#[cfg(feature = "embedded")]
pub mod peripheral;
#[cfg(feature = "embedded")]
pub mod service;
