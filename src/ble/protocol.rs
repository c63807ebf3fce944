//! Simple Mouse Service wire definitions.
//!
//! Portable (host-testable) half of the BLE layer: the service UUID used in
//! the advertising payload and the decoding of the three characteristic
//! write payloads. Payload lengths are enforced by the GATT layer through
//! the fixed-size characteristic value types, so decoding here works on
//! exact-width arrays.
//!
//! UUIDs:
//! - `56beb2d8-64eb-4e33-96d4-e3f394041d0b` service
//! - `83986548-8703-4272-a124-84abb9d03217` move x & y (2 bytes)
//! - `3cabb56e-27a7-45fa-996a-582f581d6aa3` velocity x & y (4 bytes)
//! - `5062c9c1-ca09-47f9-84f6-725ef8091bf9` buttons (1 byte)

/// Simple Mouse Service UUID as it appears in the advertising payload
/// (128-bit, little-endian byte order).
pub const SIMPLE_MOUSE_SERVICE_UUID: [u8; 16] = [
    0x0b, 0x1d, 0x04, 0x94, 0xf3, 0xe3, 0xd4, 0x96, 0x33, 0x4e, 0xeb, 0x64, 0xd8, 0xb2, 0xbe,
    0x56,
];

/// Move XY payload: one signed byte per axis.
pub fn decode_move(payload: [u8; 2]) -> (i8, i8) {
    (payload[0] as i8, payload[1] as i8)
}

/// Velocity XY payload: one little-endian `i16` per axis, in 1/256 pixel
/// per tick.
pub fn decode_velocity(payload: [u8; 4]) -> (i16, i16) {
    (
        i16::from_le_bytes([payload[0], payload[1]]),
        i16::from_le_bytes([payload[2], payload[3]]),
    )
}
