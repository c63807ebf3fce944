//! Simple Mouse GATT service and server.
//!
//! The `#[nrf_softdevice::gatt_service]` macro registers the service and
//! its three write-only characteristics with the SoftDevice; attribute
//! length/offset validation happens in the GATT layer, so the event
//! handler only ever sees exact-width payloads.

use defmt::debug;
use nrf_softdevice::Softdevice;

use crate::ble::protocol;
use crate::error::Error;
use crate::mouse::aggregator::InputSink;

#[nrf_softdevice::gatt_service(uuid = "56beb2d8-64eb-4e33-96d4-e3f394041d0b")]
pub struct SimpleMouseService {
    /// Discrete movement: `[dx: i8, dy: i8]`.
    #[characteristic(uuid = "83986548-8703-4272-a124-84abb9d03217", write)]
    pub move_xy: [u8; 2],

    /// Velocity: `[vx: i16 LE, vy: i16 LE]`, 1/256 px per tick.
    #[characteristic(uuid = "3cabb56e-27a7-45fa-996a-582f581d6aa3", write)]
    pub velocity_xy: [u8; 4],

    /// Button bitfield, low 3 bits significant.
    #[characteristic(uuid = "5062c9c1-ca09-47f9-84f6-725ef8091bf9", write)]
    pub buttons: u8,
}

#[nrf_softdevice::gatt_server]
pub struct MouseServer {
    pub simple_mouse: SimpleMouseService,
}

/// Register the GATT server with the SoftDevice. Called once at startup.
pub fn register(sd: &mut Softdevice) -> Result<MouseServer, Error> {
    MouseServer::new(sd).map_err(|_| Error::BleRegister)
}

/// Route one GATT write event into the core's input surface.
pub fn handle_event<S: InputSink>(sink: &S, event: MouseServerEvent) {
    match event {
        MouseServerEvent::SimpleMouse(event) => match event {
            SimpleMouseServiceEvent::MoveXyWrite(payload) => {
                let (dx, dy) = protocol::decode_move(payload);
                debug!("move ({}, {})", dx, dy);
                sink.on_move(dx, dy);
            }
            SimpleMouseServiceEvent::VelocityXyWrite(payload) => {
                let (vx, vy) = protocol::decode_velocity(payload);
                debug!("velocity ({}, {})", vx, vy);
                sink.on_velocity(vx, vy);
            }
            SimpleMouseServiceEvent::ButtonsWrite(state) => {
                debug!("buttons {:b}", state);
                sink.on_buttons(state);
            }
        },
    }
}
