//! Embedded entry point: BLE Simple Mouse Service to USB HID bridge.
//!
//! Task layout:
//! - `softdevice_task` - SoftDevice event pump, feeds USB VBUS detection.
//! - `ble_task` - advertising + GATT server + per-connection integrator tick.
//! - `run_usb_device` - USB enumeration and endpoint servicing.
//! - `mouse_writer_task` - the report dispatcher (sole consumer).
//!
//! The producers and the dispatcher share exactly one object, the
//! process-wide [`EventAggregator`].

#![no_std]
#![no_main]

use defmt::{info, unwrap};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::usb::vbus_detect::SoftwareVbusDetect;
use nrf_softdevice::Softdevice;
use panic_probe as _;
use static_cell::StaticCell;

use blemouse::ble::peripheral::{ble_task, softdevice_config, softdevice_task};
use blemouse::ble::service::{self, MouseServer};
use blemouse::mouse::aggregator::EventAggregator;
use blemouse::usb::hid_device::{self, UsbMouseWriter};

/// The shared aggregation state: created at startup, lives forever,
/// mutated by the BLE producers and drained by the dispatcher.
static AGGREGATOR: EventAggregator = EventAggregator::new();

static VBUS_DETECT: StaticCell<SoftwareVbusDetect> = StaticCell::new();
static MOUSE_SERVER: StaticCell<MouseServer> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("blemouse starting");

    // The SoftDevice reserves the highest interrupt priorities; keep the
    // application peripherals below them.
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.time_interrupt_priority = Priority::P3;
    interrupt::USBD.set_priority(Priority::P2);
    let p = embassy_nrf::init(nrf_config);

    let sd = Softdevice::enable(&softdevice_config());
    // VBUS state is reported through SoftDevice SoC events.
    let vbus = VBUS_DETECT.init(SoftwareVbusDetect::new(true, false));
    {
        // The immutable ref runs the SoftDevice event pump; the mutable
        // one below registers the GATT server.
        let sdv = unsafe { Softdevice::steal() };
        unwrap!(spawner.spawn(softdevice_task(sdv, vbus)));
    }

    let server = MOUSE_SERVER.init(unwrap!(service::register(sd)));

    let usb = hid_device::init(p.USBD, vbus);
    unwrap!(spawner.spawn(hid_device::run_usb_device(usb.device)));
    unwrap!(spawner.spawn(hid_device::mouse_writer_task(
        &AGGREGATOR,
        UsbMouseWriter::new(usb.mouse_writer),
    )));

    unwrap!(spawner.spawn(ble_task(sd, server, &AGGREGATOR)));
}
