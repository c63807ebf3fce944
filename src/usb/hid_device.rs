//! USB HID mouse device.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral and exposes one HID endpoint. VBUS state comes from the
//! SoftDevice's power SoC events (software detection), because the
//! SoftDevice owns the POWER peripheral when BLE is active.

use defmt::{info, warn};
use embassy_nrf::usb::vbus_detect::SoftwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::{Builder, Config, UsbDevice};
use static_cell::StaticCell;

use crate::config;
use crate::error::Error;
use crate::mouse::aggregator::EventAggregator;
use crate::mouse::dispatcher::{self, ReportSink};
use crate::mouse::report::{MOUSE_REPORT_DESCRIPTOR, MOUSE_REPORT_SIZE};

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
});

/// USB driver with SoftDevice-fed VBUS detection.
pub type UsbDriver = Driver<'static, peripherals::USBD, &'static SoftwareVbusDetect>;

static MOUSE_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();

/// Build result containing the USB device runner and the mouse writer.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub mouse_writer: HidWriter<'static, UsbDriver, 8>,
}

/// Initialise the USB stack and create the HID mouse device.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD, vbus: &'static SoftwareVbusDetect) -> UsbHidDevice {
    let driver = Driver::new(usbd, Irqs, vbus);

    // USB device-level configuration.
    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    // Allocate static descriptor buffers.
    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 128]);

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    let mouse_state = MOUSE_STATE.init(State::new());
    let mouse_config = HidConfig {
        report_descriptor: MOUSE_REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    };
    let mouse_writer = HidWriter::new(&mut builder, mouse_state, mouse_config);

    let device = builder.build();

    info!("USB HID mouse device initialised");

    UsbHidDevice {
        device,
        mouse_writer,
    }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// This handles USB enumeration, suspend/resume, and endpoint servicing.
#[embassy_executor::task]
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

/// `ReportSink` backed by the HID interrupt endpoint.
pub struct UsbMouseWriter {
    writer: HidWriter<'static, UsbDriver, 8>,
}

impl UsbMouseWriter {
    pub fn new(writer: HidWriter<'static, UsbDriver, 8>) -> Self {
        Self { writer }
    }
}

impl ReportSink for UsbMouseWriter {
    async fn submit(&mut self, report: &[u8; MOUSE_REPORT_SIZE]) -> Result<(), Error> {
        self.writer.write(report).await.map_err(|_| Error::Usb)
    }
}

/// Report dispatcher task - blocks on the aggregator's dirty signal and
/// writes each coalesced report to the USB HID endpoint.
#[embassy_executor::task]
pub async fn mouse_writer_task(
    aggregator: &'static EventAggregator,
    mut writer: UsbMouseWriter,
) -> ! {
    info!("mouse report dispatcher started");

    loop {
        // Fire-and-forget: a failed write is logged and the loop goes
        // straight back to waiting for the next signal.
        if let Err(e) = dispatcher::dispatch_next(aggregator, &mut writer).await {
            warn!("mouse report dropped: {}", e);
        }
    }
}
