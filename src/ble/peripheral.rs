//! SoftDevice lifecycle, advertising, and the per-connection session loop.
//!
//! The device advertises the Simple Mouse Service until a central connects,
//! then runs two futures side by side:
//!
//! - the GATT server loop, feeding characteristic writes into the
//!   [`EventAggregator`], and
//! - the pointer session: the 8 ms integrator tick.
//!
//! When the central disconnects the GATT loop returns and `select` drops
//! the session future, halting the tick source synchronously before the
//! next advertising round begins.

use core::mem;

use defmt::{info, warn};
use embassy_futures::select::{select, Either};
use embassy_nrf::usb::vbus_detect::SoftwareVbusDetect;
use embassy_time::{Duration, Ticker};
use nrf_softdevice::ble::advertisement_builder::{
    Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
};
use nrf_softdevice::ble::{gatt_server, peripheral};
use nrf_softdevice::{raw, Config, SocEvent, Softdevice};

use crate::ble::protocol::SIMPLE_MOUSE_SERVICE_UUID;
use crate::ble::service::{self, MouseServer};
use crate::config;
use crate::mouse::aggregator::{EventAggregator, InputSink};
use crate::mouse::lifecycle;

// The 128-bit service UUID plus flags fills most of the 31-byte payload,
// so the device name goes in the scan response.
static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_128(ServiceList::Complete, &[SIMPLE_MOUSE_SERVICE_UUID])
    .build();

static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .full_name(config::BLE_DEVICE_NAME)
    .build();

/// SoftDevice configuration for a single-link GATT-server-only peripheral.
pub fn softdevice_config() -> Config {
    Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t {
            att_mtu: config::BLE_ATT_MTU,
        }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: config::BLE_DEVICE_NAME.as_ptr() as _,
            current_len: config::BLE_DEVICE_NAME.len() as u16,
            max_len: config::BLE_DEVICE_NAME.len() as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Background task of the SoftDevice.
///
/// Also forwards USB power SoC events into the software VBUS detector,
/// since the SoftDevice owns the POWER peripheral.
#[embassy_executor::task]
pub async fn softdevice_task(
    sd: &'static Softdevice,
    vbus: &'static SoftwareVbusDetect,
) -> ! {
    unsafe {
        raw::sd_power_usbpwrrdy_enable(1);
        raw::sd_power_usbdetected_enable(1);
        raw::sd_power_usbremoved_enable(1);
    };

    sd.run_with_callback(|event: SocEvent| {
        match event {
            SocEvent::PowerUsbRemoved => vbus.detected(false),
            SocEvent::PowerUsbDetected => vbus.detected(true),
            SocEvent::PowerUsbPowerReady => vbus.ready(),
            _ => {}
        };
    })
    .await
}

/// One pointer session: the velocity integrator tick, alive exactly as
/// long as the connection that spawned it.
async fn pointer_session(aggregator: &EventAggregator) -> ! {
    let mut integrator = lifecycle::begin_session(aggregator);
    let mut ticker = Ticker::every(Duration::from_millis(config::POINTER_TICK_MS));
    loop {
        ticker.next().await;
        let (vx, vy) = aggregator.velocity();
        let (dx, dy) = integrator.tick(vx, vy);
        // The integrator feeds the aggregator exactly like an external
        // discrete-move producer.
        if (dx, dy) != (0, 0) {
            aggregator.on_move(dx, dy);
        }
    }
}

/// Advertise, serve one central at a time, repeat forever.
#[embassy_executor::task]
pub async fn ble_task(
    sd: &'static Softdevice,
    server: &'static MouseServer,
    aggregator: &'static EventAggregator,
) -> ! {
    loop {
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };
        let mut adv_config = peripheral::Config::default();
        adv_config.interval = config::BLE_ADV_INTERVAL;

        let conn = match peripheral::advertise_connectable(sd, adv, &adv_config).await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("BLE advertising error: {}", e);
                continue;
            }
        };
        info!("BLE central connected");

        let server_fut = gatt_server::run(&conn, server, |event| {
            service::handle_event(aggregator, event)
        });
        let session_fut = pointer_session(aggregator);

        // The session future is dropped the moment the GATT loop ends, so
        // no integrator tick can fire once the link is gone.
        match select(server_fut, session_fut).await {
            Either::First(_) => info!("BLE central disconnected"),
            Either::Second(never) => match never {},
        }
    }
}
