//! ble-sensor - BLE GATT sensor peripheral firmware for nRF52840.
//!
//! Advertises one primary service with four characteristics:
//!   - Temperature (read)        - sampled on demand, Q1 fixed point, LE
//!   - Switch event (notify)     - "SW_HIGH" on every falling edge of P0.11
//!   - LED control (read, write) - "SET" / "RESET" drive P1.01
//!   - Text (read, write)        - written text is echoed over RTT
//!
//! The status output on P1.02 blinks while no central is connected and
//! stays on while one is.

#![no_std]
#![no_main]

mod ble;
mod hw;

use ble_sensor::config::{ATT_MTU, DEVICE_NAME};
use ble_sensor::SensorPeripheral;
use defmt::{info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::interrupt::Priority;
use embassy_time::Timer;
use nrf_softdevice::ble::gatt_server;
use nrf_softdevice::{raw, Softdevice};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::ble::server::SensorServer;
use crate::hw::adc::SaadcSampler;
use crate::hw::sink::DefmtSink;

/// The peripheral context as wired on this board.
pub type Peripheral = SensorPeripheral<SaadcSampler, Output<'static>, Output<'static>, DefmtSink>;

static PERIPHERAL: StaticCell<Peripheral> = StaticCell::new();
static SERVER: StaticCell<SensorServer> = StaticCell::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
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
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: ATT_MTU }),
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
            p_value: DEVICE_NAME.as_ptr() as _,
            current_len: DEVICE_NAME.len() as u16,
            max_len: DEVICE_NAME.len() as u16,
            write_perm: unsafe { core::mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("{} starting", DEVICE_NAME);

    // SoftDevice reserves priorities 0, 1 and 4.
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(config);

    info!("Calibrating ADC...");
    let adc = SaadcSampler::new(p.SAADC, p.P0_02, p.P0_03, p.P0_04).await;
    let led = Output::new(p.P1_01, Level::Low, OutputDrive::Standard);
    let status = Output::new(p.P1_02, Level::Low, OutputDrive::Standard);
    let switch = Input::new(p.P0_11, Pull::Up);

    let peripheral: &'static Peripheral =
        PERIPHERAL.init(SensorPeripheral::start(adc, led, status, DefmtSink));
    let calibration = peripheral.calibration();
    info!(
        "Calibration: low={} high={}",
        calibration.low_raw, calibration.high_raw
    );
    if calibration.is_degenerate() {
        warn!("References read identical - temperature pinned to the low reference");
    }

    // Blink from here on, through BLE bring-up.
    unwrap!(spawner.spawn(hw::status::status_task(peripheral)));
    unwrap!(spawner.spawn(hw::switch::switch_edge_task(switch, peripheral)));

    let sd = Softdevice::enable(&softdevice_config());
    let server: &'static SensorServer = SERVER.init(unwrap!(SensorServer::new(sd, peripheral)));
    info!("Characteristics defined");
    let sd = server.softdevice();
    unwrap!(spawner.spawn(softdevice_task(sd)));
    unwrap!(spawner.spawn(hw::switch::switch_publish_task(peripheral, server)));

    if let Err(e) = ble::advertiser::set_preferred_connection_params() {
        warn!("PPCP not set: {}", e);
    }

    if let Some(t) = peripheral.provisioned() {
        info!("Connection: {} -> {}", t.from, t.to);
    }

    loop {
        let conn = match ble::advertiser::advertise(sd).await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Advertising failed: {}", e);
                Timer::after_secs(1).await;
                continue;
            }
        };

        server.attach(&conn);
        if let Some(t) = peripheral.on_connect() {
            info!("Connection: {} -> {}", t.from, t.to);
        }

        let reason = gatt_server::run(&conn, server, ble::server::log_event).await;

        server.detach();
        if let Some(t) = peripheral.on_disconnect() {
            info!("Connection: {} -> {}", t.from, t.to);
        }
        info!("Disconnected: {}", reason);
    }
}
