//! BLE GAP advertiser.
//!
//! Advertises the 128-bit sensor service UUID with the full device name in
//! the scan response, and publishes the preferred connection parameters
//! that phones use when negotiating the link.

use ble_sensor::config::{
    BLE_ADV_INTERVAL, BLE_CONN_INTERVAL_MAX, BLE_CONN_INTERVAL_MIN, BLE_SLAVE_LATENCY,
    BLE_SUP_TIMEOUT, DEVICE_NAME, SERVICE_UUID,
};
use ble_sensor::{BleError, Error};
use defmt::info;
use nrf_softdevice::ble::advertisement_builder::{
    Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
};
use nrf_softdevice::ble::{peripheral, Connection};
use nrf_softdevice::{raw, RawError, Softdevice};

static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_128(ServiceList::Complete, &[SERVICE_UUID.to_le_bytes()])
    .build();

static SCAN_DATA: LegacyAdvertisementPayload =
    LegacyAdvertisementBuilder::new().full_name(DEVICE_NAME).build();

/// Set the Peripheral Preferred Connection Parameters (PPCP).
///
/// Must run after the SoftDevice is enabled.
pub fn set_preferred_connection_params() -> Result<(), Error> {
    let params = raw::ble_gap_conn_params_t {
        min_conn_interval: BLE_CONN_INTERVAL_MIN,
        max_conn_interval: BLE_CONN_INTERVAL_MAX,
        slave_latency: BLE_SLAVE_LATENCY,
        conn_sup_timeout: BLE_SUP_TIMEOUT,
    };
    let ret = unsafe { raw::sd_ble_gap_ppcp_set(&params) };
    RawError::convert(ret).map_err(|e| BleError::Raw(e as u32).into())
}

/// Advertise until a central connects.
pub async fn advertise(sd: &Softdevice) -> Result<Connection, Error> {
    let config = peripheral::Config {
        interval: BLE_ADV_INTERVAL,
        ..Default::default()
    };
    let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
        adv_data: &ADV_DATA,
        scan_data: &SCAN_DATA,
    };

    info!("Advertising as {}", DEVICE_NAME);
    peripheral::advertise_connectable(sd, adv, &config)
        .await
        .map_err(|_| BleError::AdvertiseFailed.into())
}
