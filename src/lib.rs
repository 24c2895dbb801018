//! Hardware-independent core of the ble-sensor firmware.
//!
//! Everything here builds for the host as well as the nRF52840, so the
//! calibration math, connection state machine, status indicator, switch
//! queue and characteristic handlers are unit tested without a board.
//!
//! Usage: `cargo test`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and adds the SoftDevice / SAADC / GPIO adapters on top of this crate.
//! Build it with `cargo build --release --features embedded
//! --target thumbv7em-none-eabihf`.

#![cfg_attr(not(test), no_std)]

pub mod calibration;
pub mod config;
pub mod connection;
pub mod error;
pub mod gatt;
pub mod handlers;
pub mod indicator;
pub mod peripheral;
pub mod switch;
pub mod temperature;

pub use calibration::{AnalogInput, AnalogSampler, CalibrationData};
pub use connection::{ConnectionState, Transition};
pub use error::{BleError, Error};
pub use gatt::{CharacteristicId, GattValues, Value};
pub use handlers::{CharacteristicHandler, DebugSink, LedCommand};
pub use peripheral::SensorPeripheral;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests - cross-module behaviour
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_uuid_le_bytes_match_string_form() {
        // 4fafc201-1fb5-459e-8fcc-c5c9c331914b, least significant byte first.
        let le = config::SERVICE_UUID.to_le_bytes();
        assert_eq!(le[0], 0x4b);
        assert_eq!(le[15], 0x4f);
    }

    #[test]
    fn temperature_value_fits_characteristic() {
        let q1 = temperature::encode_q1(temperature::to_q1(-40.0));
        assert_eq!(q1.len(), CharacteristicId::Temperature.max_len());
    }

    #[test]
    fn sentinel_fits_switch_characteristic() {
        assert!(config::SWITCH_SENTINEL.len() <= CharacteristicId::SwitchEvent.max_len());
    }

    #[test]
    fn error_conversion_wraps_ble_errors() {
        let e: Error = BleError::NotifyFailed.into();
        assert_eq!(e, Error::Ble(BleError::NotifyFailed));
    }

    #[test]
    fn blink_period_matches_quarter_second() {
        assert_eq!(config::STATUS_BLINK_PERIOD_MS, 250);
    }
}
