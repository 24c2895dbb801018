//! Application-wide constants and compile-time configuration.
//!
//! All GATT identifiers, timing parameters, analog reference values and
//! protocol strings live here so they can be tuned in one place.

// BLE

/// GAP device name (advertised in the scan response).
pub const DEVICE_NAME: &str = "BLE-Sensor";

/// Primary service UUID.
pub const SERVICE_UUID: u128 = 0x4fafc201_1fb5_459e_8fcc_c5c9c331914b;

/// Characteristic UUIDs.
pub const TEMPERATURE_UUID: u128 = 0x229a8d41_fde4_44ff_8dad_feecdc379e92;
pub const SWITCH_UUID: u128 = 0xd8520577_81ed_478c_a3ad_a810d65c064a;
pub const LED_UUID: u128 = 0x638cc58f_0c58_4f7a_ab38_0df7aff5e1f3;
pub const TEXT_UUID: u128 = 0xbe6b91f2_86ef_4426_807e_2a2e6e67e29d;

/// Preferred connection interval range (in 1.25 ms units).
/// 6 = 7.5 ms, 18 = 22.5 ms; keeps iOS and Android centrals happy.
pub const BLE_CONN_INTERVAL_MIN: u16 = 0x06;
pub const BLE_CONN_INTERVAL_MAX: u16 = 0x12;

/// BLE slave latency (number of connection events the peripheral can skip).
pub const BLE_SLAVE_LATENCY: u16 = 0;

/// BLE supervision timeout (in 10 ms units). 400 = 4 s.
pub const BLE_SUP_TIMEOUT: u16 = 400;

/// Advertising interval (in 0.625 ms units). 160 = 100 ms.
pub const BLE_ADV_INTERVAL: u32 = 160;

/// Negotiable ATT MTU (bytes).
pub const ATT_MTU: u16 = 128;

/// Largest value any characteristic holds: one full write at `ATT_MTU`
/// (opcode and handle take 3 bytes).
pub const MAX_VALUE_LEN: usize = ATT_MTU as usize - 3;

// Status indicator

/// Blink half-period of the status output while not connected (ms).
pub const STATUS_BLINK_PERIOD_MS: u64 = 250;

// Switch

/// Edges buffered between the GPIO edge and the BLE notify.
pub const SWITCH_QUEUE_DEPTH: usize = 4;

/// Value pushed to the switch characteristic on every falling edge.
pub const SWITCH_SENTINEL: &[u8] = b"SW_HIGH";

// LED commands

pub const LED_CMD_SET: &[u8] = b"SET";
pub const LED_CMD_RESET: &[u8] = b"RESET";

// Text echo

/// Startup value of the text characteristic.
pub const TEXT_DEFAULT: &[u8] = b"Hello World...";

// Analog references (two-point calibration)

/// Voltage present on the high reference input (near the supply rail).
pub const HIGH_REF_MILLIVOLTS: i32 = 3000;

/// Voltage present on the low reference input.
pub const LOW_REF_MILLIVOLTS: i32 = 300;

pub const HIGH_REF_VOLTS: f32 = HIGH_REF_MILLIVOLTS as f32 / 1000.0;
pub const LOW_REF_VOLTS: f32 = LOW_REF_MILLIVOLTS as f32 / 1000.0;

// Temperature sensor transfer function (LM61)

/// Sensor output at 0 °C.
pub const SENSOR_OFFSET_MILLIVOLTS: i32 = 600;

/// Sensor slope, 10 mV / °C.
pub const SENSOR_MILLIVOLTS_PER_DEGREE: i32 = 10;

pub const SENSOR_OFFSET_VOLTS: f32 = SENSOR_OFFSET_MILLIVOLTS as f32 / 1000.0;
pub const SENSOR_VOLTS_PER_DEGREE: f32 = SENSOR_MILLIVOLTS_PER_DEGREE as f32 / 1000.0;

// GPIO / analog pin assignments (nRF52840)
//
// Actual `embassy_nrf::peripherals::*` types are selected in `main.rs`.
// Adjust for your board.
//
//   High reference → AIN0 (P0.02)
//   Low reference  → AIN1 (P0.03)
//   Sensor (LM61)  → AIN2 (P0.04)
//   Switch         → P0.11 (pull-up, falling edge)
//   LED output     → P1.01
//   Status output  → P1.02
