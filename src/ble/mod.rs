//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **Server** - registers the sensor service with its four
//!    characteristics and routes peer reads/writes into the
//!    [`SensorPeripheral`](ble_sensor::SensorPeripheral) handlers.
//! 2. **Advertiser** - connectable, scannable advertising carrying the
//!    service UUID, plus the preferred connection parameters.
//!
//! Connection lifecycle (connect → serve → disconnect → re-advertise) is
//! driven from `main`.

pub mod advertiser;
pub mod server;
