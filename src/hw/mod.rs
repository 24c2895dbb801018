//! nRF52840 peripheral adapters.
//!
//! Each submodule binds one board resource to the hardware-independent
//! core in `ble_sensor`:
//!
//!   - `adc`    - SAADC sampling of the two references and the sensor
//!   - `status` - blink ticker for the status output
//!   - `switch` - falling-edge watcher and notification publisher
//!   - `sink`   - debug sink for text written by the peer

pub mod adc;
pub mod sink;
pub mod status;
pub mod switch;
