//! Status output blink ticker.
//!
//! Toggles the status output every `STATUS_BLINK_PERIOD_MS` while the
//! indicator is armed. When a connection disarms it, the task parks until
//! the indicator is re-armed and restarts the period from there.

use ble_sensor::config::STATUS_BLINK_PERIOD_MS;
use defmt::debug;
use embassy_time::{Duration, Ticker};

use crate::Peripheral;

#[embassy_executor::task]
pub async fn status_task(peripheral: &'static Peripheral) -> ! {
    let indicator = peripheral.indicator();
    let mut ticker = Ticker::every(Duration::from_millis(STATUS_BLINK_PERIOD_MS));

    loop {
        if !indicator.is_armed() {
            debug!("status blink paused");
            indicator.wait_armed().await;
            ticker.reset();
            debug!("status blink resumed");
        }

        ticker.next().await;
        peripheral.on_timer_tick();
    }
}
