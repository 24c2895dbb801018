//! Switch input.
//!
//! The switch on P0.11 is active-low with the internal pull-up. Every
//! falling edge is queued by the edge task; the publish task drains the
//! queue from thread context, updates the switch characteristic and
//! notifies a subscribed peer.

use ble_sensor::Error;
use defmt::{debug, warn};
use embassy_nrf::gpio::Input;
use embedded_hal_async::digital::Wait;

use crate::ble::server::SensorServer;
use crate::Peripheral;

/// Queue one switch event per falling edge on `input`.
pub async fn watch_edges<W: Wait>(input: &mut W, peripheral: &Peripheral) -> ! {
    loop {
        if input.wait_for_falling_edge().await.is_err() {
            warn!("switch input error");
            continue;
        }
        if let Err(Error::SwitchQueueFull) = peripheral.on_switch_edge() {
            warn!("switch edge dropped: queue full");
        }
    }
}

#[embassy_executor::task]
pub async fn switch_edge_task(mut input: Input<'static>, peripheral: &'static Peripheral) -> ! {
    watch_edges(&mut input, peripheral).await
}

#[embassy_executor::task]
pub async fn switch_publish_task(
    peripheral: &'static Peripheral,
    server: &'static SensorServer,
) -> ! {
    loop {
        peripheral.switch().next_edge().await;
        match peripheral.publish_switch_event(server) {
            Ok(()) => debug!("switch event published"),
            Err(e) => warn!("switch event: {}", e),
        }
    }
}
