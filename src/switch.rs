//! Falling-edge events from the switch input.
//!
//! The edge side only enqueues a fixed-size event; the BLE side drains the
//! queue from task context and pushes the sentinel value to the stack.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::config::{SWITCH_QUEUE_DEPTH, SWITCH_SENTINEL};
use crate::error::Error;
use crate::gatt::{CharacteristicId, GattValues};

/// One observed falling edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchEdge;

pub struct SwitchNotifier {
    edges: Channel<CriticalSectionRawMutex, SwitchEdge, SWITCH_QUEUE_DEPTH>,
}

impl Default for SwitchNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SwitchNotifier {
    pub const fn new() -> Self {
        Self {
            edges: Channel::new(),
        }
    }

    /// Edge context entry point. Never blocks.
    ///
    /// Returns `false` if the queue was full and the edge was dropped.
    pub fn on_falling_edge(&self) -> bool {
        self.edges.try_send(SwitchEdge).is_ok()
    }

    pub async fn next_edge(&self) -> SwitchEdge {
        self.edges.receive().await
    }

    pub fn try_next_edge(&self) -> Option<SwitchEdge> {
        self.edges.try_receive().ok()
    }

    /// Store the sentinel and notify the peer once.
    ///
    /// The notify is attempted even if the value update failed; the first
    /// error is reported.
    pub fn publish<G: GattValues>(&self, gatt: &G) -> Result<(), Error> {
        let stored = gatt.set_value(CharacteristicId::SwitchEvent, SWITCH_SENTINEL);
        let notified = gatt.notify(CharacteristicId::SwitchEvent, SWITCH_SENTINEL);
        stored.and(notified)
    }
}
