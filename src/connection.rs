//! Peripheral lifecycle: Setup → Standby ⇄ Connected.
//!
//! The only consumer of the state is the status indicator, so each
//! transition applies the indicator side effect inside the same critical
//! section as the state write. The timer is armed iff the state is not
//! `Connected`.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::digital::OutputPin;

use crate::indicator::StatusIndicator;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    /// GATT service not live yet.
    Setup,
    /// Advertising, no peer.
    Standby,
    /// One peer attached.
    Connected,
}

/// A state change, returned so the caller can log it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: ConnectionState,
    pub to: ConnectionState,
}

pub struct ConnectionStateMachine {
    state: Mutex<CriticalSectionRawMutex, Cell<ConnectionState>>,
}

impl Default for ConnectionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionStateMachine {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(ConnectionState::Setup)),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state.lock(Cell::get)
    }

    /// Service registered and advertising about to start.
    ///
    /// Only leaves `Setup`; later calls are ignored.
    pub fn provisioned<P: OutputPin>(&self, indicator: &StatusIndicator<P>) -> Option<Transition> {
        self.state.lock(|state| {
            let from = state.get();
            if from != ConnectionState::Setup {
                return None;
            }
            state.set(ConnectionState::Standby);
            indicator.arm();
            Some(Transition {
                from,
                to: ConnectionState::Standby,
            })
        })
    }

    /// Peer attached: stop blinking and hold the indicator on.
    ///
    /// Ignored during `Setup`. A repeated connect re-applies the indicator
    /// effect without reporting a transition.
    pub fn connected<P: OutputPin>(&self, indicator: &StatusIndicator<P>) -> Option<Transition> {
        self.state.lock(|state| match state.get() {
            ConnectionState::Setup => None,
            ConnectionState::Connected => {
                indicator.disarm_steady_on();
                None
            }
            from @ ConnectionState::Standby => {
                state.set(ConnectionState::Connected);
                indicator.disarm_steady_on();
                Some(Transition {
                    from,
                    to: ConnectionState::Connected,
                })
            }
        })
    }

    /// Peer gone: resume blinking.
    pub fn disconnected<P: OutputPin>(&self, indicator: &StatusIndicator<P>) -> Option<Transition> {
        self.state.lock(|state| {
            let from = state.get();
            indicator.arm();
            if from != ConnectionState::Connected {
                return None;
            }
            state.set(ConnectionState::Standby);
            Some(Transition {
                from,
                to: ConnectionState::Standby,
            })
        })
    }
}
