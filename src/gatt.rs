//! GATT table description and the stack-facing value interface.
//!
//! The core only talks to the BLE stack through [`GattValues`]; the
//! embedded build implements it over the SoftDevice, tests over a recorder.

use heapless::Vec;

use crate::config;
use crate::error::Error;

/// A characteristic value produced by a handler.
pub type Value = Vec<u8, { config::MAX_VALUE_LEN }>;

/// The four characteristics of the sensor service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CharacteristicId {
    Temperature,
    SwitchEvent,
    LedControl,
    Text,
}

/// ATT properties a characteristic is declared with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Access {
    pub read: bool,
    pub write: bool,
    pub notify: bool,
}

impl CharacteristicId {
    pub const ALL: [CharacteristicId; 4] = [
        CharacteristicId::Temperature,
        CharacteristicId::SwitchEvent,
        CharacteristicId::LedControl,
        CharacteristicId::Text,
    ];

    pub const fn uuid(self) -> u128 {
        match self {
            CharacteristicId::Temperature => config::TEMPERATURE_UUID,
            CharacteristicId::SwitchEvent => config::SWITCH_UUID,
            CharacteristicId::LedControl => config::LED_UUID,
            CharacteristicId::Text => config::TEXT_UUID,
        }
    }

    pub const fn access(self) -> Access {
        match self {
            CharacteristicId::Temperature => Access {
                read: true,
                write: false,
                notify: false,
            },
            CharacteristicId::SwitchEvent => Access {
                read: false,
                write: false,
                notify: true,
            },
            CharacteristicId::LedControl | CharacteristicId::Text => Access {
                read: true,
                write: true,
                notify: false,
            },
        }
    }

    /// Value stored by the stack before any handler runs.
    pub const fn initial_value(self) -> &'static [u8] {
        match self {
            CharacteristicId::Temperature => &[0, 0],
            CharacteristicId::SwitchEvent | CharacteristicId::LedControl => &[],
            CharacteristicId::Text => config::TEXT_DEFAULT,
        }
    }

    /// Upper bound on the stored value length.
    pub const fn max_len(self) -> usize {
        match self {
            CharacteristicId::Temperature => crate::temperature::Q1_LEN,
            CharacteristicId::SwitchEvent => config::SWITCH_SENTINEL.len(),
            CharacteristicId::LedControl | CharacteristicId::Text => config::MAX_VALUE_LEN,
        }
    }
}

/// The slice of the BLE stack the core needs.
pub trait GattValues {
    /// Replace the value the stack holds for `id`.
    fn set_value(&self, id: CharacteristicId, value: &[u8]) -> Result<(), Error>;

    /// Push `value` to the connected peer. Must be a silent no-op when no
    /// peer is connected or subscribed.
    fn notify(&self, id: CharacteristicId, value: &[u8]) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuids_are_distinct_from_service() {
        for (i, a) in CharacteristicId::ALL.iter().enumerate() {
            assert_ne!(a.uuid(), config::SERVICE_UUID);
            for b in &CharacteristicId::ALL[i + 1..] {
                assert_ne!(a.uuid(), b.uuid());
            }
        }
    }

    #[test]
    fn switch_is_notify_only() {
        let access = CharacteristicId::SwitchEvent.access();
        assert!(access.notify);
        assert!(!access.read);
        assert!(!access.write);
    }

    #[test]
    fn temperature_is_read_only() {
        let access = CharacteristicId::Temperature.access();
        assert!(access.read);
        assert!(!access.write);
    }

    #[test]
    fn initial_values_fit() {
        for id in CharacteristicId::ALL {
            assert!(id.initial_value().len() <= id.max_len());
            assert!(id.max_len() <= config::MAX_VALUE_LEN);
        }
        assert_eq!(CharacteristicId::Text.initial_value(), b"Hello World...");
    }

    #[test]
    fn writable_characteristics_take_a_full_mtu_write() {
        let full_write = usize::from(config::ATT_MTU) - 3;
        for id in CharacteristicId::ALL {
            if id.access().write {
                assert!(id.max_len() >= full_write, "{:?} caps writes", id);
            }
        }
    }

    #[test]
    fn led_commands_fit() {
        let max = CharacteristicId::LedControl.max_len();
        assert!(config::LED_CMD_SET.len() <= max);
        assert!(config::LED_CMD_RESET.len() <= max);
    }
}
