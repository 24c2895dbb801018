//! Per-characteristic read/write callbacks.
//!
//! The BLE stack invokes these on remote access. `on_read` may return a
//! fresh value that the stack stores and serves for that read; `None`
//! keeps whatever the stack already holds.

use embedded_hal::digital::OutputPin;

use crate::calibration::{AnalogSampler, CalibrationData};
use crate::config::{LED_CMD_RESET, LED_CMD_SET};
use crate::gatt::{CharacteristicId, Value};
use crate::temperature;

pub trait CharacteristicHandler {
    fn on_read(&mut self) -> Option<Value> {
        None
    }

    fn on_write(&mut self, _data: &[u8]) {}
}

/// Destination for text written by the peer.
pub trait DebugSink {
    fn write_line(&mut self, line: &[u8]);
}

/// Samples the sensor on every read. Writes are ignored.
pub struct TemperatureHandler<A> {
    adc: A,
    calibration: CalibrationData,
}

impl<A: AnalogSampler> TemperatureHandler<A> {
    pub fn new(adc: A, calibration: CalibrationData) -> Self {
        Self { adc, calibration }
    }
}

impl<A: AnalogSampler> CharacteristicHandler for TemperatureHandler<A> {
    fn on_read(&mut self) -> Option<Value> {
        let q1 = temperature::read_q1(&mut self.adc, &self.calibration);
        Value::from_slice(&temperature::encode_q1(q1)).ok()
    }
}

/// Notify-only; its value is pushed by the switch notifier.
pub struct SwitchHandler;

impl CharacteristicHandler for SwitchHandler {}

/// Commands accepted on the LED characteristic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedCommand {
    Set,
    Reset,
}

impl LedCommand {
    /// Exact, case-sensitive match; anything else is not a command.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data == LED_CMD_SET {
            Some(LedCommand::Set)
        } else if data == LED_CMD_RESET {
            Some(LedCommand::Reset)
        } else {
            None
        }
    }
}

/// Drives the LED output from peer writes. Reads do not mirror the pin.
pub struct LedHandler<P> {
    pin: P,
}

impl<P: OutputPin> LedHandler<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: OutputPin> CharacteristicHandler for LedHandler<P> {
    fn on_write(&mut self, data: &[u8]) {
        let _ = match LedCommand::parse(data) {
            Some(LedCommand::Set) => self.pin.set_high(),
            Some(LedCommand::Reset) => self.pin.set_low(),
            None => Ok(()),
        };
    }
}

/// Echoes peer writes to the debug sink verbatim.
pub struct TextHandler<D> {
    sink: D,
}

impl<D: DebugSink> TextHandler<D> {
    pub fn new(sink: D) -> Self {
        Self { sink }
    }
}

impl<D: DebugSink> CharacteristicHandler for TextHandler<D> {
    fn on_write(&mut self, data: &[u8]) {
        self.sink.write_line(data);
    }
}

/// The closed set of handlers, one per characteristic.
pub struct Handlers<A, L, D> {
    pub temperature: TemperatureHandler<A>,
    pub switch: SwitchHandler,
    pub led: LedHandler<L>,
    pub text: TextHandler<D>,
}

impl<A, L, D> Handlers<A, L, D>
where
    A: AnalogSampler,
    L: OutputPin,
    D: DebugSink,
{
    pub fn new(adc: A, calibration: CalibrationData, led: L, sink: D) -> Self {
        Self {
            temperature: TemperatureHandler::new(adc, calibration),
            switch: SwitchHandler,
            led: LedHandler::new(led),
            text: TextHandler::new(sink),
        }
    }

    pub fn handler_mut(&mut self, id: CharacteristicId) -> &mut dyn CharacteristicHandler {
        match id {
            CharacteristicId::Temperature => &mut self.temperature,
            CharacteristicId::SwitchEvent => &mut self.switch,
            CharacteristicId::LedControl => &mut self.led,
            CharacteristicId::Text => &mut self.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::AnalogInput;
    use core::cell::{Cell, RefCell};
    use core::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone)]
    struct Pin(Rc<Cell<Option<bool>>>);

    impl embedded_hal::digital::ErrorType for Pin {
        type Error = Infallible;
    }

    impl OutputPin for Pin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.set(Some(false));
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.set(Some(true));
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct Lines(Rc<RefCell<std::vec::Vec<std::vec::Vec<u8>>>>);

    impl DebugSink for Lines {
        fn write_line(&mut self, line: &[u8]) {
            self.0.borrow_mut().push(line.to_vec());
        }
    }

    struct Counting {
        raw: u16,
        reads: Rc<Cell<u32>>,
    }

    impl AnalogSampler for Counting {
        fn sample(&mut self, input: AnalogInput) -> u16 {
            assert_eq!(input, AnalogInput::Sensor);
            self.reads.set(self.reads.get() + 1);
            self.raw
        }
    }

    #[test]
    fn led_command_parse_is_exact() {
        assert_eq!(LedCommand::parse(b"SET"), Some(LedCommand::Set));
        assert_eq!(LedCommand::parse(b"RESET"), Some(LedCommand::Reset));
        for junk in [&b"set"[..], b"", b"SETX", b"RESE", b"SET\n", b" SET", b"reset"] {
            assert_eq!(LedCommand::parse(junk), None);
        }
    }

    #[test]
    fn led_set_and_reset_drive_pin() {
        let state = Rc::new(Cell::new(None));
        let mut led = LedHandler::new(Pin(state.clone()));
        led.on_write(b"SET");
        assert_eq!(state.get(), Some(true));
        led.on_write(b"RESET");
        assert_eq!(state.get(), Some(false));
    }

    #[test]
    fn led_ignores_unknown_payloads() {
        let state = Rc::new(Cell::new(None));
        let mut led = LedHandler::new(Pin(state.clone()));
        led.on_write(b"SET");
        for junk in [&b"set"[..], b"", b"SETX"] {
            led.on_write(junk);
            assert_eq!(state.get(), Some(true));
        }
        assert!(led.on_read().is_none());
    }

    #[test]
    fn led_ignores_payloads_longer_than_a_command() {
        let state = Rc::new(Cell::new(None));
        let mut led = LedHandler::new(Pin(state.clone()));
        led.on_write(b"SET-BRIGHTNESS-HIGH");
        assert_eq!(state.get(), None);
        led.on_write(&[b'S'; crate::config::MAX_VALUE_LEN]);
        assert_eq!(state.get(), None);
    }

    #[test]
    fn temperature_samples_on_every_read() {
        let reads = Rc::new(Cell::new(0));
        let mut handler = TemperatureHandler::new(
            Counting {
                raw: 500,
                reads: reads.clone(),
            },
            CalibrationData::new(100, 900),
        );
        assert_eq!(reads.get(), 0);
        let value = handler.on_read().unwrap();
        assert_eq!(value.as_slice(), &1050i16.to_le_bytes());
        handler.on_read();
        assert_eq!(reads.get(), 2);
    }

    #[test]
    fn temperature_write_is_ignored() {
        let reads = Rc::new(Cell::new(0));
        let mut handler = TemperatureHandler::new(
            Counting {
                raw: 500,
                reads: reads.clone(),
            },
            CalibrationData::new(100, 900),
        );
        handler.on_write(&[0xFF, 0xFF]);
        assert_eq!(reads.get(), 0);
    }

    #[test]
    fn text_write_is_echoed_verbatim() {
        let lines = Lines::default();
        let mut text = TextHandler::new(lines.clone());
        text.on_write(b"hello \xFF peer");
        assert_eq!(lines.0.borrow().as_slice(), &[b"hello \xFF peer".to_vec()]);
        assert!(text.on_read().is_none());
    }

    #[test]
    fn text_accepts_a_full_mtu_payload() {
        let lines = Lines::default();
        let mut text = TextHandler::new(lines.clone());
        let payload = [b'x'; crate::config::MAX_VALUE_LEN];
        text.on_write(&payload);
        assert_eq!(lines.0.borrow()[0].as_slice(), &payload[..]);
    }

    #[test]
    fn switch_handler_is_inert() {
        let mut sw = SwitchHandler;
        sw.on_write(b"SW_HIGH");
        assert!(sw.on_read().is_none());
    }

    #[test]
    fn dispatch_by_characteristic() {
        let reads = Rc::new(Cell::new(0));
        let led_state = Rc::new(Cell::new(None));
        let lines = Lines::default();
        let mut handlers = Handlers::new(
            Counting {
                raw: 900,
                reads: reads.clone(),
            },
            CalibrationData::new(100, 900),
            Pin(led_state.clone()),
            lines.clone(),
        );

        handlers.handler_mut(CharacteristicId::LedControl).on_write(b"SET");
        handlers.handler_mut(CharacteristicId::Text).on_write(b"hi");
        let temp = handlers.handler_mut(CharacteristicId::Temperature).on_read();

        assert_eq!(led_state.get(), Some(true));
        assert_eq!(lines.0.borrow().len(), 1);
        assert_eq!(temp.unwrap().as_slice(), &2400i16.to_le_bytes());
        assert!(handlers
            .handler_mut(CharacteristicId::SwitchEvent)
            .on_read()
            .is_none());
    }
}
