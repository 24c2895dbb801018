//! The peripheral context: every piece of shared state, built once at
//! startup and handed by reference to the BLE callbacks, the blink timer
//! and the switch tasks.


use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::digital::OutputPin;

use crate::calibration::{self, AnalogSampler, CalibrationData};
use crate::connection::{ConnectionState, ConnectionStateMachine, Transition};
use crate::error::Error;
use crate::gatt::{CharacteristicId, GattValues, Value};
use crate::handlers::{DebugSink, Handlers};
use crate::indicator::StatusIndicator;
use crate::switch::SwitchNotifier;

pub struct SensorPeripheral<A, L, S, D> {
    calibration: CalibrationData,
    connection: ConnectionStateMachine,
    indicator: StatusIndicator<S>,
    switch: SwitchNotifier,
    handlers: Mutex<CriticalSectionRawMutex, RefCell<Handlers<A, L, D>>>,
}

impl<A, L, S, D> SensorPeripheral<A, L, S, D>
where
    A: AnalogSampler,
    L: OutputPin,
    S: OutputPin,
    D: DebugSink,
{
    /// Calibrate the ADC, then build the context around it.
    pub fn start(mut adc: A, led: L, status: S, sink: D) -> Self {
        let calibration = calibration::calibrate(&mut adc);
        Self::new(calibration, adc, led, status, sink)
    }

    pub fn new(calibration: CalibrationData, adc: A, led: L, status: S, sink: D) -> Self {
        Self {
            calibration,
            connection: ConnectionStateMachine::new(),
            indicator: StatusIndicator::new(status),
            switch: SwitchNotifier::new(),
            handlers: Mutex::new(RefCell::new(Handlers::new(adc, calibration, led, sink))),
        }
    }

    pub fn calibration(&self) -> CalibrationData {
        self.calibration
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn indicator(&self) -> &StatusIndicator<S> {
        &self.indicator
    }

    pub fn switch(&self) -> &SwitchNotifier {
        &self.switch
    }

    /// GATT service is registered and advertising is starting.
    pub fn provisioned(&self) -> Option<Transition> {
        self.connection.provisioned(&self.indicator)
    }

    pub fn on_connect(&self) -> Option<Transition> {
        self.connection.connected(&self.indicator)
    }

    pub fn on_disconnect(&self) -> Option<Transition> {
        self.connection.disconnected(&self.indicator)
    }

    /// Peer read. Returns the value to serve, or `None` to serve the stored one.
    pub fn on_read(&self, id: CharacteristicId) -> Option<Value> {
        self.handlers
            .lock(|cell| cell.borrow_mut().handler_mut(id).on_read())
    }

    pub fn on_write(&self, id: CharacteristicId, data: &[u8]) {
        self.handlers
            .lock(|cell| cell.borrow_mut().handler_mut(id).on_write(data))
    }

    /// Blink timer expiry.
    pub fn on_timer_tick(&self) -> Option<bool> {
        self.indicator.tick()
    }

    /// Switch falling edge. Only enqueues.
    pub fn on_switch_edge(&self) -> Result<(), Error> {
        if self.switch.on_falling_edge() {
            Ok(())
        } else {
            Err(Error::SwitchQueueFull)
        }
    }

    /// Push one queued switch edge to the stack, from task context.
    pub fn publish_switch_event<G: GattValues>(&self, gatt: &G) -> Result<(), Error> {
        self.switch.publish(gatt)
    }
}
