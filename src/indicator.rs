//! Status indicator shared between the blink timer and connection callbacks.
//!
//! The output pin, its current level and the "timer armed" flag sit in one
//! critical-section cell, so a toggle can never interleave with the
//! connect path forcing the output on.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embedded_hal::digital::OutputPin;

struct Inner<P> {
    pin: P,
    level: bool,
    armed: bool,
}

impl<P: OutputPin> Inner<P> {
    fn drive(&mut self, level: bool) {
        self.level = level;
        let _ = if level {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
    }
}

pub struct StatusIndicator<P> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner<P>>>,
    rearmed: Signal<CriticalSectionRawMutex, ()>,
}

impl<P: OutputPin> StatusIndicator<P> {
    /// Starts armed with the output low.
    pub fn new(mut pin: P) -> Self {
        let _ = pin.set_low();
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                pin,
                level: false,
                armed: true,
            })),
            rearmed: Signal::new(),
        }
    }

    /// Timer expiry. Toggles the output if armed and returns the new level.
    pub fn tick(&self) -> Option<bool> {
        self.inner.lock(|cell| {
            let mut inner = cell.borrow_mut();
            if !inner.armed {
                return None;
            }
            let next = !inner.level;
            inner.drive(next);
            Some(next)
        })
    }

    /// Stop blinking and hold the output on.
    pub fn disarm_steady_on(&self) {
        self.inner.lock(|cell| {
            let mut inner = cell.borrow_mut();
            inner.armed = false;
            inner.drive(true);
        });
        self.rearmed.reset();
    }

    /// Resume blinking from the next timer expiry.
    pub fn arm(&self) {
        self.inner.lock(|cell| cell.borrow_mut().armed = true);
        self.rearmed.signal(());
    }

    pub fn is_armed(&self) -> bool {
        self.inner.lock(|cell| cell.borrow().armed)
    }

    /// Last level driven onto the output.
    pub fn level(&self) -> bool {
        self.inner.lock(|cell| cell.borrow().level)
    }

    /// Resolves once the timer is armed.
    pub async fn wait_armed(&self) {
        while !self.is_armed() {
            self.rearmed.wait().await;
        }
    }
}
