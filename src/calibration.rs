//! Two-point ADC calibration.
//!
//! At startup the firmware samples two inputs held at known voltages
//! (one near the supply rail, one near ground) and keeps the raw readings.
//! Every later conversion interpolates between them.

pub use crate::config::{HIGH_REF_VOLTS, LOW_REF_VOLTS};

/// Analog inputs wired to the converter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogInput {
    /// Held at `HIGH_REF_VOLTS`.
    HighReference,
    /// Held at `LOW_REF_VOLTS`.
    LowReference,
    /// Temperature sensor output.
    Sensor,
}

/// Blocking "read raw sample" boundary to the ADC hardware.
pub trait AnalogSampler {
    fn sample(&mut self, input: AnalogInput) -> u16;
}

/// Raw readings of the two reference inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationData {
    pub low_raw: u16,
    pub high_raw: u16,
}

impl CalibrationData {
    pub const fn new(low_raw: u16, high_raw: u16) -> Self {
        Self { low_raw, high_raw }
    }

    /// Signed raw distance between the two references.
    pub fn span(&self) -> i32 {
        i32::from(self.high_raw) - i32::from(self.low_raw)
    }

    /// Both references read the same value; the mapping has no slope.
    pub fn is_degenerate(&self) -> bool {
        self.span() == 0
    }

    /// Map a raw sample to volts by interpolating between the references.
    ///
    /// Samples outside the calibrated range extrapolate along the same line.
    /// A degenerate pair maps every sample to `LOW_REF_VOLTS`.
    pub fn raw_to_volts(&self, raw: u16) -> f32 {
        let span = self.span();
        if span == 0 {
            return LOW_REF_VOLTS;
        }
        let offset = i32::from(raw) - i32::from(self.low_raw);
        offset as f32 * (HIGH_REF_VOLTS - LOW_REF_VOLTS) / span as f32 + LOW_REF_VOLTS
    }
}

/// Sample both references once. High first, then low.
pub fn calibrate<A: AnalogSampler>(adc: &mut A) -> CalibrationData {
    let high_raw = adc.sample(AnalogInput::HighReference);
    let low_raw = adc.sample(AnalogInput::LowReference);
    CalibrationData { low_raw, high_raw }
}
