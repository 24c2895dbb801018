//! LM61 temperature conversion and Q1 fixed-point encoding.
//!
//! The sensor outputs `SENSOR_OFFSET_VOLTS` at 0 °C and rises by
//! `SENSOR_VOLTS_PER_DEGREE` per degree. The characteristic carries the
//! reading as tenths of a degree in a little-endian `i16`.
//!
//! The wire value is computed in integer millivolts so that readings on an
//! exact tenth are not truncated down by float rounding. The `f32` path is
//! kept for logging and for arbitrary °C inputs.

use crate::calibration::{AnalogInput, AnalogSampler, CalibrationData};
use crate::config::{
    HIGH_REF_MILLIVOLTS, LOW_REF_MILLIVOLTS, SENSOR_MILLIVOLTS_PER_DEGREE,
    SENSOR_OFFSET_MILLIVOLTS, SENSOR_OFFSET_VOLTS, SENSOR_VOLTS_PER_DEGREE,
};

/// Size of the encoded temperature value.
pub const Q1_LEN: usize = 2;

/// Convert a raw sensor sample to °C using the calibrated mapping.
pub fn raw_to_temperature(raw: u16, cal: &CalibrationData) -> f32 {
    let volts = cal.raw_to_volts(raw);
    (volts - SENSOR_OFFSET_VOLTS) / SENSOR_VOLTS_PER_DEGREE
}

/// Scale by 10 and truncate toward zero. Saturates at the `i16` bounds.
pub fn to_q1(celsius: f32) -> i16 {
    (celsius * 10.0) as i16
}

/// Exact Q1 reading of a raw sensor sample.
///
/// Evaluates `(volts - offset) / slope * 10` as one fraction over the raw
/// span and truncates toward zero once. Saturates at the `i16` bounds. A
/// degenerate calibration reads as the low reference.
pub fn raw_to_q1(raw: u16, cal: &CalibrationData) -> i16 {
    let span = i64::from(cal.span());
    let base = i64::from(LOW_REF_MILLIVOLTS - SENSOR_OFFSET_MILLIVOLTS);
    let (num, den) = if span == 0 {
        (base, 1)
    } else {
        let offset = i64::from(raw) - i64::from(cal.low_raw);
        let range = i64::from(HIGH_REF_MILLIVOLTS - LOW_REF_MILLIVOLTS);
        (base * span + offset * range, span)
    };
    let tenths = num * 10 / (i64::from(SENSOR_MILLIVOLTS_PER_DEGREE) * den);
    tenths.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16
}

/// Wire form of a Q1 reading.
pub fn encode_q1(q1: i16) -> [u8; Q1_LEN] {
    q1.to_le_bytes()
}

/// Take a fresh sensor sample and return it in Q1.
pub fn read_q1<A: AnalogSampler>(adc: &mut A, cal: &CalibrationData) -> i16 {
    let raw = adc.sample(AnalogInput::Sensor);
    raw_to_q1(raw, cal)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAL: CalibrationData = CalibrationData::new(100, 900);

    #[test]
    fn low_reference_reads_minus_thirty() {
        let t = raw_to_temperature(100, &CAL);
        assert!((t - (-30.0)).abs() < 0.01);
        assert_eq!(to_q1(t), -300);
    }

    #[test]
    fn high_reference_reads_two_forty() {
        let t = raw_to_temperature(900, &CAL);
        assert!((t - 240.0).abs() < 0.01);
        assert_eq!(to_q1(t), 2400);
    }

    #[test]
    fn midpoint_sample() {
        // 0.3 + 400/800 * 2.7 = 1.65 V -> (1.65 - 0.6) / 0.01 = 105.0 °C
        let t = raw_to_temperature(500, &CAL);
        assert!((t - 105.0).abs() < 0.01);
        assert_eq!(to_q1(t), 1050);
    }

    #[test]
    fn conversion_is_monotonic() {
        let mut prev = raw_to_temperature(0, &CAL);
        for raw in (8..=4095u16).step_by(8) {
            let t = raw_to_temperature(raw, &CAL);
            assert!(t > prev, "not increasing at raw={}", raw);
            prev = t;
        }
    }

    #[test]
    fn q1_truncates_toward_zero() {
        assert_eq!(to_q1(108.75), 1087);
        assert_eq!(to_q1(-7.79), -77);
        assert_eq!(to_q1(0.09), 0);
    }

    #[test]
    fn q1_saturates() {
        assert_eq!(to_q1(1.0e6), i16::MAX);
        assert_eq!(to_q1(-1.0e6), i16::MIN);
        assert_eq!(to_q1(f32::NAN), 0);
    }

    #[test]
    fn exact_tenths_are_not_truncated_down() {
        // 0.3 + 96/800 * 2.7 = 0.624 V -> exactly 2.4 °C.
        assert_eq!(raw_to_q1(196, &CAL), 24);
        assert_eq!(raw_to_q1(212, &CAL), 78);
        assert_eq!(raw_to_q1(180, &CAL), -30);
        assert_eq!(raw_to_q1(172, &CAL), -57);
    }

    #[test]
    fn exact_q1_matches_reference_points() {
        assert_eq!(raw_to_q1(100, &CAL), -300);
        assert_eq!(raw_to_q1(500, &CAL), 1050);
        assert_eq!(raw_to_q1(900, &CAL), 2400);
        assert_eq!(raw_to_q1(2000, &CalibrationData::new(640, 640)), -300);
    }

    #[test]
    fn exact_q1_tracks_float_path_within_one_tenth() {
        let mut prev = raw_to_q1(0, &CAL);
        for raw in 0..=4095u16 {
            let exact = raw_to_q1(raw, &CAL);
            let float = to_q1(raw_to_temperature(raw, &CAL));
            assert!((exact - float).abs() <= 1, "raw={} exact={} float={}", raw, exact, float);
            assert!(exact >= prev, "not monotonic at raw={}", raw);
            prev = exact;
        }
    }

    #[test]
    fn exact_q1_saturates() {
        let steep = CalibrationData::new(0, 1);
        assert_eq!(raw_to_q1(4095, &steep), i16::MAX);
        let inverted = CalibrationData::new(1, 0);
        assert_eq!(raw_to_q1(4095, &inverted), i16::MIN);
    }

    #[test]
    fn q1_is_little_endian() {
        assert_eq!(encode_q1(1050), [0x1A, 0x04]);
        assert_eq!(encode_q1(-300), [0xD4, 0xFE]);
    }

    #[test]
    fn degenerate_calibration_is_finite() {
        let cal = CalibrationData::new(700, 700);
        let t = raw_to_temperature(2000, &cal);
        assert!(t.is_finite());
        assert_eq!(to_q1(t), -300);
    }

    #[test]
    fn read_q1_samples_the_sensor_input() {
        struct Sensor;
        impl AnalogSampler for Sensor {
            fn sample(&mut self, input: AnalogInput) -> u16 {
                assert_eq!(input, AnalogInput::Sensor);
                300
            }
        }
        // 0.3 + 200/800 * 2.7 = 0.975 V -> 37.5 °C
        assert_eq!(read_q1(&mut Sensor, &CAL), 375);
    }
}
