//! SAADC sampler.
//!
//! Three single-ended channels scanned together:
//!   AIN0 (P0.02) - high reference
//!   AIN1 (P0.03) - low reference
//!   AIN2 (P0.04) - temperature sensor

use ble_sensor::{AnalogInput, AnalogSampler};
use embassy_futures::block_on;
use embassy_nrf::saadc::{self, ChannelConfig, Saadc};
use embassy_nrf::{bind_interrupts, peripherals};

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
});

const CHANNELS: usize = 3;

pub struct SaadcSampler {
    saadc: Saadc<'static, CHANNELS>,
}

impl SaadcSampler {
    /// Configure the channels and run the SAADC offset calibration.
    pub async fn new(
        saadc: peripherals::SAADC,
        high_ref: peripherals::P0_02,
        low_ref: peripherals::P0_03,
        sensor: peripherals::P0_04,
    ) -> Self {
        let channels = [
            ChannelConfig::single_ended(high_ref),
            ChannelConfig::single_ended(low_ref),
            ChannelConfig::single_ended(sensor),
        ];
        let saadc = Saadc::new(saadc, Irqs, saadc::Config::default(), channels);
        saadc.calibrate().await;
        Self { saadc }
    }
}

impl AnalogSampler for SaadcSampler {
    /// Conversions finish within a few microseconds, so the scan is polled
    /// to completion in place.
    fn sample(&mut self, input: AnalogInput) -> u16 {
        let mut buf = [0i16; CHANNELS];
        block_on(self.saadc.sample(&mut buf));

        let index = match input {
            AnalogInput::HighReference => 0,
            AnalogInput::LowReference => 1,
            AnalogInput::Sensor => 2,
        };
        // Single-ended readings dip slightly below zero near ground.
        buf[index].max(0) as u16
    }
}
