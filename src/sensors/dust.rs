//! GP2Y1010 optical dust sensor.
//!
//! The IR LED is pulsed (active LOW) and the output is sampled 280 µs into
//! the pulse, then the LED is released.

use core::sync::atomic::{AtomicU16, Ordering};

use crate::drivers::hw_init;
use crate::pins;

static SIM_DUST_ADC: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_dust_adc(raw: u16) {
    SIM_DUST_ADC.store(raw, Ordering::Relaxed);
}

#[derive(Debug, Default)]
pub struct DustSensor;

impl DustSensor {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&mut self) -> u16 {
        hw_init::gpio_write(pins::DUST_LED_GPIO, false);
        hw_init::delay_us(pins::DUST_SAMPLE_DELAY_US);
        let raw = self.read_adc();
        hw_init::gpio_write(pins::DUST_LED_GPIO, true);
        raw
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(pins::DUST_ADC_CHANNEL)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_DUST_ADC.load(Ordering::Relaxed).min(super::ADC_MAX)
    }
}
