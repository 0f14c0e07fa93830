//! Ventilation fan driver.
//!
//! 8-bit LEDC PWM on `FAN_PWM_GPIO` (ch0, 25 kHz). The driver is a dumb
//! actuator: the failsafe and remote commands decide the duty.
//!
//! On ESP-IDF the duty goes to the LEDC peripheral; on the host only the
//! last commanded value is tracked.

use crate::drivers::hw_init;

pub struct FanDriver {
    duty: u8,
}

impl Default for FanDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FanDriver {
    /// Starts with the fan stopped.
    pub fn new() -> Self {
        hw_init::ledc_set(hw_init::LEDC_CH_FAN, 0);
        Self { duty: 0 }
    }

    pub fn set_duty(&mut self, duty: u8) {
        if duty != self.duty {
            log::debug!("Fan: duty {} -> {}", self.duty, duty);
        }
        hw_init::ledc_set(hw_init::LEDC_CH_FAN, duty);
        self.duty = duty;
    }

    pub fn stop(&mut self) {
        self.set_duty(0);
    }

    pub fn duty(&self) -> u8 {
        self.duty
    }

    pub fn is_running(&self) -> bool {
        self.duty != 0
    }
}
