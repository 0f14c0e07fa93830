//! Alert indicator: a single active-high GPIO (LED or buzzer).

use crate::drivers::hw_init;
use crate::pins;

pub struct AlertIndicator {
    on: bool,
}

impl Default for AlertIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertIndicator {
    pub fn new() -> Self {
        hw_init::gpio_write(pins::ALERT_GPIO, false);
        Self { on: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(pins::ALERT_GPIO, on);
        self.on = on;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
