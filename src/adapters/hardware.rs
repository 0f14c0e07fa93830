//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`], the fan and the alert indicator, and exposes
//! them through [`SensorPort`] and [`ActuatorPort`]. On non-espidf
//! targets the underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::alert::AlertIndicator;
use crate::drivers::fan::FanDriver;
use crate::sensors::{GasReadings, RawReadings, SensorHub};

pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    fan: FanDriver,
    alert: AlertIndicator,
}

impl HardwareAdapter {
    pub fn new(sensor_hub: SensorHub, fan: FanDriver, alert: AlertIndicator) -> Self {
        Self { sensor_hub, fan, alert }
    }

    pub fn fan(&self) -> &FanDriver {
        &self.fan
    }

    pub fn alert(&self) -> &AlertIndicator {
        &self.alert
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_channels(&mut self) -> RawReadings {
        self.sensor_hub.read_all()
    }

    fn read_gas(&mut self) -> GasReadings {
        self.sensor_hub.read_gas()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_fan_duty(&mut self, duty: u8) {
        self.fan.set_duty(duty);
    }

    fn set_alert(&mut self, on: bool) {
        self.alert.set(on);
    }
}
