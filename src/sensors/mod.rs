//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver and produces one [`RawReadings`] set
//! per sensor cycle. Calibration offsets are applied later by the domain;
//! nothing in here knows about them.

pub mod climate;
pub mod dust;
pub mod gas;

use serde::Serialize;

use crate::error::SensorError;
use climate::ClimateSensor;
use dust::DustSensor;
use gas::GasSensors;

/// Largest value a 12-bit ADC conversion can produce.
pub const ADC_MAX: u16 = 4095;

/// One value per gas/dust channel, in raw or calibrated ADC counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GasReadings {
    pub mq135: u16,
    pub mq8: u16,
    pub mq9: u16,
    pub dust: u16,
}

impl GasReadings {
    pub const fn new(mq135: u16, mq8: u16, mq9: u16, dust: u16) -> Self {
        Self { mq135, mq8, mq9, dust }
    }

    /// Combine two channel sets element-wise.
    pub fn zip_with(&self, other: &Self, f: impl Fn(u16, u16) -> u16) -> Self {
        Self {
            mq135: f(self.mq135, other.mq135),
            mq8: f(self.mq8, other.mq8),
            mq9: f(self.mq9, other.mq9),
            dust: f(self.dust, other.dust),
        }
    }

    /// Apply `f` to every channel.
    pub fn map(&self, f: impl Fn(u16) -> u16) -> Self {
        self.zip_with(self, |a, _| f(a))
    }
}

/// Temperature / humidity from the DHT22.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// One complete sample set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawReadings {
    pub gas: GasReadings,
    /// Last valid climate value (fresh or retained).
    pub climate: ClimateReading,
    /// Set when this cycle's DHT22 read failed and `climate` is stale.
    pub climate_fault: Option<SensorError>,
}

/// Aggregates all sensor drivers.
pub struct SensorHub {
    gas: GasSensors,
    dust: DustSensor,
    climate: ClimateSensor,
    warm_reported: bool,
}

impl SensorHub {
    pub fn new(gas: GasSensors, dust: DustSensor, climate: ClimateSensor) -> Self {
        Self { gas, dust, climate, warm_reported: false }
    }

    /// Sample every analog channel and the DHT22 once.
    pub fn read_all(&mut self) -> RawReadings {
        let gas = self.read_gas();
        let (climate, climate_fault) = match self.climate.read() {
            Ok(reading) => (reading, None),
            Err(e) => (self.climate.last_valid(), Some(e)),
        };
        RawReadings { gas, climate, climate_fault }
    }

    /// Gas/dust channels only, used by calibration.
    pub fn read_gas(&mut self) -> GasReadings {
        let (mq135, mq8, mq9) = self.gas.read();
        if !self.warm_reported && self.gas.is_warmed_up() {
            self.warm_reported = true;
            log::info!("Sensors: MQ heaters warmed up");
        }
        let dust = self.dust.read();
        GasReadings { mq135, mq8, mq9, dust }
    }
}

/// Inject raw values for every analog channel (host simulation).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_gas(raw: GasReadings) {
    gas::sim_set_adc(raw.mq135, raw.mq8, raw.mq9);
    dust::sim_set_dust_adc(raw.dust);
}
