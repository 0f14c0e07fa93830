//! Clean-air calibration for the gas/dust channels.
//!
//! Offsets are volatile: they live in `DeviceState` and reset to zero on
//! every boot. A recalibration takes one fresh sample per channel and
//! treats anything above the clean-air floor as sensor bias.
//!
//! No plausibility check is made on the sample. Calibrating in dirty air
//! yields offsets that mask real contamination until the next
//! recalibration.

use core::fmt;

use log::info;

use crate::app::ports::SensorPort;
use crate::sensors::GasReadings;

/// Per-channel bias subtracted from every raw reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalibrationOffsets(pub GasReadings);

impl CalibrationOffsets {
    /// `offset = max(0, raw - floor)` for each channel.
    pub fn from_clean_air(sample: &GasReadings, floor: u16) -> Self {
        Self(sample.map(|raw| raw.saturating_sub(floor)))
    }

    /// `calibrated = max(0, raw - offset)` for each channel.
    pub fn apply(&self, raw: &GasReadings) -> GasReadings {
        raw.zip_with(&self.0, u16::saturating_sub)
    }

    pub fn values(&self) -> GasReadings {
        self.0
    }
}

impl fmt::Display for CalibrationOffsets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.0;
        write!(
            f,
            "mq135={} mq8={} mq9={} dust={}",
            o.mq135, o.mq8, o.mq9, o.dust
        )
    }
}

pub struct CalibrationEngine {
    clean_air_floor: u16,
    runs: u32,
}

impl CalibrationEngine {
    pub fn new(clean_air_floor: u16) -> Self {
        Self { clean_air_floor, runs: 0 }
    }

    /// Sample every gas/dust channel once and derive fresh offsets.
    ///
    /// The caller swaps the result into `DeviceState` in one assignment.
    pub fn recalibrate(&mut self, sensors: &mut impl SensorPort) -> CalibrationOffsets {
        let sample = sensors.read_gas();
        let offsets = CalibrationOffsets::from_clean_air(&sample, self.clean_air_floor);
        self.runs = self.runs.saturating_add(1);
        info!(
            "Calibration #{}: floor={} -> offsets {}",
            self.runs, self.clean_air_floor, offsets
        );
        offsets
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }
}
