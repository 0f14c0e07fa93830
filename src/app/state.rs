//! The device-state aggregate.
//!
//! `DeviceState` is created once at startup with everything zeroed and is
//! owned by the [`AppService`](super::service::AppService) for the life of
//! the process. Only the control loop mutates it.

use crate::calibration::CalibrationOffsets;
use crate::connectivity::ConnectivityState;
use crate::display::DisplayPage;
use crate::sensors::{ClimateReading, GasReadings};

// ---------------------------------------------------------------------------
// Actuator state
// ---------------------------------------------------------------------------

/// Last values written to the fan and alert indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorState {
    /// Fan PWM duty, 0–255.
    pub duty: u8,
    pub alert: bool,
}

impl ActuatorState {
    /// Fan duty as a rounded percentage for the display.
    pub fn duty_percent(&self) -> u8 {
        ((u16::from(self.duty) * 100 + 127) / 255) as u8
    }
}

// ---------------------------------------------------------------------------
// Periodic task timestamps
// ---------------------------------------------------------------------------

/// Uptime (ms) at which each periodic task last ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskTimestamps {
    pub sensor_read: u64,
    pub display_toggle: u64,
    pub reconnect: u64,
}

impl TaskTimestamps {
    /// Every task counts as having just run at `now_ms`.
    pub fn seeded(now_ms: u64) -> Self {
        Self {
            sensor_read: now_ms,
            display_toggle: now_ms,
            reconnect: now_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// DeviceState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceState {
    /// Calibrated gas/dust values from the last sensor cycle.
    pub gas: GasReadings,
    /// Last valid temperature / humidity (not offset-corrected).
    pub climate: ClimateReading,
    pub offsets: CalibrationOffsets,
    pub actuator: ActuatorState,
    pub display_page: DisplayPage,
    pub connectivity: ConnectivityState,
    pub last_run: TaskTimestamps,
}
