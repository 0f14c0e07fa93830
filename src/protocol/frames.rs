//! Wire-level message shapes.
//!
//! Outbound:
//! ```text
//! {"mq135":412,"mq8":97,"mq9":3100,"dust":180,"temperature":23.4,"humidity":45.6,"fan_speed":255}
//! {"status":"device_connected","device_id":"airsentry-node-01"}
//! ```
//!
//! Inbound (either key optional, unknown keys ignored):
//! ```text
//! {"fan_speed":128,"command":"calibrate"}
//! ```

use serde::{Deserialize, Serialize};

use crate::app::state::DeviceState;

/// One per sensor cycle. Gas values are calibrated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetryFrame {
    pub mq135: u16,
    pub mq8: u16,
    pub mq9: u16,
    pub dust: u16,
    pub temperature: f32,
    pub humidity: f32,
    pub fan_speed: u8,
}

impl TelemetryFrame {
    pub fn from_state(state: &DeviceState) -> Self {
        Self {
            mq135: state.gas.mq135,
            mq8: state.gas.mq8,
            mq9: state.gas.mq9,
            dust: state.gas.dust,
            temperature: state.climate.temperature_c,
            humidity: state.climate.humidity_pct,
            fan_speed: state.actuator.duty,
        }
    }
}

pub const STATUS_CONNECTED: &str = "device_connected";

/// Sent once each time the WebSocket connects.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Identification<'a> {
    pub status: &'static str,
    pub device_id: &'a str,
}

impl<'a> Identification<'a> {
    pub fn new(device_id: &'a str) -> Self {
        Self {
            status: STATUS_CONNECTED,
            device_id,
        }
    }
}

/// Inbound command object. A `null` value counts as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandFrame {
    #[serde(default)]
    pub fan_speed: Option<serde_json::Number>,
    #[serde(default)]
    pub command: Option<String>,
}
