//! Mock adapters for integration tests.
//!
//! `MockHardware` serves scripted readings and records every actuator
//! call so tests can assert on the full command history.

use airsentry::app::events::AppEvent;
use airsentry::app::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort};
use airsentry::display::DisplayFrame;
use airsentry::sensors::{ClimateReading, GasReadings, RawReadings};

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Fan(u8),
    Alert(bool),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub raw: RawReadings,
    pub calls: Vec<ActuatorCall>,
    pub samples: u32,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            raw: RawReadings {
                gas: GasReadings::new(400, 300, 500, 250),
                climate: ClimateReading { temperature_c: 22.0, humidity_pct: 45.0 },
                climate_fault: None,
            },
            calls: Vec::new(),
            samples: 0,
        }
    }

    pub fn set_gas(&mut self, gas: GasReadings) {
        self.raw.gas = gas;
    }

    pub fn fan(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Fan(d) => Some(*d),
            ActuatorCall::Alert(_) => None,
        })
    }

    pub fn alert(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Alert(on) => Some(*on),
            ActuatorCall::Fan(_) => None,
        })
    }

    pub fn fan_writes(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, ActuatorCall::Fan(_))).count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_channels(&mut self) -> RawReadings {
        self.samples += 1;
        self.raw
    }

    fn read_gas(&mut self) -> GasReadings {
        self.samples += 1;
        self.raw.gas
    }
}

impl ActuatorPort for MockHardware {
    fn set_fan_duty(&mut self, duty: u8) {
        self.calls.push(ActuatorCall::Fan(duty));
    }

    fn set_alert(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Alert(on));
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockDisplay {
    pub frames: Vec<DisplayFrame>,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn last_first_line(&self) -> Option<String> {
        self.frames
            .last()
            .and_then(|f| f.lines().next())
            .map(str::to_owned)
    }
}

impl DisplayPort for MockDisplay {
    fn render(&mut self, frame: &DisplayFrame) {
        self.frames.push(frame.clone());
    }
}
