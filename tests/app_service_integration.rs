//! Integration tests: AppService → failsafe, calibration, remote commands.

use airsentry::app::commands::RemoteCommand;
use airsentry::app::events::AppEvent;
use airsentry::app::ports::{ActuatorPort, EventSink, SensorPort};
use airsentry::app::service::AppService;
use airsentry::calibration::CalibrationOffsets;
use airsentry::config::SystemConfig;
use airsentry::connectivity::ConnectivityState;
use airsentry::protocol::codec::decode_command;
use airsentry::safety::FailsafeState;
use airsentry::sensors::{GasReadings, RawReadings};

// ── Mock implementations ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum ActCall {
    Fan(u8),
    Alert(bool),
}

struct MockHw {
    raw: RawReadings,
    calls: Vec<ActCall>,
}

impl MockHw {
    fn with_gas(gas: GasReadings) -> Self {
        Self {
            raw: RawReadings { gas, ..RawReadings::default() },
            calls: Vec::new(),
        }
    }
}

impl SensorPort for MockHw {
    fn read_channels(&mut self) -> RawReadings {
        self.raw
    }
    fn read_gas(&mut self) -> GasReadings {
        self.raw.gas
    }
}

impl ActuatorPort for MockHw {
    fn set_fan_duty(&mut self, duty: u8) {
        self.calls.push(ActCall::Fan(duty));
    }
    fn set_alert(&mut self, on: bool) {
        self.calls.push(ActCall::Alert(on));
    }
}

#[derive(Default)]
struct Events(Vec<AppEvent>);

impl EventSink for Events {
    fn emit(&mut self, event: &AppEvent) {
        self.0.push(event.clone());
    }
}

fn service(connectivity: ConnectivityState) -> (AppService, Events) {
    let mut app = AppService::new(SystemConfig::default());
    let mut events = Events::default();
    app.start(&mut events);
    app.set_connectivity(connectivity, &mut events);
    (app, events)
}

// ── Scenarios ─────────────────────────────────────────────────

#[test]
fn offline_co_spike_forces_full_ventilation() {
    let (mut app, mut events) = service(ConnectivityState::Disconnected);
    let mut hw = MockHw::with_gas(GasReadings::new(400, 300, 3500, 200));

    let frame = app.sensor_cycle(&mut hw, 5_000, &mut events);

    assert_eq!(hw.calls, vec![ActCall::Fan(255), ActCall::Alert(true)]);
    assert_eq!(frame.fan_speed, 255);
    assert_eq!(app.failsafe().state(), FailsafeState::Alert);
    assert!(events.0.contains(&AppEvent::FailsafeChanged(FailsafeState::Alert)));
}

#[test]
fn offline_clean_air_turns_fan_off_again() {
    let (mut app, mut events) = service(ConnectivityState::Disconnected);
    let mut hw = MockHw::with_gas(GasReadings::new(400, 300, 3500, 200));
    app.sensor_cycle(&mut hw, 5_000, &mut events);

    hw.raw.gas.mq9 = 3000; // at threshold is still safe
    app.sensor_cycle(&mut hw, 10_000, &mut events);
    assert_eq!(hw.calls[2..], [ActCall::Fan(0), ActCall::Alert(false)]);
    assert_eq!(app.state().actuator.duty, 0);
}

#[test]
fn always_armed_failsafe_overrides_online_authority() {
    let config = SystemConfig { failsafe_always_armed: true, ..SystemConfig::default() };
    let mut app = AppService::new(config);
    let mut events = Events::default();
    app.set_connectivity(ConnectivityState::Connected, &mut events);
    let mut hw = MockHw::with_gas(GasReadings::new(0, 0, 4000, 0));

    app.sensor_cycle(&mut hw, 5_000, &mut events);
    assert_eq!(app.state().actuator.duty, 255);
}

#[test]
fn remote_fan_speed_is_clamped_to_pwm_range() {
    let (mut app, mut events) = service(ConnectivityState::Connected);
    let mut hw = MockHw::with_gas(GasReadings::default());

    for cmd in decode_command(r#"{"fan_speed": 400}"#).unwrap() {
        app.handle_command(cmd, &mut hw, 100, &mut events);
    }
    assert_eq!(hw.calls, vec![ActCall::Fan(255), ActCall::Alert(true)]);
    assert_eq!(app.state().actuator.duty, 255);
    assert!(events.0.contains(&AppEvent::FanCommanded(255)));
}

#[test]
fn calibration_derives_offsets_above_clean_air_floor() {
    let (mut app, mut events) = service(ConnectivityState::Connected);
    let mut hw = MockHw::with_gas(GasReadings::new(250, 210, 300, 190));

    app.handle_command(RemoteCommand::Calibrate, &mut hw, 100, &mut events);

    let expected = CalibrationOffsets(GasReadings::new(50, 10, 100, 0));
    assert_eq!(app.state().offsets, expected);
    assert!(events.0.contains(&AppEvent::Calibrated(expected)));
    assert!(hw.calls.is_empty(), "calibration never touches actuators");
}

#[test]
fn malformed_frame_changes_nothing() {
    let (mut app, mut events) = service(ConnectivityState::Connected);
    let before = app.state().clone();

    let err = decode_command("{\"fan_speed\": ").unwrap_err();
    app.record_diagnostic(100, airsentry::diagnostics::DiagnosticKind::MalformedFrame(err), &mut events);

    assert_eq!(app.state(), &before);
    assert_eq!(app.diagnostics().counters().malformed_frames, 1);
    assert_eq!(app.diagnostics().counters().total(), 1);

    // One record, reported once through the sink with its timestamp.
    let reported: Vec<_> = events
        .0
        .iter()
        .filter_map(|e| match e {
            AppEvent::Diagnostic(record) => Some(*record),
            _ => None,
        })
        .collect();
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].uptime_ms, 100);
    assert_eq!(reported[0].kind, airsentry::diagnostics::DiagnosticKind::MalformedFrame(err));
}

#[test]
fn telemetry_reflects_calibrated_values() {
    let (mut app, mut events) = service(ConnectivityState::Connected);
    let mut hw = MockHw::with_gas(GasReadings::new(250, 210, 300, 190));
    app.recalibrate(&mut hw, 0, &mut events);

    hw.raw.gas = GasReadings::new(260, 220, 400, 190);
    let frame = app.sensor_cycle(&mut hw, 5_000, &mut events);
    assert_eq!((frame.mq135, frame.mq8, frame.mq9, frame.dust), (210, 210, 300, 190));
}
