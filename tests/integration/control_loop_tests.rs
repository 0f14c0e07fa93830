//! End-to-end control loop: host Wi-Fi adapter, loopback transport,
//! mock hardware.

use airsentry::adapters::wifi::WifiAdapter;
use airsentry::app::ports::ConnectivityPort;
use airsentry::app::service::AppService;
use airsentry::config::SystemConfig;
use airsentry::connectivity::{ConnectivityManager, ConnectivityState};
use airsentry::diagnostics::DiagnosticKind;
use airsentry::error::CommsError;
use airsentry::drivers::oled::SimDisplay;
use airsentry::protocol::bridge::{Delivery, ProtocolBridge};
use airsentry::protocol::transport::LoopbackTransport;
use airsentry::scheduler::{ControlLoop, TaskKind};
use airsentry::sensors::GasReadings;
use embedded_hal::delay::DelayNs;

use crate::mock_hw::{ActuatorCall, MockDisplay, MockHardware, RecordingSink};

type Loop = ControlLoop<WifiAdapter, LoopbackTransport>;

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fn rig(ap_reachable: bool) -> (Loop, MockHardware, RecordingSink) {
    let config = SystemConfig::default();
    let mut sink = RecordingSink::default();
    let mut app = AppService::new(config.clone());
    app.start(&mut sink);

    let mut wifi = WifiAdapter::new();
    wifi.set_credentials("Lab", "password1").unwrap();
    wifi.sim_set_reachable(ap_reachable);
    let mut connectivity = ConnectivityManager::new(
        wifi,
        config.association_poll_interval_ms,
        config.association_max_attempts,
    );
    let _ = connectivity.associate(&mut NoDelay);

    let bridge = ProtocolBridge::new(LoopbackTransport::new(), "node-test");
    let control = ControlLoop::new(app, connectivity, bridge, 0, &mut sink);
    (control, MockHardware::new(), sink)
}

fn online_rig() -> (Loop, MockHardware, RecordingSink) {
    let (mut control, hw, sink) = rig(true);
    control.bridge_mut().transport_mut().inject_connected();
    (control, hw, sink)
}

#[test]
fn offline_high_co_drives_fan_and_alert() {
    let (mut control, mut hw, mut sink) = rig(false);
    let mut display = MockDisplay::default();
    assert_eq!(control.connectivity().state(), ConnectivityState::Disconnected);

    hw.set_gas(GasReadings::new(400, 300, 3500, 250));
    let report = control.run_iteration(5_000, &mut hw, &mut display, &mut sink);

    assert!(report.ran.contains(&TaskKind::SensorRead));
    assert_eq!(report.delivery, Some(Delivery::RecordedLocally));
    assert_eq!(hw.fan(), Some(255));
    assert_eq!(hw.alert(), Some(true));
    assert_eq!(control.app().state().actuator.duty, 255);
}

#[test]
fn node_without_radio_still_runs_the_failsafe() {
    let config = SystemConfig::default();
    let mut sink = RecordingSink::default();
    let mut app = AppService::new(config.clone());
    app.start(&mut sink);
    let mut connectivity = ConnectivityManager::new(None::<WifiAdapter>, 500, 60);
    let _ = connectivity.associate(&mut NoDelay);
    let bridge = ProtocolBridge::new(LoopbackTransport::new(), "node-test");
    let mut control = ControlLoop::new(app, connectivity, bridge, 0, &mut sink);

    let mut hw = MockHardware::new();
    let mut display = MockDisplay::default();
    hw.set_gas(GasReadings::new(400, 300, 3500, 250));
    control.run_iteration(5_000, &mut hw, &mut display, &mut sink);
    assert_eq!(hw.fan(), Some(255));
    assert_eq!(hw.alert(), Some(true));

    let report = control.run_iteration(15_000, &mut hw, &mut display, &mut sink);
    assert!(report.ran.contains(&TaskKind::Reconnect));
    assert_eq!(control.connectivity().state(), ConnectivityState::Disconnected);
}

#[test]
fn online_node_identifies_then_streams_without_failsafe() {
    let (mut control, mut hw, mut sink) = online_rig();
    let mut display = MockDisplay::default();
    hw.set_gas(GasReadings::new(400, 300, 3500, 250));

    let report = control.run_iteration(10, &mut hw, &mut display, &mut sink);
    assert_eq!(report.events_handled, 1);
    assert_eq!(
        control.bridge().transport().sent(),
        [r#"{"status":"device_connected","device_id":"node-test"}"#]
    );

    let report = control.run_iteration(5_000, &mut hw, &mut display, &mut sink);
    assert_eq!(report.delivery, Some(Delivery::Sent));
    assert_eq!(hw.fan_writes(), 0, "remote authority owns the fan while online");

    let sent = control.bridge_mut().transport_mut().take_sent();
    let telemetry: serde_json::Value = serde_json::from_str(&sent[1]).unwrap();
    assert_eq!(telemetry["mq9"], 3500);
    assert_eq!(telemetry["fan_speed"], 0);
}

#[test]
fn remote_fan_command_is_clamped_and_reported() {
    let (mut control, mut hw, mut sink) = online_rig();
    let mut display = MockDisplay::default();
    assert!(control.bridge().transport().inject_text(r#"{"fan_speed": 400}"#));

    control.run_iteration(10, &mut hw, &mut display, &mut sink);
    assert_eq!(hw.fan(), Some(255));
    assert_eq!(hw.alert(), Some(true));

    control.run_iteration(5_000, &mut hw, &mut display, &mut sink);
    let sent = control.bridge().transport().sent();
    let telemetry: serde_json::Value = serde_json::from_str(sent.last().unwrap()).unwrap();
    assert_eq!(telemetry["fan_speed"], 255);
}

#[test]
fn fan_zero_clears_alert() {
    let (mut control, mut hw, mut sink) = online_rig();
    let mut display = MockDisplay::default();
    control.bridge().transport().inject_text(r#"{"fan_speed": 120}"#);
    control.bridge().transport().inject_text(r#"{"fan_speed": 0}"#);
    control.run_iteration(10, &mut hw, &mut display, &mut sink);
    assert_eq!(hw.fan(), Some(0));
    assert_eq!(hw.alert(), Some(false));
}

#[test]
fn remote_calibration_updates_offsets_and_display() {
    let (mut control, mut hw, mut sink) = online_rig();
    let mut display = SimDisplay::new();
    hw.set_gas(GasReadings::new(250, 210, 300, 190));
    control.bridge().transport().inject_text(r#"{"command":"calibrate"}"#);

    control.run_iteration(1_000, &mut hw, &mut display, &mut sink);
    assert_eq!(
        control.app().state().offsets.values(),
        GasReadings::new(50, 10, 100, 0)
    );
    let first = display.last_frame().and_then(|f| f.lines().next());
    assert_eq!(first, Some("Calibrating..."));

    // Next sample is reported against the new baseline.
    control.run_iteration(5_000, &mut hw, &mut display, &mut sink);
    assert_eq!(control.app().state().gas, GasReadings::new(200, 200, 200, 190));
}

#[test]
fn calibration_lands_before_the_same_cycle_sample() {
    let (mut control, mut hw, mut sink) = online_rig();
    let mut display = MockDisplay::default();
    hw.set_gas(GasReadings::new(250, 210, 300, 190));
    control.bridge().transport().inject_text(r#"{"command":"calibrate"}"#);

    let report = control.run_iteration(5_000, &mut hw, &mut display, &mut sink);
    assert!(report.ran.contains(&TaskKind::SensorRead));
    assert_eq!(report.delivery, Some(Delivery::Sent));

    let sent = control.bridge().transport().sent();
    let telemetry: serde_json::Value = serde_json::from_str(sent.last().unwrap()).unwrap();
    assert_eq!(telemetry["mq135"], 200);
    assert_eq!(telemetry["mq8"], 200);
    assert_eq!(telemetry["mq9"], 200);
    assert_eq!(telemetry["dust"], 190);
}

#[test]
fn failsafe_overrides_fan_command_from_the_same_cycle() {
    let (mut control, mut hw, mut sink) = rig(false);
    let mut display = MockDisplay::default();
    hw.set_gas(GasReadings::new(400, 300, 3500, 250));
    control.bridge_mut().transport_mut().inject_connected();
    control.bridge().transport().inject_text(r#"{"fan_speed": 0}"#);

    control.run_iteration(5_000, &mut hw, &mut display, &mut sink);

    let fan_writes: Vec<_> = hw
        .calls
        .iter()
        .filter_map(|c| match c {
            ActuatorCall::Fan(d) => Some(*d),
            ActuatorCall::Alert(_) => None,
        })
        .collect();
    assert_eq!(fan_writes, [0, 255]);
    assert_eq!(hw.alert(), Some(true));
    assert_eq!(control.app().state().actuator.duty, 255);
}

#[test]
fn malformed_frame_leaves_state_untouched() {
    let (mut control, mut hw, mut sink) = online_rig();
    let mut display = MockDisplay::default();
    control.run_iteration(10, &mut hw, &mut display, &mut sink);
    let before = control.app().state().clone();
    let calls_before = hw.calls.len();

    control.bridge().transport().inject_text("{fan_speed: 255");
    control.run_iteration(20, &mut hw, &mut display, &mut sink);

    assert_eq!(control.app().state(), &before);
    assert_eq!(hw.calls.len(), calls_before);
    assert_eq!(control.app().diagnostics().counters().malformed_frames, 1);
    assert_eq!(control.bridge().stats().frames_dropped, 1);
}

#[test]
fn link_loss_arms_failsafe_and_schedules_reconnect() {
    let (mut control, mut hw, mut sink) = rig(true);
    let mut display = MockDisplay::default();
    assert_eq!(control.connectivity().state(), ConnectivityState::Connected);

    control.connectivity_mut().link_mut().sim_set_reachable(false);
    control.run_iteration(1_000, &mut hw, &mut display, &mut sink);
    assert_eq!(control.connectivity().state(), ConnectivityState::Disconnected);
    assert_eq!(control.app().state().connectivity, ConnectivityState::Disconnected);
    assert_eq!(control.app().diagnostics().counters().link_faults, 1);

    // First retry one full period after the loss.
    let report = control.run_iteration(15_999, &mut hw, &mut display, &mut sink);
    assert!(!report.ran.contains(&TaskKind::Reconnect));
    let report = control.run_iteration(16_000, &mut hw, &mut display, &mut sink);
    assert!(report.ran.contains(&TaskKind::Reconnect));
    assert_eq!(control.connectivity().reconnect_attempts(), 1);

    control.connectivity_mut().link_mut().sim_set_reachable(true);
    control.run_iteration(16_010, &mut hw, &mut display, &mut sink);
    assert_eq!(control.connectivity().state(), ConnectivityState::Connected);
    assert_eq!(control.connectivity().reconnect_attempts(), 0);
}

#[test]
fn refused_reconnect_is_recorded_as_such() {
    let (mut control, mut hw, mut sink) = rig(false);
    let mut display = MockDisplay::default();
    control.connectivity_mut().link_mut().sim_refuse_association(true);

    let report = control.run_iteration(15_000, &mut hw, &mut display, &mut sink);
    assert!(report.ran.contains(&TaskKind::Reconnect));
    assert_eq!(
        control.app().diagnostics().last().map(|r| r.kind),
        Some(DiagnosticKind::Link(CommsError::ReconnectRefused))
    );
    assert_eq!(control.connectivity().state(), ConnectivityState::Disconnected);
}

#[test]
fn reconnect_never_runs_while_connected() {
    let (mut control, mut hw, mut sink) = rig(true);
    let mut display = MockDisplay::default();
    for step in 1..=10u64 {
        let report = control.run_iteration(step * 15_000, &mut hw, &mut display, &mut sink);
        assert!(!report.ran.contains(&TaskKind::Reconnect));
    }
    assert_eq!(control.connectivity().link().attempts(), 1);
}

#[test]
fn display_alternates_pages() {
    let (mut control, mut hw, mut sink) = rig(true);
    let mut display = MockDisplay::default();

    control.run_iteration(10, &mut hw, &mut display, &mut sink);
    assert!(display.last_first_line().unwrap().starts_with("MQ135:"));

    control.run_iteration(3_000, &mut hw, &mut display, &mut sink);
    assert!(display.last_first_line().unwrap().starts_with("Temp:"));

    control.run_iteration(6_000, &mut hw, &mut display, &mut sink);
    assert!(display.last_first_line().unwrap().starts_with("MQ135:"));
}
