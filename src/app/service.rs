//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the device state, calibration engine, failsafe and
//! display presenter. It exposes a hardware-agnostic API; all I/O flows
//! through port traits injected at call sites, so the whole service is
//! testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          AppService           │
//! ActuatorPort ◀──│ Calibration · Failsafe · UI   │ ──▶ DisplayPort
//!                 └──────────────────────────────┘
//! ```
//!
//! Every method runs to completion on the control-loop thread; nothing
//! here blocks or locks.

use log::{debug, info};

use crate::calibration::CalibrationEngine;
use crate::config::SystemConfig;
use crate::connectivity::ConnectivityState;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::display::DisplayPresenter;
use crate::protocol::frames::TelemetryFrame;
use crate::safety::FailsafeController;

use super::commands::RemoteCommand;
use super::events::AppEvent;
use super::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort};
use super::state::DeviceState;

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    config: SystemConfig,
    state: DeviceState,
    calibration: CalibrationEngine,
    failsafe: FailsafeController,
    presenter: DisplayPresenter,
    diagnostics: Diagnostics,
    /// Redraw at the end of the next network pump.
    display_dirty: bool,
    sensor_cycles: u64,
}

impl AppService {
    pub fn new(config: SystemConfig) -> Self {
        let calibration = CalibrationEngine::new(config.clean_air_floor);
        let failsafe = FailsafeController::new(config.gas_alert_threshold, config.failsafe_always_armed);
        Self {
            config,
            state: DeviceState::default(),
            calibration,
            failsafe,
            presenter: DisplayPresenter::new(),
            diagnostics: Diagnostics::new(),
            display_dirty: true,
            sensor_cycles: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
        info!(
            "AppService started (threshold={}, floor={}, always_armed={})",
            self.config.gas_alert_threshold, self.config.clean_air_floor, self.config.failsafe_always_armed
        );
    }

    // ── Remote commands ───────────────────────────────────────

    /// Apply one decoded remote command.
    pub fn handle_command(
        &mut self,
        cmd: RemoteCommand,
        hw: &mut (impl SensorPort + ActuatorPort),
        now_ms: u64,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            RemoteCommand::SetFanSpeed(duty) => {
                self.set_actuator(hw, duty, duty != 0);
                info!("CMD: fan_speed={} alert={}", duty, duty != 0);
                sink.emit(&AppEvent::FanCommanded(duty));
            }
            RemoteCommand::Calibrate => self.recalibrate(hw, now_ms, sink),
            RemoteCommand::Unknown => debug!("CMD: unrecognised command ignored"),
        }
    }

    /// Re-derive offsets from one fresh sample and start the display
    /// feedback window. The offsets are swapped in a single assignment.
    pub fn recalibrate(&mut self, sensors: &mut impl SensorPort, now_ms: u64, sink: &mut impl EventSink) {
        let offsets = self.calibration.recalibrate(sensors);
        self.state.offsets = offsets;
        self.presenter
            .begin_calibration_feedback(now_ms, self.config.calibration_feedback_ms);
        self.state.display_page = self.presenter.current_page(now_ms);
        self.display_dirty = true;
        sink.emit(&AppEvent::Calibrated(offsets));
    }

    // ── Periodic tasks ────────────────────────────────────────

    /// Sensor-read task: sample, calibrate, failsafe, build telemetry.
    ///
    /// The caller decides whether the frame goes on the wire.
    pub fn sensor_cycle(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        now_ms: u64,
        sink: &mut impl EventSink,
    ) -> TelemetryFrame {
        self.sensor_cycles += 1;

        // 1. Sample
        let raw = hw.read_channels();
        if let Some(fault) = raw.climate_fault {
            self.record_diagnostic(now_ms, DiagnosticKind::SensorFault(fault), sink);
        }

        // 2. Calibrate
        self.state.gas = self.state.offsets.apply(&raw.gas);
        self.state.climate = raw.climate;

        // 3. Failsafe (only authoritative while offline)
        if let Some(decision) = self.failsafe.evaluate(self.state.gas.mq9, self.state.connectivity) {
            self.set_actuator(hw, decision.duty, decision.alert);
            if decision.changed {
                sink.emit(&AppEvent::FailsafeChanged(decision.state));
            }
        }

        // 4. Telemetry
        let frame = TelemetryFrame::from_state(&self.state);
        sink.emit(&AppEvent::Telemetry(frame));
        frame
    }

    /// Display-toggle task.
    pub fn display_cycle(&mut self, now_ms: u64, display: &mut impl DisplayPort) {
        let page = self.presenter.on_page_tick(now_ms);
        self.state.display_page = page;
        self.draw(display);
    }

    /// Redraw if something changed since the last draw (calibration,
    /// connectivity, or an expired calibration page).
    pub fn render_if_dirty(&mut self, now_ms: u64, display: &mut impl DisplayPort) -> bool {
        if self.presenter.expire_feedback(now_ms) {
            self.display_dirty = true;
        }
        if !self.display_dirty {
            return false;
        }
        self.state.display_page = self.presenter.current_page(now_ms);
        self.draw(display);
        true
    }

    fn draw(&mut self, display: &mut impl DisplayPort) {
        let frame = DisplayPresenter::compose(self.state.display_page, &self.state);
        display.render(&frame);
        self.display_dirty = false;
    }

    // ── Connectivity ──────────────────────────────────────────

    /// Record a link state change. Returns `true` if it was a change.
    pub fn set_connectivity(&mut self, next: ConnectivityState, sink: &mut impl EventSink) -> bool {
        let from = self.state.connectivity;
        if from == next {
            return false;
        }
        self.state.connectivity = next;
        self.display_dirty = true;
        info!(
            "Link {} -> {} (failsafe {})",
            from,
            next,
            if self.failsafe.is_armed(next) { "armed" } else { "standby" }
        );
        sink.emit(&AppEvent::ConnectivityChanged { from, to: next });
        true
    }

    // ── Diagnostics ───────────────────────────────────────────

    pub fn record_diagnostic(&mut self, now_ms: u64, kind: DiagnosticKind, sink: &mut impl EventSink) {
        let record = self.diagnostics.record(now_ms, kind);
        sink.emit(&AppEvent::Diagnostic(record));
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut DeviceState {
        &mut self.state
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn failsafe(&self) -> &FailsafeController {
        &self.failsafe
    }

    pub fn sensor_cycles(&self) -> u64 {
        self.sensor_cycles
    }

    pub fn is_display_dirty(&self) -> bool {
        self.display_dirty
    }

    // ── Internal ──────────────────────────────────────────────

    fn set_actuator(&mut self, hw: &mut impl ActuatorPort, duty: u8, alert: bool) {
        hw.set_fan_duty(duty);
        hw.set_alert(alert);
        self.state.actuator.duty = duty;
        self.state.actuator.alert = alert;
    }
}
