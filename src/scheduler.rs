//! Cooperative scheduler and the control loop.
//!
//! One thread, run to completion, no preemption. Each iteration:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ 1. network pump                                              │
//! │    Wi-Fi poll ──▶ connectivity transition                    │
//! │    bridge.pump ──▶ remote commands applied                   │
//! │    redraw display if dirty                                   │
//! │ 2. periodic tasks, in this order, each if its period elapsed │
//! │    SensorRead    5 s   sample · calibrate · failsafe · send  │
//! │    DisplayToggle 3 s   flip page (held during calibration)   │
//! │    Reconnect    15 s   only while Disconnected               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in an iteration blocks; the caller paces iterations.

use log::debug;

use crate::app::ports::{ActuatorPort, ConnectivityPort, DisplayPort, EventSink, SensorPort};
use crate::app::service::AppService;
use crate::app::state::TaskTimestamps;
use crate::config::SystemConfig;
use crate::connectivity::{ConnectivityManager, ConnectivityState, ReconnectOutcome};
use crate::diagnostics::DiagnosticKind;
use crate::error::CommsError;
use crate::protocol::bridge::{Delivery, ProtocolBridge};
use crate::protocol::transport::LinkTransport;

// ═══════════════════════════════════════════════════════════════
//  Periodic tasks
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    SensorRead,
    DisplayToggle,
    Reconnect,
}

/// Fixed periods for the three tasks.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    sensor_period_ms: u64,
    display_period_ms: u64,
    reconnect_period_ms: u64,
}

impl Scheduler {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            sensor_period_ms: u64::from(config.sensor_read_interval_ms),
            display_period_ms: u64::from(config.display_page_interval_ms),
            reconnect_period_ms: u64::from(config.reconnect_interval_ms),
        }
    }

    /// Tasks due at `now_ms`, in run order. Stamps each due task's
    /// timestamp with `now_ms`. The reconnect task is only considered
    /// when `reconnect_armed`.
    pub fn collect_due(
        &self,
        now_ms: u64,
        last: &mut TaskTimestamps,
        reconnect_armed: bool,
    ) -> heapless::Vec<TaskKind, 3> {
        let mut due = heapless::Vec::new();
        if Self::take(now_ms, &mut last.sensor_read, self.sensor_period_ms) {
            let _ = due.push(TaskKind::SensorRead);
        }
        if Self::take(now_ms, &mut last.display_toggle, self.display_period_ms) {
            let _ = due.push(TaskKind::DisplayToggle);
        }
        if reconnect_armed && Self::take(now_ms, &mut last.reconnect, self.reconnect_period_ms) {
            let _ = due.push(TaskKind::Reconnect);
        }
        due
    }

    fn take(now_ms: u64, last: &mut u64, period_ms: u64) -> bool {
        if now_ms.saturating_sub(*last) >= period_ms {
            *last = now_ms;
            true
        } else {
            false
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Control loop
// ═══════════════════════════════════════════════════════════════

/// What one iteration did, for tests and tracing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IterationReport {
    pub events_handled: usize,
    pub ran: heapless::Vec<TaskKind, 3>,
    pub delivery: Option<Delivery>,
}

pub struct ControlLoop<C, T> {
    app: AppService,
    connectivity: ConnectivityManager<C>,
    bridge: ProtocolBridge<T>,
    scheduler: Scheduler,
    iterations: u64,
}

impl<C: ConnectivityPort, T: LinkTransport> ControlLoop<C, T> {
    /// Take ownership of the started components. `now_ms` seeds every
    /// task timestamp, so the first run of each is one period away.
    pub fn new(
        mut app: AppService,
        connectivity: ConnectivityManager<C>,
        bridge: ProtocolBridge<T>,
        now_ms: u64,
        sink: &mut impl EventSink,
    ) -> Self {
        let scheduler = Scheduler::new(app.config());
        app.set_connectivity(connectivity.state(), sink);
        app.state_mut().last_run = TaskTimestamps::seeded(now_ms);
        Self {
            app,
            connectivity,
            bridge,
            scheduler,
            iterations: 0,
        }
    }

    /// One pass of the loop. Never blocks.
    pub fn run_iteration(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) -> IterationReport {
        self.iterations += 1;
        let mut report = IterationReport::default();

        // ── 1. Network pump ──────────────────────────────────
        if let Some(t) = self.connectivity.poll() {
            self.app.set_connectivity(t.to, sink);
            if t.from == ConnectivityState::Connected && t.to == ConnectivityState::Disconnected {
                // First retry one full period after the loss.
                self.app.state_mut().last_run.reconnect = now_ms;
                self.app
                    .record_diagnostic(now_ms, DiagnosticKind::Link(CommsError::LinkLost), sink);
            }
        }
        report.events_handled = self.bridge.pump(&mut self.app, hw, now_ms, sink);
        self.app.render_if_dirty(now_ms, display);

        // ── 2. Periodic tasks ────────────────────────────────
        let reconnect_armed = self.connectivity.state() == ConnectivityState::Disconnected;
        let mut last = self.app.state().last_run;
        let due = self.scheduler.collect_due(now_ms, &mut last, reconnect_armed);
        self.app.state_mut().last_run = last;

        for task in &due {
            match task {
                TaskKind::SensorRead => {
                    let frame = self.app.sensor_cycle(hw, now_ms, sink);
                    report.delivery = Some(self.bridge.publish_telemetry(&frame));
                }
                TaskKind::DisplayToggle => self.app.display_cycle(now_ms, display),
                TaskKind::Reconnect => {
                    if let ReconnectOutcome::Refused(_) = self.connectivity.reconnect_attempt() {
                        self.app.record_diagnostic(
                            now_ms,
                            DiagnosticKind::Link(CommsError::ReconnectRefused),
                            sink,
                        );
                    }
                }
            }
        }
        if !due.is_empty() {
            debug!("Loop #{} @{}ms ran {:?}", self.iterations, now_ms, due.as_slice());
        }
        report.ran = due;
        report
    }

    pub fn app(&self) -> &AppService {
        &self.app
    }

    pub fn connectivity(&self) -> &ConnectivityManager<C> {
        &self.connectivity
    }

    pub fn connectivity_mut(&mut self) -> &mut ConnectivityManager<C> {
        &mut self.connectivity
    }

    pub fn bridge(&self) -> &ProtocolBridge<T> {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut ProtocolBridge<T> {
        &mut self.bridge
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}
