//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one structured line per
//! application event to the serial console. Prefixes are stable so the
//! log can be grepped per concern.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: u64,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.emitted += 1;
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | MQ135={} MQ8={} MQ9={} dust={} | T={:.1}\u{00b0}C RH={:.1}% | fan={}",
                    t.mq135, t.mq8, t.mq9, t.dust, t.temperature, t.humidity, t.fan_speed,
                );
            }
            AppEvent::ConnectivityChanged { from, to } => {
                info!("LINK | {} -> {}", from, to);
            }
            AppEvent::FailsafeChanged(state) => {
                warn!("FAILSAFE | {}", state);
            }
            AppEvent::Calibrated(offsets) => {
                info!("CAL | offsets {}", offsets);
            }
            AppEvent::FanCommanded(duty) => {
                info!("CMD | fan_speed={}", duty);
            }
            AppEvent::Diagnostic(record) => {
                warn!("DIAG | t={}ms | {}", record.uptime_ms, record.kind);
            }
            AppEvent::Started => {
                info!("START | air-quality node running");
            }
        }
    }
}
