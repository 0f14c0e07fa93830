//! Runtime diagnostics.
//!
//! Nothing in normal operation is fatal, so every recoverable fault the
//! node swallows is recorded here instead: per-kind counters plus a small
//! ring of the most recent records. Nothing is persisted; the history
//! resets on reboot.

use core::fmt;

use crate::error::{CommsError, ProtocolError, SensorError};

const RECENT_CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Inbound frame dropped without any state change.
    MalformedFrame(ProtocolError),
    /// Sensor read failed; previous value retained.
    SensorFault(SensorError),
    /// Link or transport fault (association, overflow, send).
    Link(CommsError),
    /// A peripheral did not come up at boot.
    HardwareInit,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedFrame(e) => write!(f, "dropped frame: {e}"),
            Self::SensorFault(e) => write!(f, "sensor fault: {e}"),
            Self::Link(e) => write!(f, "link: {e}"),
            Self::HardwareInit => write!(f, "hardware bring-up incomplete"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticRecord {
    pub uptime_ms: u64,
    pub kind: DiagnosticKind,
}

/// Per-kind totals since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticCounters {
    pub malformed_frames: u32,
    pub sensor_faults: u32,
    pub link_faults: u32,
    pub hardware_faults: u32,
}

impl DiagnosticCounters {
    pub fn total(&self) -> u32 {
        self.malformed_frames
            .saturating_add(self.sensor_faults)
            .saturating_add(self.link_faults)
            .saturating_add(self.hardware_faults)
    }
}

#[derive(Default)]
pub struct Diagnostics {
    counters: DiagnosticCounters,
    recent: heapless::Deque<DiagnosticRecord, RECENT_CAPACITY>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count and keep one record, evicting the oldest when full.
    pub fn record(&mut self, uptime_ms: u64, kind: DiagnosticKind) -> DiagnosticRecord {
        let c = &mut self.counters;
        let counter = match kind {
            DiagnosticKind::MalformedFrame(_) => &mut c.malformed_frames,
            DiagnosticKind::SensorFault(_) => &mut c.sensor_faults,
            DiagnosticKind::Link(_) => &mut c.link_faults,
            DiagnosticKind::HardwareInit => &mut c.hardware_faults,
        };
        *counter = counter.saturating_add(1);

        let record = DiagnosticRecord { uptime_ms, kind };
        if self.recent.is_full() {
            self.recent.pop_front();
        }
        let _ = self.recent.push_back(record);
        record
    }

    pub fn counters(&self) -> DiagnosticCounters {
        self.counters
    }

    /// Oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &DiagnosticRecord> {
        self.recent.iter()
    }

    pub fn last(&self) -> Option<&DiagnosticRecord> {
        self.recent.back()
    }
}
