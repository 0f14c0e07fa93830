//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) and the control loop emit
//! these through the [`EventSink`](super::ports::EventSink) port.  Adapters
//! on the other side decide what to do with them.

use crate::calibration::CalibrationOffsets;
use crate::connectivity::ConnectivityState;
use crate::diagnostics::DiagnosticRecord;
use crate::protocol::frames::TelemetryFrame;
use crate::safety::FailsafeState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The application service has started.
    Started,

    /// One sensor cycle completed. Carries what went (or would go) on the wire.
    Telemetry(TelemetryFrame),

    /// Wi-Fi link state changed.
    ConnectivityChanged {
        from: ConnectivityState,
        to: ConnectivityState,
    },

    /// The failsafe moved between Safe and Alert.
    FailsafeChanged(FailsafeState),

    /// New calibration offsets are in effect.
    Calibrated(CalibrationOffsets),

    /// The remote authority set the fan duty.
    FanCommanded(u8),

    /// A diagnostic record was added.
    Diagnostic(DiagnosticRecord),
}
