//! Inbound commands to the application service.
//!
//! Decoded once from a remote command frame by
//! [`protocol::codec`](crate::protocol::codec) and matched exhaustively by
//! the [`AppService`](super::service::AppService).

/// Commands the remote authority can send to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCommand {
    /// Set fan duty. Already clamped to 0–255.
    SetFanSpeed(u8),

    /// Re-derive calibration offsets from a fresh sample.
    Calibrate,

    /// A `command` string the node does not recognise. Ignored.
    Unknown,
}

impl RemoteCommand {
    /// Build a fan command from any wire integer, clamping to 0–255.
    pub fn fan_speed(requested: i64) -> Self {
        Self::SetFanSpeed(requested.clamp(0, 255) as u8)
    }

    /// Map a `command` string.
    pub fn from_verb(verb: &str) -> Self {
        match verb {
            "calibrate" => Self::Calibrate,
            _ => Self::Unknown,
        }
    }
}
