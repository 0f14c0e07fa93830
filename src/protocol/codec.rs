//! JSON encode/decode for the remote link.
//!
//! Decoding is strict about shape and lenient about content: anything that
//! is not a JSON object, or carries a recognised key with the wrong type,
//! is rejected whole so a half-understood frame never changes state.
//! Unknown keys and unknown `command` verbs are ignored.

use serde::Deserialize;
use serde_json::Value;

use crate::app::commands::RemoteCommand;
use crate::error::ProtocolError;
use crate::protocol::frames::{CommandFrame, Identification, TelemetryFrame};

/// At most a fan command followed by a verb, in application order.
pub type CommandBatch = heapless::Vec<RemoteCommand, 2>;

pub fn encode_telemetry(frame: &TelemetryFrame) -> Result<String, ProtocolError> {
    serde_json::to_string(frame).map_err(|_| ProtocolError::Encode)
}

pub fn encode_identification(device_id: &str) -> Result<String, ProtocolError> {
    serde_json::to_string(&Identification::new(device_id)).map_err(|_| ProtocolError::Encode)
}

/// Decode one inbound text frame.
///
/// `fan_speed` is clamped to 0–255 whatever its magnitude, including
/// integer literals too large for `i64`/`u64` that serde_json parses as
/// floats. Values with a fractional part are malformed. An object with neither key decodes to
/// an empty batch.
pub fn decode_command(text: &str) -> Result<CommandBatch, ProtocolError> {
    let value: Value = serde_json::from_str(text).map_err(|_| ProtocolError::Malformed)?;
    if !value.is_object() {
        return Err(ProtocolError::NotAMapping);
    }
    let frame = CommandFrame::deserialize(value).map_err(|_| ProtocolError::Malformed)?;

    let mut batch = CommandBatch::new();
    if let Some(n) = frame.fan_speed {
        let requested = match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(v), _, _) => v,
            (None, Some(_), _) => i64::MAX,
            // `as` saturates at the i64 bounds.
            (None, None, Some(f)) if f.is_finite() && f.fract() == 0.0 => f as i64,
            _ => return Err(ProtocolError::Malformed),
        };
        let _ = batch.push(RemoteCommand::fan_speed(requested));
    }
    if let Some(verb) = frame.command.as_deref() {
        let _ = batch.push(RemoteCommand::from_verb(verb));
    }
    Ok(batch)
}
