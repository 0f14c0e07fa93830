//! Unified error types for the AirSentry firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! control loop's error handling uniform. All variants are `Copy` so they can
//! be recorded as diagnostics without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned invalid data.
    Sensor(SensorError),
    /// A communication subsystem failed.
    Comms(CommsError),
    /// An inbound or outbound protocol frame could not be processed.
    Protocol(ProtocolError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Protocol(e) => write!(f, "protocol: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// GPIO read or write on a sensor data line failed.
    GpioFault,
    /// The sensor did not produce the expected edge in time.
    Timeout,
    /// The frame checksum did not match the payload.
    ChecksumMismatch,
    /// Decoded value is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioFault => write!(f, "GPIO fault"),
            Self::Timeout => write!(f, "timing error"),
            Self::ChecksumMismatch => write!(f, "checksum mismatch"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// Initial association did not complete within the attempt budget.
    AssociationTimeout,
    /// An established association was lost.
    LinkLost,
    /// The station refused to start a reconnect attempt.
    ReconnectRefused,
    /// The remote link is not connected; frame not sent.
    NotConnected,
    /// The transport refused or failed to send a frame.
    SendFailed,
    /// The inbound event queue overflowed and events were dropped.
    InboxOverflow,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssociationTimeout => write!(f, "WiFi association timed out"),
            Self::LinkLost => write!(f, "WiFi association lost"),
            Self::ReconnectRefused => write!(f, "WiFi reconnect refused"),
            Self::NotConnected => write!(f, "remote link not connected"),
            Self::SendFailed => write!(f, "frame send failed"),
            Self::InboxOverflow => write!(f, "inbound queue overflow"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Protocol errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Payload is not valid JSON, or a recognised key has the wrong type.
    Malformed,
    /// Payload is valid JSON but not an object.
    NotAMapping,
    /// Frame exceeds the inbound buffer.
    Oversized,
    /// Non-text frame received.
    Binary,
    /// Outbound frame could not be serialised.
    Encode,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed frame"),
            Self::NotAMapping => write!(f, "frame is not a JSON object"),
            Self::Oversized => write!(f, "frame too large"),
            Self::Binary => write!(f, "unexpected binary frame"),
            Self::Encode => write!(f, "frame encode failed"),
        }
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
