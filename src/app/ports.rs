//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, display, event sinks, Wi-Fi)
//! implement these traits. The [`AppService`](super::service::AppService)
//! and the control loop consume them via generics, so the domain core never
//! touches hardware directly.

use core::fmt;

use crate::display::DisplayFrame;
use crate::sensors::{GasReadings, RawReadings};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain raw sensor data.
pub trait SensorPort {
    /// Sample every gas/dust channel and the climate sensor once.
    fn read_channels(&mut self) -> RawReadings;

    /// Sample the gas/dust channels only (calibration path).
    fn read_gas(&mut self) -> GasReadings;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Set the ventilation fan PWM duty (0–255).
    fn set_fan_duty(&mut self, duty: u8);

    /// Drive the alert indicator.
    fn set_alert(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → OLED)
// ───────────────────────────────────────────────────────────────

/// Renders a composed text frame on the local status display.
pub trait DisplayPort {
    fn render(&mut self, frame: &DisplayFrame);
}

/// A missing display (bring-up failed) renders nothing.
impl<D: DisplayPort> DisplayPort for Option<D> {
    fn render(&mut self, frame: &DisplayFrame) {
        if let Some(display) = self {
            display.render(frame);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Connectivity port (driven adapter: domain ↔ Wi-Fi station)
// ───────────────────────────────────────────────────────────────

/// Station-mode link to the access point.
///
/// `begin_association` must not block: it starts a connect attempt and
/// returns. Progress is observed through `is_associated`.
pub trait ConnectivityPort {
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError>;
    fn begin_association(&mut self) -> Result<(), ConnectivityError>;
    fn disconnect(&mut self);
    fn is_associated(&mut self) -> bool;
}

/// A radio that failed bring-up stays offline and refuses every attempt.
impl<C: ConnectivityPort> ConnectivityPort for Option<C> {
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        self.as_mut()
            .ok_or(ConnectivityError::Unavailable)?
            .set_credentials(ssid, password)
    }

    fn begin_association(&mut self) -> Result<(), ConnectivityError> {
        self.as_mut().ok_or(ConnectivityError::Unavailable)?.begin_association()
    }

    fn disconnect(&mut self) {
        if let Some(link) = self {
            link.disconnect();
        }
    }

    fn is_associated(&mut self) -> bool {
        self.as_mut().is_some_and(C::is_associated)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    AssociationFailed,
    /// The Wi-Fi driver could not be brought up.
    Unavailable,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::AssociationFailed => write!(f, "WiFi association could not be started"),
            Self::Unavailable => write!(f, "WiFi driver unavailable"),
        }
    }
}
