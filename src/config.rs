//! System configuration parameters
//!
//! All tunable parameters for the AirSentry node. The configuration is
//! static: it is built once at startup from compiled-in defaults plus
//! optional `AIRSENTRY_*` build-time environment overrides, and never
//! changes while the control loop runs.

use core::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Network credentials ---
    /// WiFi SSID (1-32 printable ASCII bytes)
    pub wifi_ssid: heapless::String<32>,
    /// WPA2 passphrase (empty for open networks)
    pub wifi_password: heapless::String<64>,

    // --- Remote endpoint ---
    /// Host name or IP of the remote authority
    pub server_host: heapless::String<64>,
    /// TCP port of the remote authority
    pub server_port: u16,
    /// WebSocket path on the remote authority
    pub server_path: heapless::String<64>,
    /// Use `wss://` (TLS) instead of `ws://`
    pub use_tls: bool,
    /// Identifier reported in the identification message
    pub device_id: heapless::String<32>,

    // --- Safety / calibration ---
    /// Calibrated MQ-9 level above which the local failsafe drives the fan
    pub gas_alert_threshold: u16,
    /// Raw clean-air baseline subtracted during calibration
    pub clean_air_floor: u16,
    /// Keep the failsafe authoritative even while connected
    pub failsafe_always_armed: bool,

    // --- Timing ---
    /// Sensor read + telemetry period (milliseconds)
    pub sensor_read_interval_ms: u32,
    /// Display page toggle period (milliseconds)
    pub display_page_interval_ms: u32,
    /// Reconnect attempt period while disconnected (milliseconds)
    pub reconnect_interval_ms: u32,
    /// Calibration feedback window on the display (milliseconds)
    pub calibration_feedback_ms: u32,
    /// Startup association poll interval (milliseconds)
    pub association_poll_interval_ms: u32,
    /// Startup association poll budget
    pub association_max_attempts: u32,
}

/// Copy `s` into a fixed-capacity string, cutting at the last whole
/// character that fits.
pub fn fixed<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Network
            wifi_ssid: fixed("airsentry"),
            wifi_password: heapless::String::new(),

            // Remote endpoint
            server_host: fixed("192.168.1.10"),
            server_port: 8000,
            server_path: fixed("/ws/edge-node"),
            use_tls: false,
            device_id: fixed("airsentry-node-01"),

            // Safety / calibration
            gas_alert_threshold: 3000,
            clean_air_floor: 200,
            failsafe_always_armed: false,

            // Timing
            sensor_read_interval_ms: 5_000,
            display_page_interval_ms: 3_000,
            reconnect_interval_ms: 15_000,
            calibration_feedback_ms: 2_000,
            association_poll_interval_ms: 500,
            association_max_attempts: 60, // 30 s total
        }
    }
}

impl SystemConfig {
    /// Defaults with compile-time `AIRSENTRY_*` overrides applied.
    ///
    /// Unparseable numeric overrides are ignored with a warning.
    pub fn from_env() -> Self {
        let mut c = Self::default();
        if let Some(v) = option_env!("AIRSENTRY_WIFI_SSID") {
            c.wifi_ssid = fixed(v);
        }
        if let Some(v) = option_env!("AIRSENTRY_WIFI_PASSWORD") {
            c.wifi_password = fixed(v);
        }
        if let Some(v) = option_env!("AIRSENTRY_SERVER_HOST") {
            c.server_host = fixed(v);
        }
        if let Some(v) = option_env!("AIRSENTRY_SERVER_PORT") {
            match v.parse() {
                Ok(port) => c.server_port = port,
                Err(_) => log::warn!("Config: ignoring AIRSENTRY_SERVER_PORT='{}'", v),
            }
        }
        if let Some(v) = option_env!("AIRSENTRY_SERVER_PATH") {
            c.server_path = fixed(v);
        }
        if let Some(v) = option_env!("AIRSENTRY_USE_TLS") {
            c.use_tls = matches!(v, "1" | "true" | "yes");
        }
        if let Some(v) = option_env!("AIRSENTRY_DEVICE_ID") {
            c.device_id = fixed(v);
        }
        c
    }

    /// Range-check every field. The first violation is reported.
    pub fn validate(&self) -> Result<()> {
        if self.wifi_ssid.is_empty() {
            return Err(Error::Config("wifi_ssid is empty"));
        }
        if self.server_host.is_empty() {
            return Err(Error::Config("server_host is empty"));
        }
        if self.server_port == 0 {
            return Err(Error::Config("server_port is zero"));
        }
        if !self.server_path.starts_with('/') {
            return Err(Error::Config("server_path must start with '/'"));
        }
        if self.device_id.is_empty() {
            return Err(Error::Config("device_id is empty"));
        }
        if self.gas_alert_threshold == 0 || self.gas_alert_threshold >= 4095 {
            return Err(Error::Config("gas_alert_threshold outside 1..4095"));
        }
        if self.clean_air_floor >= 4095 {
            return Err(Error::Config("clean_air_floor outside 0..4095"));
        }
        if self.sensor_read_interval_ms == 0
            || self.display_page_interval_ms == 0
            || self.reconnect_interval_ms == 0
        {
            return Err(Error::Config("task periods must be non-zero"));
        }
        if self.calibration_feedback_ms >= self.display_page_interval_ms {
            return Err(Error::Config(
                "calibration_feedback_ms must be shorter than the page interval",
            ));
        }
        if self.association_poll_interval_ms == 0 || self.association_max_attempts == 0 {
            return Err(Error::Config("association budget must be non-zero"));
        }
        Ok(())
    }

    /// `ws://host:port/path` or `wss://host:port/path`.
    pub fn endpoint_url(&self) -> heapless::String<160> {
        let mut url = heapless::String::new();
        let scheme = if self.use_tls { "wss" } else { "ws" };
        let _ = write!(
            url,
            "{}://{}:{}{}",
            scheme, self.server_host, self.server_port, self.server_path
        );
        url
    }

    /// Worst-case duration of the blocking startup association.
    pub fn association_budget_ms(&self) -> u32 {
        self.association_poll_interval_ms
            .saturating_mul(self.association_max_attempts)
    }
}
