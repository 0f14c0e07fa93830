//! Wi-Fi station-mode adapter.
//!
//! Implements [`ConnectivityPort`]. `begin_association` only kicks off a
//! connect attempt; the [`ConnectivityManager`](crate::connectivity::ConnectivityManager)
//! polls `is_associated` for progress.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::wifi::EspWifi` in STA mode.
//! - **all other targets**: an in-memory access point the tests can take
//!   down and bring back.

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::ports::{ConnectivityError, ConnectivityPort};

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

pub fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

/// Empty means an open network.
pub fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if !password.is_empty() && !(8..=64).contains(&password.len()) {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    attempts: u32,
    #[cfg(target_os = "espidf")]
    wifi: EspWifi<'static>,
    #[cfg(not(target_os = "espidf"))]
    sim: SimAccessPoint,
}

/// Host stand-in for the access point and the radio.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone, Copy)]
struct SimAccessPoint {
    reachable: bool,
    started: bool,
    refuse: bool,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(wifi: EspWifi<'static>) -> Self {
        Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            attempts: 0,
            wifi,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            attempts: 0,
            sim: SimAccessPoint { reachable: true, started: false, refuse: false },
        }
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    /// Association attempts started since boot.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_begin(&mut self) -> Result<(), ConnectivityError> {
        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let client = ClientConfiguration {
            ssid: self.ssid.as_str().try_into().map_err(|_| ConnectivityError::InvalidSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        };
        self.start_connect(client).map_err(|e| {
            warn!("WiFi: connect request failed: {}", e);
            ConnectivityError::AssociationFailed
        })
    }

    #[cfg(target_os = "espidf")]
    fn start_connect(&mut self, client: ClientConfiguration) -> Result<(), esp_idf_svc::sys::EspError> {
        self.wifi.set_configuration(&Configuration::Client(client))?;
        if !self.wifi.is_started()? {
            self.wifi.start()?;
        }
        self.wifi.connect()
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_begin(&mut self) -> Result<(), ConnectivityError> {
        if self.sim.refuse {
            return Err(ConnectivityError::AssociationFailed);
        }
        self.sim.started = true;
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        if let Err(e) = self.wifi.disconnect() {
            warn!("WiFi: disconnect returned {}", e);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        self.sim.started = false;
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_up(&mut self) -> bool {
        self.wifi.is_up().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_up(&mut self) -> bool {
        self.sim.started && self.sim.reachable
    }

    // ── Host simulation controls ──────────────────────────────

    /// Take the simulated access point down or bring it back.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_reachable(&mut self, reachable: bool) {
        self.sim.reachable = reachable;
    }

    /// Make the radio refuse to start connect attempts.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_refuse_association(&mut self, refuse: bool) {
        self.sim.refuse = refuse;
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid.push_str(ssid).map_err(|()| ConnectivityError::InvalidSsid)?;
        self.password.clear();
        self.password.push_str(password).map_err(|()| ConnectivityError::InvalidPassword)?;
        info!("WiFi: credentials set (SSID='{}')", self.ssid);
        Ok(())
    }

    fn begin_association(&mut self) -> Result<(), ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        self.attempts = self.attempts.saturating_add(1);
        info!("WiFi: associating with '{}' (attempt {})", self.ssid, self.attempts);
        self.platform_begin()
    }

    fn disconnect(&mut self) {
        self.platform_disconnect();
    }

    fn is_associated(&mut self) -> bool {
        self.platform_is_up()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
