//! AirSentry firmware entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter    LogEventSink   OledDisplay   SystemClock   │
//! │  (Sensor+Actuator)  (EventSink)    (DisplayPort)               │
//! │  WifiAdapter        WsTransport                                │
//! │  (Connectivity)     (LinkTransport)                            │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Calibration · Failsafe · Display pages                │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  ControlLoop: network pump · sensor 5 s · page 3 s · retry 15 s│
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{IOPin, PinDriver};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::EspWifi;
use log::{error, info, warn};

use airsentry::adapters::hardware::HardwareAdapter;
use airsentry::adapters::log_sink::LogEventSink;
use airsentry::adapters::time::SystemClock;
use airsentry::adapters::wifi::WifiAdapter;
use airsentry::adapters::ws_transport::WsTransport;
use airsentry::app::ports::ConnectivityPort;
use airsentry::app::service::AppService;
use airsentry::config::SystemConfig;
use airsentry::connectivity::ConnectivityManager;
use airsentry::diagnostics::DiagnosticKind;
use airsentry::drivers::alert::AlertIndicator;
use airsentry::drivers::fan::FanDriver;
use airsentry::drivers::hw_init;
use airsentry::drivers::oled::OledDisplay;
use airsentry::drivers::watchdog::Watchdog;
use airsentry::pins;
use airsentry::protocol::bridge::ProtocolBridge;
use airsentry::scheduler::ControlLoop;
use airsentry::sensors::SensorHub;
use airsentry::sensors::climate::ClimateSensor;
use airsentry::sensors::dust::DustSensor;
use airsentry::sensors::gas::GasSensors;

/// Idle time between loop iterations. Keeps the idle task fed.
const LOOP_IDLE_MS: u32 = 10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  AirSentry v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let clock = SystemClock::new();
    let mut sink = LogEventSink::new();

    // ── 2. Configuration ──────────────────────────────────────
    let config = {
        let candidate = SystemConfig::from_env();
        match candidate.validate() {
            Ok(()) => candidate,
            Err(e) => {
                error!("Config rejected ({}), using defaults", e);
                SystemConfig::default()
            }
        }
    };
    let mut app = AppService::new(config.clone());

    // ── 3. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {}, continuing degraded", e);
        app.record_diagnostic(clock.uptime_ms(), DiagnosticKind::HardwareInit, &mut sink);
    }
    // Only fails if taken twice.
    let peripherals = Peripherals::take()?;

    let dht_pin = match PinDriver::input_output_od(peripherals.pins.gpio4.downgrade()) {
        Ok(pin) => Some(pin),
        Err(e) => {
            error!("DHT22: GPIO{} unavailable ({}), climate readings disabled", pins::DHT22_PIN, e);
            app.record_diagnostic(clock.uptime_ms(), DiagnosticKind::HardwareInit, &mut sink);
            None
        }
    };
    let sensor_hub = SensorHub::new(GasSensors::new(), DustSensor::new(), ClimateSensor::new(dht_pin));
    let mut hw = HardwareAdapter::new(sensor_hub, FanDriver::new(), AlertIndicator::new());

    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
    );
    let mut display = match i2c {
        Ok(bus) => OledDisplay::new(bus)
            .map_err(|e| warn!("OLED unavailable ({}), running headless", e))
            .ok(),
        Err(e) => {
            let (sda, scl) = pins::I2C_PINS;
            warn!("I2C: bus on GPIO{}/GPIO{} failed ({}), running headless", sda, scl, e);
            None
        }
    };
    if display.is_none() {
        app.record_diagnostic(clock.uptime_ms(), DiagnosticKind::HardwareInit, &mut sink);
    }

    app.start(&mut sink);

    // ── 4. Wi-Fi association (bounded, blocking) ──────────────
    let nvs = EspDefaultNvsPartition::take()
        .map_err(|e| warn!("NVS: partition unavailable ({}), WiFi state not cached", e))
        .ok();
    let wifi = EspSystemEventLoop::take().and_then(|sysloop| EspWifi::new(peripherals.modem, sysloop, nvs));
    let mut link = match wifi {
        Ok(wifi) => Some(WifiAdapter::new(wifi)),
        Err(e) => {
            error!("WiFi: driver init failed ({}), running offline", e);
            app.record_diagnostic(clock.uptime_ms(), DiagnosticKind::HardwareInit, &mut sink);
            None
        }
    };
    if let Err(e) = link.set_credentials(&config.wifi_ssid, &config.wifi_password) {
        warn!("WiFi: {}", e);
    }
    let mut connectivity = ConnectivityManager::new(
        link,
        config.association_poll_interval_ms,
        config.association_max_attempts,
    );
    if let Err(e) = connectivity.associate(&mut FreeRtos) {
        warn!("Startup association failed ({}), entering offline mode", e);
    }

    // ── 5. Remote link ────────────────────────────────────────
    let url = config.endpoint_url();
    let transport = match WsTransport::connect(&url) {
        Ok(t) => Some(t),
        Err(e) => {
            error!("WS: client not started ({}), telemetry stays local", e);
            None
        }
    };
    let bridge = ProtocolBridge::new(transport, &config.device_id);

    // ── 6. Control loop ───────────────────────────────────────
    let mut control = ControlLoop::new(app, connectivity, bridge, clock.uptime_ms(), &mut sink);
    let mut watchdog = Watchdog::new();
    info!("Entering control loop");

    loop {
        control.run_iteration(clock.uptime_ms(), &mut hw, &mut display, &mut sink);
        watchdog.feed();
        FreeRtos::delay_ms(LOOP_IDLE_MS);
    }
}
