//! Temperature / humidity from the DHT22.
//!
//! The DHT22 fails a read every so often (checksum or timing). The sensor
//! keeps the last valid value so callers always have something to show;
//! the failure itself is returned so it can be recorded.
//!
//! On ESP-IDF: bit-bangs the data GPIO through [`Dht22`](crate::drivers::dht22::Dht22).
//! On host/test: reads from static atomics for injection.

use crate::error::SensorError;
use crate::sensors::ClimateReading;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_BITS: AtomicU32 = AtomicU32::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_HUMIDITY_BITS: AtomicU32 = AtomicU32::new(0);
/// 0 = ok, 1 = checksum, 2 = timeout, 3 = GPIO fault.
#[cfg(not(target_os = "espidf"))]
static SIM_FAULT: AtomicU8 = AtomicU8::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_climate(temperature_c: f32, humidity_pct: f32) {
    SIM_TEMP_BITS.store(temperature_c.to_bits(), Ordering::Relaxed);
    SIM_HUMIDITY_BITS.store(humidity_pct.to_bits(), Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_fail_climate(fault: Option<SensorError>) {
    let code = match fault {
        None => 0,
        Some(SensorError::ChecksumMismatch | SensorError::OutOfRange) => 1,
        Some(SensorError::Timeout) => 2,
        Some(SensorError::GpioFault) => 3,
    };
    SIM_FAULT.store(code, Ordering::Relaxed);
}

#[cfg(target_os = "espidf")]
pub type DhtPin = esp_idf_hal::gpio::PinDriver<
    'static,
    esp_idf_hal::gpio::AnyIOPin,
    esp_idf_hal::gpio::InputOutput,
>;

/// `None` when the data pin could not be claimed at bring-up; every read
/// then fails with [`SensorError::GpioFault`].
pub struct ClimateSensor {
    last: ClimateReading,
    failures: u32,
    #[cfg(target_os = "espidf")]
    dht: Option<crate::drivers::dht22::Dht22<DhtPin, esp_idf_hal::delay::Ets>>,
    #[cfg(not(target_os = "espidf"))]
    wired: bool,
}

impl ClimateSensor {
    #[cfg(target_os = "espidf")]
    pub fn new(pin: Option<DhtPin>) -> Self {
        Self {
            last: ClimateReading::default(),
            failures: 0,
            dht: pin.map(|p| crate::drivers::dht22::Dht22::new(p, esp_idf_hal::delay::Ets)),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            last: ClimateReading::default(),
            failures: 0,
            wired: true,
        }
    }

    /// A sensor whose data pin was never claimed.
    #[cfg(not(target_os = "espidf"))]
    pub fn unwired() -> Self {
        Self { wired: false, ..Self::new() }
    }

    /// One DHT22 transaction. On success the retained value is replaced.
    pub fn read(&mut self) -> Result<ClimateReading, SensorError> {
        match self.read_raw() {
            Ok(reading) => {
                self.last = reading;
                Ok(reading)
            }
            Err(e) => {
                self.failures = self.failures.saturating_add(1);
                log::debug!("DHT22: read failed ({}), {} total", e, self.failures);
                Err(e)
            }
        }
    }

    /// Most recent valid reading (zeros before the first success).
    pub fn last_valid(&self) -> ClimateReading {
        self.last
    }

    pub fn failure_count(&self) -> u32 {
        self.failures
    }

    #[cfg(target_os = "espidf")]
    fn read_raw(&mut self) -> Result<ClimateReading, SensorError> {
        match self.dht.as_mut() {
            Some(dht) => dht.read(),
            None => Err(SensorError::GpioFault),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_raw(&mut self) -> Result<ClimateReading, SensorError> {
        if !self.wired {
            return Err(SensorError::GpioFault);
        }
        match SIM_FAULT.load(Ordering::Relaxed) {
            1 => return Err(SensorError::ChecksumMismatch),
            2 => return Err(SensorError::Timeout),
            3 => return Err(SensorError::GpioFault),
            _ => {}
        }
        Ok(ClimateReading {
            temperature_c: f32::from_bits(SIM_TEMP_BITS.load(Ordering::Relaxed)),
            humidity_pct: f32::from_bits(SIM_HUMIDITY_BITS.load(Ordering::Relaxed)),
        })
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for ClimateSensor {
    fn default() -> Self {
        Self::new()
    }
}
