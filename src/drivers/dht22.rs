//! DHT22 / AM2302 single-wire temperature and humidity driver.
//!
//! Bit-banged over one open-drain GPIO using `embedded-hal` 1.0 traits, so
//! the same code runs against an ESP-IDF `PinDriver` and a scripted mock.
//!
//! ## Wire format
//!
//! Host pulls the line low ≥ 1 ms, then releases it. The sensor answers
//! with 80 µs low + 80 µs high, then sends 40 bits MSB first. Every bit is
//! 50 µs low followed by a high pulse: ~26 µs = 0, ~70 µs = 1.
//!
//! ```text
//!   byte 0-1  humidity × 10      (u16, big-endian)
//!   byte 2-3  temperature × 10   (bit 15 = sign)
//!   byte 4    checksum = low byte of sum(byte 0..4)
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::SensorError;
use crate::sensors::ClimateReading;

/// High pulses longer than this are a `1` bit.
const BIT_THRESHOLD_US: u32 = 40;
/// Host start signal length.
const START_LOW_US: u32 = 1_100;
/// Wait after releasing the line before the sensor responds.
const RELEASE_US: u32 = 30;
/// Upper bound on any single phase of the handshake.
const PHASE_TIMEOUT_US: u32 = 100;

pub struct Dht22<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> Dht22<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    pub fn new(mut pin: P, delay: D) -> Self {
        // Idle high so the first start pulse is a clean falling edge.
        let _ = pin.set_high();
        Self { pin, delay }
    }

    /// Run one full transaction. Takes ~5 ms.
    pub fn read(&mut self) -> Result<ClimateReading, SensorError> {
        self.pin.set_low().map_err(|_| SensorError::GpioFault)?;
        self.delay.delay_us(START_LOW_US);
        self.pin.set_high().map_err(|_| SensorError::GpioFault)?;
        self.delay.delay_us(RELEASE_US);

        // Sensor response: low, high, then the first bit's low phase.
        self.wait_for(false, PHASE_TIMEOUT_US)?;
        self.wait_for(true, PHASE_TIMEOUT_US)?;
        self.wait_for(false, PHASE_TIMEOUT_US)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            self.wait_for(true, PHASE_TIMEOUT_US)?;
            let high_us = self.wait_for(false, PHASE_TIMEOUT_US)?;
            let byte = &mut frame[bit / 8];
            *byte <<= 1;
            if high_us > BIT_THRESHOLD_US {
                *byte |= 1;
            }
        }

        decode_frame(frame)
    }

    /// Spin until the line reaches `high`; returns the µs spent waiting.
    fn wait_for(&mut self, high: bool, timeout_us: u32) -> Result<u32, SensorError> {
        let mut elapsed = 0;
        loop {
            let level = self.pin.is_high().map_err(|_| SensorError::GpioFault)?;
            if level == high {
                return Ok(elapsed);
            }
            if elapsed >= timeout_us {
                return Err(SensorError::Timeout);
            }
            self.delay.delay_us(1);
            elapsed += 1;
        }
    }
}

/// Validate and decode a raw 5-byte frame.
pub fn decode_frame(frame: [u8; 5]) -> Result<ClimateReading, SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::ChecksumMismatch);
    }

    let humidity = u16::from_be_bytes([frame[0], frame[1]]);
    let magnitude = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]);
    let mut temperature = f32::from(magnitude) / 10.0;
    if frame[2] & 0x80 != 0 {
        temperature = -temperature;
    }
    let humidity = f32::from(humidity) / 10.0;

    // Datasheet range: -40..80 °C, 0..100 %RH.
    if !(0.0..=100.0).contains(&humidity) || !(-40.0..=80.0).contains(&temperature) {
        return Err(SensorError::OutOfRange);
    }

    Ok(ClimateReading {
        temperature_c: temperature,
        humidity_pct: humidity,
    })
}
