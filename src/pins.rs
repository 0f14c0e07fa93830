//! GPIO / peripheral pin assignments for the AirSentry node (classic ESP32
//! DevKit).
//!
//! The raw-register drivers (ADC, LEDC, plain GPIO outputs) take their
//! numbers from here. Pins driven through `esp-idf-hal` (the DHT22 data
//! line and the I²C bus) are typed `Peripherals` fields claimed in
//! `main`; [`DHT22_PIN`] and [`I2C_PINS`] name them for the log and must
//! match those fields.

// ---------------------------------------------------------------------------
// Gas / dust sensors — Analog (ADC1, input-only pins)
// ---------------------------------------------------------------------------

/// MQ-135 air-quality sensor. ADC1 channel 6 (GPIO 34).
pub const MQ135_ADC_CHANNEL: u32 = 6;

/// MQ-8 hydrogen sensor. ADC1 channel 7 (GPIO 35).
pub const MQ8_ADC_CHANNEL: u32 = 7;

/// MQ-9 CO / combustible-gas sensor. ADC1 channel 4 (GPIO 32).
/// This channel drives the local failsafe.
pub const MQ9_ADC_CHANNEL: u32 = 4;

/// GP2Y1010 optical dust sensor output. ADC1 channel 5 (GPIO 33).
pub const DUST_ADC_CHANNEL: u32 = 5;

/// Dust sensor IR LED drive (active LOW on the GP2Y1010).
pub const DUST_LED_GPIO: i32 = 27;

/// Sample point after the IR LED turns on (GP2Y1010 datasheet).
pub const DUST_SAMPLE_DELAY_US: u32 = 280;

// ---------------------------------------------------------------------------
// Climate sensor — single-wire
// ---------------------------------------------------------------------------

/// DHT22 data line (open-drain with external 10 kΩ pull-up).
pub const DHT22_PIN: i32 = 4;

// ---------------------------------------------------------------------------
// Actuators
// ---------------------------------------------------------------------------

/// Ventilation fan MOSFET gate, LEDC PWM.
pub const FAN_PWM_GPIO: i32 = 25;

/// Alert indicator (LED / buzzer), active HIGH.
pub const ALERT_GPIO: i32 = 26;

// ---------------------------------------------------------------------------
// I²C bus (SSD1306 OLED at 0x3C)
// ---------------------------------------------------------------------------

/// (SDA, SCL).
pub const I2C_PINS: (i32, i32) = (21, 22);
pub const I2C_FREQ_HZ: u32 = 400_000;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC base frequency for the fan (25 kHz — inaudible).
pub const FAN_PWM_FREQ_HZ: u32 = 25_000;
