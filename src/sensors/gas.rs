//! MQ-series gas sensors (MQ-135, MQ-8, MQ-9).
//!
//! Each sensor is a heated metal-oxide element on a resistive divider into
//! an ADC1 channel. Values are raw 12-bit counts; no ppm conversion is done
//! on the node.
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from static `AtomicU16`s for injection.

use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

/// Injection slots: MQ-135, MQ-8, MQ-9.
static SIM_GAS_ADC: [AtomicU16; 3] = [AtomicU16::new(0), AtomicU16::new(0), AtomicU16::new(0)];

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(mq135: u16, mq8: u16, mq9: u16) {
    SIM_GAS_ADC[0].store(mq135, Ordering::Relaxed);
    SIM_GAS_ADC[1].store(mq8, Ordering::Relaxed);
    SIM_GAS_ADC[2].store(mq9, Ordering::Relaxed);
}

pub struct GasSensors {
    total_reads: u32,
}

impl Default for GasSensors {
    fn default() -> Self {
        Self::new()
    }
}

impl GasSensors {
    pub fn new() -> Self {
        Self { total_reads: 0 }
    }

    /// MQ heaters need a few minutes before readings settle.
    /// 60 cycles at the 5 s cadence = 5 min.
    pub fn is_warmed_up(&self) -> bool {
        self.total_reads >= 60
    }

    /// `(mq135, mq8, mq9)` raw counts.
    pub fn read(&mut self) -> (u16, u16, u16) {
        self.total_reads = self.total_reads.saturating_add(1);
        (self.read_slot(0), self.read_slot(1), self.read_slot(2))
    }

    #[cfg(target_os = "espidf")]
    fn read_slot(&self, slot: usize) -> u16 {
        let channel = match slot {
            0 => pins::MQ135_ADC_CHANNEL,
            1 => pins::MQ8_ADC_CHANNEL,
            _ => pins::MQ9_ADC_CHANNEL,
        };
        hw_init::adc1_read(channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_slot(&self, slot: usize) -> u16 {
        SIM_GAS_ADC[slot].load(Ordering::Relaxed).min(super::ADC_MAX)
    }
}
