//! Local combustible-gas failsafe.
//!
//! Evaluated once per sensor cycle. While the node has no Wi-Fi link the
//! failsafe owns the fan: calibrated MQ-9 above the threshold drives the
//! fan to full and raises the alert, anything else turns both off. The
//! decision is level-triggered; there is no hysteresis or latching.
//!
//! While connected the remote authority owns the fan and the failsafe
//! returns no decision, unless `failsafe_always_armed` is set.

use core::fmt;

use log::{error, info};

use crate::connectivity::ConnectivityState;

/// Duty applied while the failsafe is in `Alert`.
pub const FAILSAFE_DUTY: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailsafeState {
    #[default]
    Safe,
    Alert,
}

impl fmt::Display for FailsafeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "SAFE"),
            Self::Alert => write!(f, "ALERT"),
        }
    }
}

/// Actuator override produced by one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailsafeDecision {
    pub duty: u8,
    pub alert: bool,
    pub state: FailsafeState,
    /// `state` differs from the previous evaluation.
    pub changed: bool,
}

pub struct FailsafeController {
    threshold: u16,
    always_armed: bool,
    state: FailsafeState,
}

impl FailsafeController {
    pub fn new(threshold: u16, always_armed: bool) -> Self {
        Self {
            threshold,
            always_armed,
            state: FailsafeState::Safe,
        }
    }

    /// Whether the override is authoritative in `connectivity`.
    pub fn is_armed(&self, connectivity: ConnectivityState) -> bool {
        self.always_armed || connectivity == ConnectivityState::Disconnected
    }

    /// Evaluate against the calibrated MQ-9 value.
    ///
    /// Returns `None` when the failsafe is not authoritative; the actuator
    /// must then be left untouched.
    pub fn evaluate(&mut self, mq9: u16, connectivity: ConnectivityState) -> Option<FailsafeDecision> {
        if !self.is_armed(connectivity) {
            return None;
        }

        let next = if mq9 > self.threshold {
            FailsafeState::Alert
        } else {
            FailsafeState::Safe
        };
        let changed = next != self.state;
        if changed {
            match next {
                FailsafeState::Alert => {
                    error!("FAILSAFE: MQ9={} > {} -> fan forced to {}", mq9, self.threshold, FAILSAFE_DUTY);
                }
                FailsafeState::Safe => info!("FAILSAFE: MQ9={} back under {} -> fan off", mq9, self.threshold),
            }
        }
        self.state = next;

        Some(match next {
            FailsafeState::Alert => FailsafeDecision { duty: FAILSAFE_DUTY, alert: true, state: next, changed },
            FailsafeState::Safe => FailsafeDecision { duty: 0, alert: false, state: next, changed },
        })
    }

    pub fn state(&self) -> FailsafeState {
        self.state
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }
}
