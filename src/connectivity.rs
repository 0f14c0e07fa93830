//! Wi-Fi connectivity lifecycle.
//!
//! ```text
//!              associate()
//!  Associating ──────────────▶ Connected ◀──┐
//!       │  budget exhausted       │ lost     │ poll() sees link
//!       ▼                         ▼          │
//!  Disconnected ◀──────────── Disconnected ──┘
//!                 reconnect_attempt() every 15 s
//! ```
//!
//! Startup is the only blocking window: [`ConnectivityManager::associate`]
//! polls the link at a fixed interval for a bounded number of attempts.
//! After that everything is non-blocking; the control loop calls
//! [`ConnectivityManager::poll`] every iteration and
//! [`ConnectivityManager::reconnect_attempt`] on its reconnect cadence.

use core::fmt;

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::ports::{ConnectivityError, ConnectivityPort};
use crate::error::CommsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityState {
    #[default]
    Associating,
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Associating => write!(f, "ASSOCIATING"),
            Self::Connected => write!(f, "CONNECTED"),
            Self::Disconnected => write!(f, "DISCONNECTED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ConnectivityState,
    pub to: ConnectivityState,
}

/// Outcome of one [`ConnectivityManager::reconnect_attempt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectOutcome {
    /// Not disconnected; nothing was done.
    Skipped,
    /// A fresh association was started.
    Started,
    /// The driver refused to start one.
    Refused(ConnectivityError),
}

pub struct ConnectivityManager<C> {
    link: C,
    state: ConnectivityState,
    poll_interval_ms: u32,
    max_attempts: u32,
    reconnect_attempts: u32,
}

impl<C: ConnectivityPort> ConnectivityManager<C> {
    pub fn new(link: C, poll_interval_ms: u32, max_attempts: u32) -> Self {
        Self {
            link,
            state: ConnectivityState::Associating,
            poll_interval_ms,
            max_attempts,
            reconnect_attempts: 0,
        }
    }

    /// Bounded blocking startup association.
    ///
    /// Starts one association, then checks the link up to `max_attempts`
    /// times, sleeping `poll_interval_ms` after each miss. Ends Connected on
    /// the first positive check, Disconnected when the budget runs out or the
    /// driver refuses to start.
    pub fn associate(&mut self, delay: &mut impl DelayNs) -> Result<ConnectivityState, CommsError> {
        self.state = ConnectivityState::Associating;
        info!(
            "WiFi: associating (up to {} x {} ms)",
            self.max_attempts, self.poll_interval_ms
        );

        if let Err(e) = self.link.begin_association() {
            warn!("WiFi: association refused: {}", e);
            self.state = ConnectivityState::Disconnected;
            return Err(CommsError::AssociationTimeout);
        }

        for attempt in 1..=self.max_attempts {
            if self.link.is_associated() {
                info!("WiFi: associated after {} poll(s)", attempt);
                self.state = ConnectivityState::Connected;
                return Ok(self.state);
            }
            delay.delay_ms(self.poll_interval_ms);
        }

        warn!("WiFi: no association after {} polls, running offline", self.max_attempts);
        self.state = ConnectivityState::Disconnected;
        Err(CommsError::AssociationTimeout)
    }

    /// Non-blocking link check. Returns the transition if the state moved.
    pub fn poll(&mut self) -> Option<Transition> {
        let associated = self.link.is_associated();
        let next = match (self.state, associated) {
            (_, true) => ConnectivityState::Connected,
            (ConnectivityState::Connected, false) => ConnectivityState::Disconnected,
            (current, false) => current,
        };
        if next == self.state {
            return None;
        }

        let t = Transition { from: self.state, to: next };
        self.state = next;
        match next {
            ConnectivityState::Connected => {
                info!("WiFi: link up after {} reconnect attempt(s)", self.reconnect_attempts);
                self.reconnect_attempts = 0;
            }
            _ => warn!("WiFi: link lost"),
        }
        Some(t)
    }

    /// Drop the current association and start a new one without waiting.
    pub fn reconnect_attempt(&mut self) -> ReconnectOutcome {
        if self.state != ConnectivityState::Disconnected {
            return ReconnectOutcome::Skipped;
        }
        self.reconnect_attempts = self.reconnect_attempts.saturating_add(1);
        info!("WiFi: reconnect attempt #{}", self.reconnect_attempts);
        self.link.disconnect();
        match self.link.begin_association() {
            Ok(()) => ReconnectOutcome::Started,
            Err(e) => {
                warn!("WiFi: reconnect refused: {}", e);
                ReconnectOutcome::Refused(e)
            }
        }
    }

    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    pub fn reconnect_attempts(&self) -> u32 {
        self.reconnect_attempts
    }

    pub fn link(&self) -> &C {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut C {
        &mut self.link
    }
}
