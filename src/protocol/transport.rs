//! Transport abstraction for the remote link.
//!
//! Concrete implementations:
//! - ESP-IDF WebSocket client (`adapters::ws_transport`, target only)
//! - [`LoopbackTransport`] for host simulation and tests
//!
//! The [`ProtocolBridge`](super::bridge::ProtocolBridge) is generic over
//! `LinkTransport`, so the control loop never sees which one it has.

use crate::error::CommsError;
use crate::protocol::inbox::{Inbox, LinkEvent};

pub trait LinkTransport {
    /// Next queued event, if any. Never blocks.
    fn poll_event(&mut self) -> Option<LinkEvent>;

    /// Send one text frame.
    fn send_text(&mut self, text: &str) -> Result<(), CommsError>;

    /// Events the transport had to drop since the last call.
    fn take_overflow(&mut self) -> u32;
}

/// No transport (the client could not be started): permanently offline.
impl<T: LinkTransport> LinkTransport for Option<T> {
    fn poll_event(&mut self) -> Option<LinkEvent> {
        self.as_mut().and_then(LinkTransport::poll_event)
    }

    fn send_text(&mut self, text: &str) -> Result<(), CommsError> {
        match self {
            Some(t) => t.send_text(text),
            None => Err(CommsError::NotConnected),
        }
    }

    fn take_overflow(&mut self) -> u32 {
        self.as_mut().map_or(0, LinkTransport::take_overflow)
    }
}

/// In-memory transport: the test side injects events and reads back what
/// the node sent.
pub struct LoopbackTransport {
    inbox: Inbox,
    connected: bool,
    fail_sends: bool,
    sent: Vec<String>,
}

impl Default for LoopbackTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self {
            inbox: Inbox::new(),
            connected: false,
            fail_sends: false,
            sent: Vec::new(),
        }
    }

    pub fn inject_connected(&mut self) {
        self.connected = true;
        self.inbox.push(LinkEvent::Connected);
    }

    pub fn inject_disconnected(&mut self) {
        self.connected = false;
        self.inbox.push(LinkEvent::Disconnected);
    }

    pub fn inject_text(&self, text: &str) -> bool {
        self.inbox.push_text(text)
    }

    pub fn inject(&self, event: LinkEvent) -> bool {
        self.inbox.push(event)
    }

    /// Make every send fail, as a half-open socket would.
    pub fn set_fail_sends(&mut self, fail: bool) {
        self.fail_sends = fail;
    }

    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    pub fn take_sent(&mut self) -> Vec<String> {
        core::mem::take(&mut self.sent)
    }
}

impl LinkTransport for LoopbackTransport {
    fn poll_event(&mut self) -> Option<LinkEvent> {
        self.inbox.pop()
    }

    fn send_text(&mut self, text: &str) -> Result<(), CommsError> {
        if !self.connected {
            return Err(CommsError::NotConnected);
        }
        if self.fail_sends {
            return Err(CommsError::SendFailed);
        }
        self.sent.push(text.to_owned());
        Ok(())
    }

    fn take_overflow(&mut self) -> u32 {
        self.inbox.take_overflow()
    }
}
