//! Bounded inbox between the WebSocket event task and the control loop.
//!
//! Uses an `embassy-sync` channel with a critical-section mutex so the
//! event task can push from its own FreeRTOS context without heap
//! allocation. Pushes never block: when the inbox is full the event is
//! dropped and counted, and the control loop reports the count as a
//! diagnostic on its next drain.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::error::ProtocolError;

/// Events held between two drains.
pub const INBOX_DEPTH: usize = 8;

/// Largest inbound text frame accepted (bytes).
pub const MAX_FRAME_LEN: usize = 512;

pub type FrameText = heapless::String<MAX_FRAME_LEN>;

/// What the transport observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Connected,
    Disconnected,
    Text(FrameText),
    /// A frame arrived but could not be queued as text.
    Rejected(ProtocolError),
}

pub struct Inbox {
    channel: Channel<CriticalSectionRawMutex, LinkEvent, INBOX_DEPTH>,
    overflow: AtomicU32,
}

impl Default for Inbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Inbox {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            overflow: AtomicU32::new(0),
        }
    }

    /// Non-blocking enqueue. Returns `false` if the event was dropped.
    pub fn push(&self, event: LinkEvent) -> bool {
        if self.channel.try_send(event).is_err() {
            self.overflow.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        true
    }

    /// Enqueue a text frame, or a rejection if it does not fit.
    pub fn push_text(&self, text: &str) -> bool {
        let mut frame = FrameText::new();
        match frame.push_str(text) {
            Ok(()) => self.push(LinkEvent::Text(frame)),
            Err(()) => self.push(LinkEvent::Rejected(ProtocolError::Oversized)),
        }
    }

    pub fn pop(&self) -> Option<LinkEvent> {
        self.channel.try_receive().ok()
    }

    /// Events dropped since the last call.
    pub fn take_overflow(&self) -> u32 {
        self.overflow.swap(0, Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}
