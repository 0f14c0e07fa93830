//! Protocol bridge — between the transport and the application service.
//!
//! Once per loop iteration [`ProtocolBridge::pump`] drains at most
//! [`INBOX_DEPTH`] transport events, so a flood of inbound frames cannot
//! starve the periodic tasks. Commands are applied to the
//! [`AppService`] in arrival order before that iteration's sensor cycle.

use log::{debug, info, warn};

use crate::app::ports::{ActuatorPort, EventSink, SensorPort};
use crate::app::service::AppService;
use crate::diagnostics::DiagnosticKind;
use crate::error::CommsError;
use crate::protocol::codec;
use crate::protocol::frames::TelemetryFrame;
use crate::protocol::inbox::{INBOX_DEPTH, LinkEvent};
use crate::protocol::transport::LinkTransport;

/// What happened to one telemetry frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// Link down or send failed; the frame was only logged and counted.
    RecordedLocally,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeStats {
    pub telemetry_sent: u32,
    pub telemetry_local: u32,
    pub identifications: u32,
    pub frames_received: u32,
    pub frames_dropped: u32,
}

pub struct ProtocolBridge<T> {
    transport: T,
    device_id: heapless::String<32>,
    link_up: bool,
    stats: BridgeStats,
}

impl<T: LinkTransport> ProtocolBridge<T> {
    pub fn new(transport: T, device_id: &str) -> Self {
        Self {
            transport,
            device_id: crate::config::fixed(device_id),
            link_up: false,
            stats: BridgeStats::default(),
        }
    }

    /// Drain queued transport events and apply them. Returns the number of
    /// events handled.
    pub fn pump(
        &mut self,
        app: &mut AppService,
        hw: &mut (impl SensorPort + ActuatorPort),
        now_ms: u64,
        sink: &mut impl EventSink,
    ) -> usize {
        let dropped = self.transport.take_overflow();
        if dropped > 0 {
            warn!("Bridge: inbox overflow, {} event(s) lost", dropped);
            app.record_diagnostic(now_ms, DiagnosticKind::Link(CommsError::InboxOverflow), sink);
        }

        let mut handled = 0;
        while handled < INBOX_DEPTH {
            let Some(event) = self.transport.poll_event() else {
                break;
            };
            handled += 1;
            self.handle_event(event, app, hw, now_ms, sink);
        }
        handled
    }

    fn handle_event(
        &mut self,
        event: LinkEvent,
        app: &mut AppService,
        hw: &mut (impl SensorPort + ActuatorPort),
        now_ms: u64,
        sink: &mut impl EventSink,
    ) {
        match event {
            LinkEvent::Connected => {
                self.link_up = true;
                info!("Bridge: remote link up, identifying as '{}'", self.device_id);
                self.identify();
            }
            LinkEvent::Disconnected => {
                if self.link_up {
                    info!("Bridge: remote link down");
                }
                self.link_up = false;
            }
            LinkEvent::Text(text) => {
                self.stats.frames_received = self.stats.frames_received.saturating_add(1);
                match codec::decode_command(&text) {
                    Ok(batch) => {
                        for cmd in batch {
                            app.handle_command(cmd, hw, now_ms, sink);
                        }
                    }
                    Err(e) => {
                        self.stats.frames_dropped = self.stats.frames_dropped.saturating_add(1);
                        app.record_diagnostic(now_ms, DiagnosticKind::MalformedFrame(e), sink);
                    }
                }
            }
            LinkEvent::Rejected(e) => {
                self.stats.frames_dropped = self.stats.frames_dropped.saturating_add(1);
                app.record_diagnostic(now_ms, DiagnosticKind::MalformedFrame(e), sink);
            }
        }
    }

    fn identify(&mut self) {
        let text = match codec::encode_identification(&self.device_id) {
            Ok(text) => text,
            Err(e) => {
                warn!("Bridge: identification not encoded: {}", e);
                return;
            }
        };
        match self.transport.send_text(&text) {
            Ok(()) => self.stats.identifications = self.stats.identifications.saturating_add(1),
            Err(e) => warn!("Bridge: identification not sent: {}", e),
        }
    }

    /// Send one telemetry frame if the link is up; otherwise record it
    /// locally.
    pub fn publish_telemetry(&mut self, frame: &TelemetryFrame) -> Delivery {
        if self.link_up {
            let sent = codec::encode_telemetry(frame)
                .map_err(crate::error::Error::from)
                .and_then(|text| self.transport.send_text(&text).map_err(Into::into));
            match sent {
                Ok(()) => {
                    self.stats.telemetry_sent = self.stats.telemetry_sent.saturating_add(1);
                    debug!("Bridge: telemetry sent");
                    return Delivery::Sent;
                }
                Err(e) => warn!("Bridge: telemetry send failed: {}", e),
            }
        }
        self.stats.telemetry_local = self.stats.telemetry_local.saturating_add(1);
        info!(
            "Bridge: offline, telemetry kept local (#{}) mq9={} fan={}",
            self.stats.telemetry_local, frame.mq9, frame.fan_speed
        );
        Delivery::RecordedLocally
    }

    pub fn is_link_up(&self) -> bool {
        self.link_up
    }

    pub fn stats(&self) -> BridgeStats {
        self.stats
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
