//! WebSocket client transport (ESP-IDF only).
//!
//! `esp_websocket_client` runs its own FreeRTOS task and calls back from
//! there. The callback never touches application state: it only pushes
//! [`LinkEvent`]s into the static [`Inbox`], which the control loop drains
//! through [`LinkTransport::poll_event`]. The client reconnects by itself
//! while Wi-Fi is up.

use core::time::Duration;

use esp_idf_svc::sys::EspError;
use esp_idf_svc::ws::FrameType;
use esp_idf_svc::ws::client::{
    EspWebSocketClient, EspWebSocketClientConfig, WebSocketEvent, WebSocketEventType,
};
use log::{info, warn};

use crate::error::{CommsError, ProtocolError};
use crate::protocol::inbox::{Inbox, LinkEvent};
use crate::protocol::transport::LinkTransport;

static INBOX: Inbox = Inbox::new();

const SEND_TIMEOUT: Duration = Duration::from_secs(2);
const RECONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct WsTransport {
    client: EspWebSocketClient<'static>,
}

impl WsTransport {
    /// Start the client against `url` (`ws://` or `wss://`).
    pub fn connect(url: &str) -> Result<Self, EspError> {
        let config = EspWebSocketClientConfig {
            reconnect_timeout_ms: RECONNECT_TIMEOUT,
            crt_bundle_attach: if url.starts_with("wss://") {
                Some(esp_idf_svc::sys::esp_crt_bundle_attach)
            } else {
                None
            },
            ..Default::default()
        };
        let client = EspWebSocketClient::new(url, &config, SEND_TIMEOUT, on_event)?;
        info!("WS: client started for {}", url);
        Ok(Self { client })
    }
}

fn on_event(event: &Result<WebSocketEvent<'_>, esp_idf_svc::io::EspIOError>) {
    let event = match event {
        Ok(event) => event,
        Err(e) => {
            warn!("WS: event error {:?}", e);
            return;
        }
    };
    match event.event_type {
        WebSocketEventType::Connected => {
            INBOX.push(LinkEvent::Connected);
        }
        WebSocketEventType::Disconnected | WebSocketEventType::Closed => {
            INBOX.push(LinkEvent::Disconnected);
        }
        WebSocketEventType::Text(text) => {
            INBOX.push_text(text);
        }
        WebSocketEventType::Binary(_) => {
            INBOX.push(LinkEvent::Rejected(ProtocolError::Binary));
        }
        _ => {}
    }
}

impl LinkTransport for WsTransport {
    fn poll_event(&mut self) -> Option<LinkEvent> {
        INBOX.pop()
    }

    fn send_text(&mut self, text: &str) -> Result<(), CommsError> {
        if !self.client.is_connected() {
            return Err(CommsError::NotConnected);
        }
        self.client
            .send(FrameType::Text(false), text.as_bytes())
            .map_err(|e| {
                warn!("WS: send failed: {}", e);
                CommsError::SendFailed
            })
    }

    fn take_overflow(&mut self) -> u32 {
        INBOX.take_overflow()
    }
}
