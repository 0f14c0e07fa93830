//! JSON-over-WebSocket link to the remote authority.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  WebSocket event task          │  Control loop             │
//! │                                │                           │
//! │  Connected / Text / Closed ──▶ Inbox ──▶ ProtocolBridge   │
//! │                                │          │  decode_command │
//! │                                │          ▼                 │
//! │                                │        AppService         │
//! │  send_text ◀───────────────────┼─── encode_telemetry       │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The event task never touches device state; it only pushes into the
//! bounded [`inbox::Inbox`]. The bridge drains it once per loop iteration.

pub mod bridge;
pub mod codec;
pub mod frames;
pub mod inbox;
pub mod transport;
