//! Protocol bridge against the loopback transport.

use airsentry::app::service::AppService;
use airsentry::config::SystemConfig;
use airsentry::diagnostics::DiagnosticKind;
use airsentry::error::{CommsError, ProtocolError};
use airsentry::protocol::bridge::{Delivery, ProtocolBridge};
use airsentry::protocol::frames::TelemetryFrame;
use airsentry::protocol::inbox::{INBOX_DEPTH, LinkEvent, MAX_FRAME_LEN};
use airsentry::protocol::transport::LoopbackTransport;

use crate::mock_hw::{MockHardware, RecordingSink};

struct Rig {
    app: AppService,
    bridge: ProtocolBridge<LoopbackTransport>,
    hw: MockHardware,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        Self {
            app: AppService::new(SystemConfig::default()),
            bridge: ProtocolBridge::new(LoopbackTransport::new(), "node-7"),
            hw: MockHardware::new(),
            sink: RecordingSink::default(),
        }
    }

    fn pump(&mut self, now_ms: u64) -> usize {
        self.bridge.pump(&mut self.app, &mut self.hw, now_ms, &mut self.sink)
    }
}

fn frame() -> TelemetryFrame {
    TelemetryFrame {
        mq135: 1,
        mq8: 2,
        mq9: 3,
        dust: 4,
        temperature: 20.0,
        humidity: 50.0,
        fan_speed: 0,
    }
}

#[test]
fn telemetry_stays_local_until_link_up() {
    let mut rig = Rig::new();
    assert_eq!(rig.bridge.publish_telemetry(&frame()), Delivery::RecordedLocally);
    assert!(rig.bridge.transport().sent().is_empty());

    rig.bridge.transport_mut().inject_connected();
    rig.pump(0);
    assert!(rig.bridge.is_link_up());
    assert_eq!(rig.bridge.publish_telemetry(&frame()), Delivery::Sent);

    let stats = rig.bridge.stats();
    assert_eq!(stats.telemetry_local, 1);
    assert_eq!(stats.telemetry_sent, 1);
    assert_eq!(stats.identifications, 1);
}

#[test]
fn every_reconnect_reidentifies() {
    let mut rig = Rig::new();
    for t in 0..3 {
        rig.bridge.transport_mut().inject_connected();
        rig.pump(t * 100);
        rig.bridge.transport_mut().inject_disconnected();
        rig.pump(t * 100 + 50);
    }
    assert_eq!(rig.bridge.stats().identifications, 3);
    assert!(!rig.bridge.is_link_up());
}

#[test]
fn failed_send_is_recorded_locally() {
    let mut rig = Rig::new();
    rig.bridge.transport_mut().inject_connected();
    rig.pump(0);
    rig.bridge.transport_mut().set_fail_sends(true);
    assert_eq!(rig.bridge.publish_telemetry(&frame()), Delivery::RecordedLocally);
}

#[test]
fn flood_is_bounded_and_overflow_reported() {
    let mut rig = Rig::new();
    let accepted = (0..INBOX_DEPTH + 4)
        .filter(|_| rig.bridge.transport().inject_text(r#"{"fan_speed": 10}"#))
        .count();
    assert_eq!(accepted, INBOX_DEPTH);

    assert_eq!(rig.pump(100), INBOX_DEPTH);
    assert_eq!(
        rig.app.diagnostics().last().map(|r| r.kind),
        Some(DiagnosticKind::Link(CommsError::InboxOverflow))
    );
    assert_eq!(rig.pump(200), 0);
    assert_eq!(rig.app.diagnostics().counters().link_faults, 1);
}

#[test]
fn oversized_and_binary_frames_are_dropped() {
    let mut rig = Rig::new();
    let huge = format!(r#"{{"command":"{}"}}"#, "x".repeat(MAX_FRAME_LEN));
    rig.bridge.transport().inject_text(&huge);
    rig.bridge.transport().inject(LinkEvent::Rejected(ProtocolError::Binary));
    rig.pump(0);

    assert_eq!(rig.app.diagnostics().counters().malformed_frames, 2);
    assert_eq!(rig.bridge.stats().frames_dropped, 2);
    assert!(rig.hw.calls.is_empty());
}

#[test]
fn non_mapping_frame_is_a_diagnostic() {
    let mut rig = Rig::new();
    rig.bridge.transport().inject_text("[255]");
    rig.pump(42);
    let last = rig.app.diagnostics().last().copied();
    assert_eq!(last.map(|r| r.uptime_ms), Some(42));
    assert_eq!(
        last.map(|r| r.kind),
        Some(DiagnosticKind::MalformedFrame(ProtocolError::NotAMapping))
    );
}

#[test]
fn commands_apply_in_arrival_order() {
    let mut rig = Rig::new();
    rig.bridge.transport().inject_text(r#"{"fan_speed": 200}"#);
    rig.bridge.transport().inject_text(r#"{"fan_speed": 30}"#);
    rig.pump(0);
    assert_eq!(rig.hw.fan(), Some(30));
    assert_eq!(rig.app.state().actuator.duty, 30);
}
