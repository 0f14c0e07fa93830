//! Startup association and reconnection with the host Wi-Fi adapter.

use airsentry::adapters::wifi::WifiAdapter;
use airsentry::app::ports::{ConnectivityError, ConnectivityPort};
use airsentry::connectivity::{ConnectivityManager, ConnectivityState, ReconnectOutcome};
use airsentry::error::CommsError;
use embedded_hal::delay::DelayNs;

#[derive(Default)]
struct ClockDelay {
    elapsed_ms: u64,
}

impl DelayNs for ClockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ms += u64::from(ns) / 1_000_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ms += u64::from(ms);
    }
}

fn manager(reachable: bool) -> ConnectivityManager<WifiAdapter> {
    let mut wifi = WifiAdapter::new();
    wifi.set_credentials("Lab", "password1").unwrap();
    wifi.sim_set_reachable(reachable);
    ConnectivityManager::new(wifi, 500, 60)
}

#[test]
fn reachable_ap_associates_without_waiting() {
    let mut m = manager(true);
    let mut delay = ClockDelay::default();
    assert_eq!(m.associate(&mut delay), Ok(ConnectivityState::Connected));
    assert_eq!(delay.elapsed_ms, 0);
}

#[test]
fn unreachable_ap_gives_up_after_thirty_seconds() {
    let mut m = manager(false);
    let mut delay = ClockDelay::default();
    assert_eq!(m.associate(&mut delay), Err(CommsError::AssociationTimeout));
    assert_eq!(m.state(), ConnectivityState::Disconnected);
    assert_eq!(delay.elapsed_ms, 30_000);
    assert_eq!(m.link().attempts(), 1);
}

#[test]
fn missing_credentials_fail_fast() {
    let mut m = ConnectivityManager::new(WifiAdapter::new(), 500, 60);
    let mut delay = ClockDelay::default();
    assert!(m.associate(&mut delay).is_err());
    assert_eq!(delay.elapsed_ms, 0);
    assert_eq!(
        m.reconnect_attempt(),
        ReconnectOutcome::Refused(ConnectivityError::NoCredentials)
    );
}

#[test]
fn reconnect_recovers_when_ap_returns() {
    let mut m = manager(false);
    let _ = m.associate(&mut ClockDelay::default());

    assert_eq!(m.reconnect_attempt(), ReconnectOutcome::Started);
    assert!(m.poll().is_none());

    m.link_mut().sim_set_reachable(true);
    let t = m.poll().unwrap();
    assert_eq!((t.from, t.to), (ConnectivityState::Disconnected, ConnectivityState::Connected));
    assert_eq!(m.reconnect_attempt(), ReconnectOutcome::Skipped);
}

#[test]
fn missing_radio_starts_offline_and_stays_there() {
    let mut link: Option<WifiAdapter> = None;
    assert_eq!(
        link.set_credentials("Lab", "password1"),
        Err(ConnectivityError::Unavailable)
    );
    let mut m = ConnectivityManager::new(link, 500, 60);
    let mut delay = ClockDelay::default();
    assert_eq!(m.associate(&mut delay), Err(CommsError::AssociationTimeout));
    assert_eq!(m.state(), ConnectivityState::Disconnected);
    assert_eq!(delay.elapsed_ms, 0);

    assert!(m.poll().is_none());
    assert_eq!(
        m.reconnect_attempt(),
        ReconnectOutcome::Refused(ConnectivityError::Unavailable)
    );
}
