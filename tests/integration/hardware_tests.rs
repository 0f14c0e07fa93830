//! Hardware adapter over the host simulation stubs.
//!
//! The only test in this binary that touches the sim statics.

use airsentry::adapters::hardware::HardwareAdapter;
use airsentry::app::ports::{ActuatorPort, SensorPort};
use airsentry::drivers::alert::AlertIndicator;
use airsentry::drivers::fan::FanDriver;
use airsentry::sensors::climate::{self, ClimateSensor};
use airsentry::sensors::dust::DustSensor;
use airsentry::sensors::gas::GasSensors;
use airsentry::sensors::{GasReadings, SensorHub, sim_set_gas};

#[test]
fn adapter_routes_ports_to_drivers() {
    let hub = SensorHub::new(GasSensors::new(), DustSensor::new(), ClimateSensor::new());
    let mut hw = HardwareAdapter::new(hub, FanDriver::new(), AlertIndicator::new());

    sim_set_gas(GasReadings::new(410, 220, 3300, 150));
    climate::sim_set_climate(24.5, 51.0);
    let raw = hw.read_channels();
    assert_eq!(raw.gas, GasReadings::new(410, 220, 3300, 150));
    assert_eq!(raw.climate.humidity_pct, 51.0);
    assert_eq!(hw.read_gas().mq9, 3300);

    hw.set_fan_duty(255);
    hw.set_alert(true);
    assert_eq!(hw.fan().duty(), 255);
    assert!(hw.alert().is_on());
}
