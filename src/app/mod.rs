//! Application core: pure domain logic, zero I/O.
//!
//! Business rules for the air-quality node live here: command handling,
//! the sensor cycle, failsafe and calibration orchestration. All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod state;
