//! AirSentry edge-node firmware library.
//!
//! Exposes the pure-logic modules for integration testing and host
//! simulation. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod calibration;
pub mod config;
pub mod connectivity;
pub mod diagnostics;
pub mod display;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod protocol;
pub mod safety;
pub mod scheduler;
pub mod sensors;
