//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises a subsystem against
//! mock adapters. All tests run on the host with no real hardware.

mod bridge_tests;
mod connectivity_tests;
mod control_loop_tests;
mod hardware_tests;
mod mock_hw;
