//! Hardware-specific tests requiring a real calculator board.
//!
//! These tests are ignored by default and require actual hardware to run.
//! They should be run manually with the `--ignored` flag and `TEST_PORT` set.

pub mod calculator_tests;
pub mod port_discovery_tests;
pub mod utils;
