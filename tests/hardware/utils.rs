//! Utility functions for hardware testing.

use serial_calc::config::Config;
use std::env;
use std::path::Path;

/// Test port configuration from environment.
pub struct TestPortConfig {
    pub port_name: String,
    pub baud_rate: u32,
}

impl TestPortConfig {
    /// Get test configuration from environment variables.
    pub fn from_env() -> Option<Self> {
        let port_name = env::var("TEST_PORT").ok()?;
        let baud_rate = env::var("TEST_BAUD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(9600);

        Some(TestPortConfig {
            port_name,
            baud_rate,
        })
    }

    /// Session configuration for the board, logging results under `dir`.
    pub fn to_config(&self, dir: &Path) -> Config {
        let mut config = Config::default();
        config.serial.port = self.port_name.clone();
        config.serial.baud_rate = self.baud_rate;
        config.session.results_log = dir.join("results.txt");
        config
    }
}

/// Skip test if hardware is not available.
pub fn skip_without_hardware() -> Option<TestPortConfig> {
    let config = TestPortConfig::from_env();
    if config.is_none() {
        println!("Skipping hardware test: TEST_PORT not set");
    }
    config
}
