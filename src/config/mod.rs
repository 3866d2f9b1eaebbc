//! Configuration module for serial-calc.
//!
//! This module provides TOML-based configuration with environment variable overrides.
//!
//! # Configuration Resolution
//!
//! Configuration is loaded from the following locations (in order of priority):
//!
//! 1. `SERIAL_CALC_CONFIG` environment variable (explicit path)
//! 2. `./serial-calc.toml` (current directory)
//! 3. `~/.config/serial-calc/config.toml` (XDG on Linux/macOS)
//! 4. `%APPDATA%\serial-calc\config.toml` (Windows)
//! 5. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! The pattern is `SERIAL_CALC_<SECTION>_<KEY>`, e.g.
//! `SERIAL_CALC_SERIAL_PORT=/dev/ttyACM0` or
//! `SERIAL_CALC_PROTOCOL_RESPONSE_TIMEOUT_MS=2000`.
//!
//! # Example
//!
//! ```rust,ignore
//! use serial_calc::config::ConfigLoader;
//!
//! let config = ConfigLoader::load()?.into_config();
//! println!("Device: {} @ {}", config.serial.port, config.serial.baud_rate);
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{get_default_config_path, resolve_config_path, ConfigLoader};
pub use schema::{Config, LogFormat, LoggingConfig, ProtocolConfig, SerialConfig, SessionConfig};
