//! Configuration schema definitions.
//!
//! This module defines the structure of the configuration file using serde.
//! Every section falls back to its defaults when omitted.

use super::error::{ConfigError, ConfigResult};
use crate::port::PortConfiguration;
use crate::protocol::{ReaderSettings, DEFAULT_MAX_LINE_LEN};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial device settings
    pub serial: SerialConfig,
    /// Request/response timing and framing
    pub protocol: ProtocolConfig,
    /// Interactive session settings
    pub session: SessionConfig,
    /// Diagnostic logging
    pub logging: LoggingConfig,
}

impl Config {
    /// Reject values the session cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.serial.port.trim().is_empty() {
            return Err(ConfigError::validation("serial.port", "must not be empty"));
        }
        if self.serial.baud_rate == 0 {
            return Err(ConfigError::validation("serial.baud_rate", "must be positive"));
        }
        if self.serial.read_timeout_ms == 0 {
            return Err(ConfigError::validation(
                "serial.read_timeout_ms",
                "must be positive",
            ));
        }
        if self.protocol.response_timeout_ms == 0 {
            return Err(ConfigError::validation(
                "protocol.response_timeout_ms",
                "must be positive",
            ));
        }
        if self.protocol.poll_interval_ms == 0 {
            return Err(ConfigError::validation(
                "protocol.poll_interval_ms",
                "must be positive",
            ));
        }
        if self.protocol.max_line_len == 0 {
            return Err(ConfigError::validation(
                "protocol.max_line_len",
                "must be positive",
            ));
        }
        if self.protocol.terminator.is_empty() {
            return Err(ConfigError::validation(
                "protocol.terminator",
                "must not be empty",
            ));
        }
        Ok(())
    }

    /// Timing and framing for the response reader.
    pub fn reader_settings(&self) -> ReaderSettings {
        ReaderSettings {
            deadline: self.protocol.response_timeout(),
            poll_interval: self.protocol.poll_interval(),
            read_timeout: self.serial.read_timeout(),
            max_line_len: self.protocol.max_line_len,
        }
    }
}

/// Serial port configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path
    pub port: String,
    /// Baud rate; the link is always 8N1 without flow control
    pub baud_rate: u32,
    /// Idle period after which a single read returns empty-handed
    pub read_timeout_ms: u64,
    /// Wait after opening, for boards that reset when the port opens
    pub settle_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: "/dev/cu.usbmodem101".to_string(),
            baud_rate: 9600,
            read_timeout_ms: 100,
            settle_ms: 2000,
        }
    }
}

impl SerialConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Raw 8N1 settings for opening the port.
    pub fn port_configuration(&self) -> PortConfiguration {
        PortConfiguration::raw_8n1(self.baud_rate, self.read_timeout())
    }
}

/// Protocol timing section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Budget for one response wait
    pub response_timeout_ms: u64,
    /// Sleep between idle read attempts
    pub poll_interval_ms: u64,
    /// Longest line kept before it is dropped as noise
    pub max_line_len: usize,
    /// Appended to requests that do not already end with it
    pub terminator: String,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            response_timeout_ms: 5000,
            poll_interval_ms: 10,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            terminator: "\n".to_string(),
        }
    }
}

impl ProtocolConfig {
    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Interactive session section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Append-only log of successful exchanges
    pub results_log: PathBuf,
    /// Prompt printed before each expression
    pub prompt: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            results_log: PathBuf::from("results.txt"),
            prompt: "Expression (e.g. 54 * 22): ".to_string(),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Log format: "full", "pretty", "compact"
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line records with all fields
    Full,
    /// Multi-line human-oriented records
    Pretty,
    /// Abbreviated single-line records
    #[default]
    Compact,
}
