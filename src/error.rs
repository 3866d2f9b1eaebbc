//! Application error taxonomy.
//!
//! Setup failures (`PortOpen`, `PortConfig`, `Config`) end the process with a
//! non-zero status. Per-exchange failures (`Send`, `Receive`, `ResultsLog`)
//! are reported and the session carries on. A response timeout is not an
//! error at all; see [`crate::protocol::ReadOutcome`].

use crate::config::ConfigError;
use crate::port::PortError;
use std::path::PathBuf;
use thiserror::Error;

/// Unified application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// The device path could not be opened.
    #[error("Cannot open port ({port}): {source}")]
    PortOpen {
        port: String,
        #[source]
        source: PortError,
    },

    /// The port opened but rejected the raw 8N1 settings.
    #[error("Port configuration failed ({port}): {source}")]
    PortConfig {
        port: String,
        #[source]
        source: PortError,
    },

    /// The request could not be written in full.
    #[error("Send failed: {0}")]
    Send(#[source] PortError),

    /// The request was only partially written.
    #[error("Send failed: wrote {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    /// Reading the response failed for a reason other than an idle line.
    #[error("Receive failed: {0}")]
    Receive(#[source] PortError),

    /// An exchange could not be appended to the results log.
    #[error("Cannot write results log '{path}': {source}")]
    ResultsLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Console I/O failed.
    #[error("An I/O error occurred: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Classify a failure to bring up the port.
    pub fn port_setup(port: impl Into<String>, source: PortError) -> Self {
        let port = port.into();
        match source {
            PortError::Config(_) => Self::PortConfig { port, source },
            source => Self::PortOpen { port, source },
        }
    }

    /// True if the session can continue with the next request.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Send(_) | Self::ShortWrite { .. } | Self::Receive(_) | Self::ResultsLog { .. }
        )
    }
}

/// A specialized `Result` type for application operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn port_setup_splits_open_and_config_failures() {
        let err = AppError::port_setup("/dev/ttyACM0", PortError::not_found("/dev/ttyACM0"));
        assert!(matches!(err, AppError::PortOpen { .. }));
        assert_eq!(
            err.to_string(),
            "Cannot open port (/dev/ttyACM0): Serial port not found: /dev/ttyACM0"
        );

        let err = AppError::port_setup("/dev/ttyACM0", PortError::config("bad baud"));
        assert!(matches!(err, AppError::PortConfig { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn per_exchange_failures_are_recoverable() {
        let send = AppError::Send(PortError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "gone")));
        let short = AppError::ShortWrite {
            written: 3,
            expected: 8,
        };
        assert!(send.is_recoverable());
        assert!(short.is_recoverable());
        assert_eq!(short.to_string(), "Send failed: wrote 3 of 8 bytes");
        assert!(!AppError::Io(io::Error::new(io::ErrorKind::Other, "tty")).is_recoverable());
    }
}
