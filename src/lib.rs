//! Serial calculator client library.
//!
//! Talks to a microcontroller that evaluates `"<number> <op> <number>"` lines
//! and answers with a number, `ERR` or `DIV0`.
//!
//! # Modules
//!
//! - `protocol`: line framing, result classification and the deadline-bounded response wait
//! - `session`: request cycle and interactive loop
//! - `port`: transport abstraction, real serial port and mock
//! - `config`: configuration management with TOML support
//! - `results_log`: append-only exchange log
//! - `logging`: tracing subscriber setup
//! - `error`: application error taxonomy

pub mod config;
pub mod error;
pub mod logging;
pub mod port;
pub mod protocol;
pub mod results_log;
pub mod session;

// Re-export commonly used types for convenience
pub use error::{AppError, AppResult};
pub use port::{MockSerialPort, PortConfiguration, PortError, SerialPortAdapter, SyncSerialPort};
pub use protocol::{
    classify, is_result_line, LineFramer, ReadOutcome, ReaderSettings, ResponseReader, ResultLine,
};
pub use results_log::ResultsLog;
pub use session::{Exchange, Session, SessionSummary, Step, Transaction};

// Re-export config types
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
