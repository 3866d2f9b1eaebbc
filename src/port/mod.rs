//! Port abstraction layer for serial communication.
//!
//! Provides the transport capability trait, the `serialport`-backed
//! implementation and an in-memory mock for tests.

pub mod discovery;
pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use discovery::{list_ports, PortSummary};
pub use error::PortError;
pub use mock::MockSerialPort;
pub use sync_port::SyncSerialPort;
pub use traits::*;
