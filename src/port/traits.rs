//! Core traits for serial port abstraction.
//!
//! Defines the `SerialPortAdapter` capability trait that lets the response
//! reader and the session driver run against real hardware or an in-memory
//! mock interchangeably.

use super::error::PortError;
use std::time::Duration;

/// Configuration parameters for a serial port.
///
/// The link is always raw 8N1 without flow control; only the rate and the
/// idle timeout vary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortConfiguration {
    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// Idle period after which a read returns even with zero bytes available.
    pub timeout: Duration,
}

impl PortConfiguration {
    /// Raw 8N1 without flow control at the given baud rate.
    pub fn raw_8n1(baud_rate: u32, timeout: Duration) -> Self {
        Self { baud_rate, timeout }
    }
}

impl Default for PortConfiguration {
    fn default() -> Self {
        Self::raw_8n1(9600, Duration::from_millis(100))
    }
}

/// Byte-stream capability the protocol layer needs from a transport.
///
/// Implementations are used from a single thread; the session driver owns
/// the port and lends it to the response reader for the duration of a call.
pub trait SerialPortAdapter: std::fmt::Debug {
    /// Write bytes to the port.
    ///
    /// Returns the number of bytes actually transferred, which may be short.
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError>;

    /// Read whatever is available into `buffer`, blocking at most `timeout`.
    ///
    /// An idle line is reported either as `Ok(0)` or as an error for which
    /// [`PortError::is_idle`] holds.
    fn read_available(&mut self, buffer: &mut [u8], timeout: Duration)
        -> Result<usize, PortError>;

    /// Discard bytes that were received but not yet read.
    fn discard_pending(&mut self) -> Result<(), PortError>;

    /// Get the name/path of this serial port.
    fn name(&self) -> &str;
}

impl<T: SerialPortAdapter + ?Sized> SerialPortAdapter for Box<T> {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        (**self).write_bytes(data)
    }

    fn read_available(
        &mut self,
        buffer: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, PortError> {
        (**self).read_available(buffer, timeout)
    }

    fn discard_pending(&mut self) -> Result<(), PortError> {
        (**self).discard_pending()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
