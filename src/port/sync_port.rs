//! Synchronous serial port implementation.
//!
//! Wraps the `serialport` crate's `SerialPort` trait with our own
//! `SerialPortAdapter` trait so the protocol layer can be tested without
//! hardware.

use super::error::PortError;
use super::traits::{PortConfiguration, SerialPortAdapter};
use std::io::{Read, Write};
use std::time::Duration;
use tracing::{debug, info};

/// Timeout bookkeeping for the driver.
///
/// Reads may shrink the driver timeout to fit a deadline; writes always run
/// under the configured one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DriverTimeout {
    configured: Duration,
    current: Duration,
}

impl DriverTimeout {
    fn new(configured: Duration) -> Self {
        Self {
            configured,
            current: configured,
        }
    }

    /// The timeout to program before a read, if it differs from the driver's.
    fn for_read(&mut self, wanted: Duration) -> Option<Duration> {
        self.switch_to(wanted)
    }

    /// The timeout to program before a write, if it differs from the driver's.
    fn for_write(&mut self) -> Option<Duration> {
        self.switch_to(self.configured)
    }

    fn switch_to(&mut self, wanted: Duration) -> Option<Duration> {
        if wanted == self.current {
            None
        } else {
            self.current = wanted;
            Some(wanted)
        }
    }
}

/// Synchronous serial port implementation wrapping `serialport::SerialPort`.
pub struct SyncSerialPort {
    /// The underlying serial port implementation.
    port: Box<dyn serialport::SerialPort>,
    /// The port name/path for identification.
    name: String,
    timeout: DriverTimeout,
}

impl SyncSerialPort {
    /// Open a serial port in raw 8N1 mode without flow control.
    ///
    /// Settings the driver refuses surface as [`PortError::Config`]; a missing
    /// device as [`PortError::NotFound`].
    ///
    /// # Example
    /// ```no_run
    /// use serial_calc::port::{PortConfiguration, SyncSerialPort};
    ///
    /// let port = SyncSerialPort::open("/dev/ttyACM0", PortConfiguration::default())?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(port_name: &str, config: PortConfiguration) -> Result<Self, PortError> {
        let port = serialport::new(port_name, config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .flow_control(serialport::FlowControl::None)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .timeout(config.timeout)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => PortError::not_found(port_name),
                serialport::ErrorKind::InvalidInput => PortError::config(e.to_string()),
                _ => PortError::Serial(e),
            })?;

        info!(port = port_name, baud = config.baud_rate, "serial port opened");

        Ok(Self {
            port,
            name: port_name.to_string(),
            timeout: DriverTimeout::new(config.timeout),
        })
    }
}

impl SerialPortAdapter for SyncSerialPort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        if let Some(timeout) = self.timeout.for_write() {
            self.port.set_timeout(timeout)?;
        }
        let written = self.port.write(data)?;
        self.port.flush()?;
        Ok(written)
    }

    fn read_available(
        &mut self,
        buffer: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, PortError> {
        if let Some(timeout) = self.timeout.for_read(timeout) {
            self.port.set_timeout(timeout)?;
        }
        self.port.read(buffer).map_err(PortError::Io)
    }

    fn discard_pending(&mut self) -> Result<(), PortError> {
        if let Ok(pending) = self.port.bytes_to_read() {
            if pending > 0 {
                debug!(port = %self.name, pending, "discarding stale input");
            }
        }
        self.port
            .clear(serialport::ClearBuffer::Input)
            .map_err(PortError::Serial)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for SyncSerialPort {
    fn drop(&mut self) {
        info!(port = %self.name, "serial port closed");
    }
}

impl std::fmt::Debug for SyncSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSerialPort")
            .field("name", &self.name)
            .field("baud_rate", &self.port.baud_rate())
            .field("timeout", &self.timeout.current)
            .finish()
    }
}
