//! Mock serial port implementation for testing.
//!
//! Provides a `MockSerialPort` that simulates a calculator board without
//! hardware: scripted read chunks, idle attempts, replies triggered by writes,
//! and injected failures.

use super::error::PortError;
use super::traits::SerialPortAdapter;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// One scripted outcome of a read attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReadStep {
    /// Bytes delivered by the next read (split across reads if the buffer is short).
    Data(Vec<u8>),
    /// One read attempt that sees an idle line.
    Idle,
}

/// Inner state of the mock port, shared between clones.
#[derive(Debug, Default)]
struct MockPortState {
    /// Scripted read outcomes, consumed front to back.
    read_queue: VecDeque<ReadStep>,
    /// Replies released into the read queue, one per write.
    replies: VecDeque<Vec<u8>>,
    /// Log of all bytes written to the port.
    write_log: Vec<Vec<u8>>,
    /// Number of bytes the next write reports, if it should come up short.
    short_write: Option<usize>,
    /// Error kind the next write fails with.
    write_failure: Option<io::ErrorKind>,
    /// Error kind the next read fails with.
    read_failure: Option<io::ErrorKind>,
    /// Number of `discard_pending` calls.
    discard_count: usize,
    /// Timeouts passed to each read attempt.
    read_timeouts: Vec<Duration>,
}

/// Mock serial port implementation for testing.
///
/// Clones share state, so a test can keep one handle for inspection while the
/// session owns another.
///
/// # Example
/// ```
/// use serial_calc::port::{MockSerialPort, SerialPortAdapter};
/// use std::time::Duration;
///
/// let mut port = MockSerialPort::new("MOCK0");
/// port.reply_on_write(b"1188\n");
///
/// port.write_bytes(b"54 * 22\n").unwrap();
///
/// let mut buffer = [0u8; 16];
/// let n = port.read_available(&mut buffer, Duration::from_millis(10)).unwrap();
/// assert_eq!(&buffer[..n], b"1188\n");
/// assert_eq!(port.get_write_log(), vec![b"54 * 22\n".to_vec()]);
/// ```
#[derive(Clone)]
pub struct MockSerialPort {
    /// The port name/identifier.
    name: String,
    /// The internal state, wrapped in Arc<Mutex<>> for interior mutability.
    state: Arc<Mutex<MockPortState>>,
}

impl MockSerialPort {
    /// Create a new mock serial port with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockPortState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockPortState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue bytes to be returned by subsequent read operations.
    pub fn enqueue_read(&mut self, data: &[u8]) {
        self.state().read_queue.push_back(ReadStep::Data(data.to_vec()));
    }

    /// Enqueue `attempts` read attempts that see no data.
    pub fn enqueue_idle(&mut self, attempts: usize) {
        let mut state = self.state();
        for _ in 0..attempts {
            state.read_queue.push_back(ReadStep::Idle);
        }
    }

    /// Release `data` into the read queue when the next write happens.
    ///
    /// Replies queue up; each write releases one.
    pub fn reply_on_write(&mut self, data: &[u8]) {
        self.state().replies.push_back(data.to_vec());
    }

    /// Make the next write report only `accepted` bytes as transferred.
    pub fn set_short_write(&mut self, accepted: usize) {
        self.state().short_write = Some(accepted);
    }

    /// Make the next write fail with an I/O error of the given kind.
    pub fn fail_next_write(&mut self, kind: io::ErrorKind) {
        self.state().write_failure = Some(kind);
    }

    /// Make the next read fail with an I/O error of the given kind.
    pub fn fail_next_read(&mut self, kind: io::ErrorKind) {
        self.state().read_failure = Some(kind);
    }

    /// Get a copy of all data written to the port.
    pub fn get_write_log(&self) -> Vec<Vec<u8>> {
        self.state().write_log.clone()
    }

    /// Number of times pending input was discarded.
    pub fn discard_count(&self) -> usize {
        self.state().discard_count
    }

    /// Timeouts the reader passed to each read attempt, in order.
    pub fn read_timeouts(&self) -> Vec<Duration> {
        self.state().read_timeouts.clone()
    }

    /// Number of read attempts made so far.
    pub fn read_attempts(&self) -> usize {
        self.state().read_timeouts.len()
    }

    /// Get the number of bytes available to read.
    pub fn available_bytes(&self) -> usize {
        self.state()
            .read_queue
            .iter()
            .map(|step| match step {
                ReadStep::Data(bytes) => bytes.len(),
                ReadStep::Idle => 0,
            })
            .sum()
    }
}

impl SerialPortAdapter for MockSerialPort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let mut state = self.state();

        if let Some(kind) = state.write_failure.take() {
            return Err(PortError::Io(io::Error::new(kind, "simulated write failure")));
        }

        state.write_log.push(data.to_vec());

        let written = match state.short_write.take() {
            Some(accepted) => accepted.min(data.len()),
            None => data.len(),
        };

        if let Some(reply) = state.replies.pop_front() {
            state.read_queue.push_back(ReadStep::Data(reply));
        }

        Ok(written)
    }

    fn read_available(
        &mut self,
        buffer: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, PortError> {
        let mut state = self.state();
        state.read_timeouts.push(timeout);

        if let Some(kind) = state.read_failure.take() {
            return Err(PortError::Io(io::Error::new(kind, "simulated read failure")));
        }

        match state.read_queue.pop_front() {
            Some(ReadStep::Data(mut bytes)) => {
                let n = bytes.len().min(buffer.len());
                buffer[..n].copy_from_slice(&bytes[..n]);
                if n < bytes.len() {
                    let rest = bytes.split_off(n);
                    state.read_queue.push_front(ReadStep::Data(rest));
                }
                Ok(n)
            }
            Some(ReadStep::Idle) | None => Err(PortError::Io(io::Error::new(
                io::ErrorKind::TimedOut,
                "No data available",
            ))),
        }
    }

    fn discard_pending(&mut self) -> Result<(), PortError> {
        let mut state = self.state();
        state.read_queue.clear();
        state.discard_count += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("available_bytes", &self.available_bytes())
            .finish()
    }
}
