//! Deadline-bounded response wait.
//!
//! After a request is sent, the device may still print boot or debug text
//! before (or instead of) the answer. `ResponseReader` polls the port, frames
//! what arrives into lines and returns the first line the classifier accepts,
//! or a timeout once the deadline has passed.

use super::classifier::{classify, ResultLine};
use super::clock::{Clock, SystemClock};
use super::framer::{LineFramer, DEFAULT_MAX_LINE_LEN};
use crate::port::{PortError, SerialPortAdapter};
use std::time::Duration;
use tracing::{debug, warn};

/// Default budget for one response wait.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default pause after a read attempt that produced nothing.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Default upper bound on a single blocking read.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

const READ_CHUNK: usize = 64;

/// Timing and framing parameters for [`ResponseReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderSettings {
    /// Total budget for one call.
    pub deadline: Duration,
    /// Sleep after an idle attempt.
    pub poll_interval: Duration,
    /// Upper bound on one blocking read (the transport's idle timeout).
    pub read_timeout: Duration,
    /// Bound handed to the line framer.
    pub max_line_len: usize,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            deadline: DEFAULT_RESPONSE_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            read_timeout: DEFAULT_READ_TIMEOUT,
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

/// How a response wait ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A valid result line arrived.
    Done(ResultLine),
    /// The deadline passed first.
    Timeout { waited: Duration },
}

impl ReadOutcome {
    pub fn result(&self) -> Option<&ResultLine> {
        match self {
            Self::Done(result) => Some(result),
            Self::Timeout { .. } => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Polls a port until a result line arrives or the deadline passes.
#[derive(Debug, Clone)]
pub struct ResponseReader<C = SystemClock> {
    settings: ReaderSettings,
    clock: C,
}

impl ResponseReader<SystemClock> {
    pub fn new(settings: ReaderSettings) -> Self {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> ResponseReader<C> {
    /// Create a reader driven by a custom clock.
    pub fn with_clock(settings: ReaderSettings, clock: C) -> Self {
        Self { settings, clock }
    }

    pub fn settings(&self) -> &ReaderSettings {
        &self.settings
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Wait for the next result line on `port`.
    ///
    /// Each read blocks for at most the read timeout, clamped to what is left
    /// of the deadline; an idle attempt is followed by one poll interval of
    /// sleep, also clamped. Noise lines are dropped. A transport error other
    /// than an idle line aborts the wait.
    pub fn read_response<P>(&self, port: &mut P) -> Result<ReadOutcome, PortError>
    where
        P: SerialPortAdapter + ?Sized,
    {
        let deadline = self.settings.deadline;
        let started = self.clock.now();
        let mut framer = LineFramer::with_max_line_len(self.settings.max_line_len);
        let mut buffer = [0u8; READ_CHUNK];
        let mut noise_lines = 0usize;

        loop {
            let elapsed = self.clock.now().saturating_duration_since(started);
            if elapsed >= deadline {
                warn!(
                    port = port.name(),
                    waited_ms = elapsed.as_millis() as u64,
                    noise_lines,
                    "no result line before deadline"
                );
                return Ok(ReadOutcome::Timeout { waited: elapsed });
            }
            let remaining = deadline - elapsed;
            let attempt = self.settings.read_timeout.min(remaining);

            let received = match port.read_available(&mut buffer, attempt) {
                Ok(n) => n,
                Err(e) if e.is_idle() => 0,
                Err(e) => return Err(e),
            };

            if received == 0 {
                self.clock.sleep(self.settings.poll_interval.min(remaining));
                continue;
            }

            for line in framer.push_chunk(&buffer[..received]) {
                match classify(&line) {
                    Some(result) => {
                        debug!(
                            result = %result,
                            noise_lines,
                            elapsed_ms = elapsed.as_millis() as u64,
                            "result line received"
                        );
                        return Ok(ReadOutcome::Done(result));
                    }
                    None => {
                        noise_lines += 1;
                        debug!(line = %line, "ignoring device noise");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::MockSerialPort;
    use crate::protocol::clock::ManualClock;
    use std::io;

    fn reader(deadline_ms: u64) -> (ResponseReader<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let settings = ReaderSettings {
            deadline: Duration::from_millis(deadline_ms),
            ..ReaderSettings::default()
        };
        (ResponseReader::with_clock(settings, clock.clone()), clock)
    }

    #[test]
    fn noise_before_result_is_skipped() {
        let (reader, _) = reader(5000);
        let mut port = MockSerialPort::new("MOCK0");
        port.enqueue_read(b"BOOT\n");
        port.enqueue_idle(3);
        port.enqueue_read(b"READY\n");
        port.enqueue_read(b"18\n");

        let outcome = reader.read_response(&mut port).unwrap();
        assert_eq!(outcome.result().map(ResultLine::as_str), Some("18"));
    }

    #[test]
    fn silent_port_times_out_at_deadline() {
        let (reader, clock) = reader(250);
        let mut port = MockSerialPort::new("MOCK0");

        let outcome = reader.read_response(&mut port).unwrap();

        match outcome {
            ReadOutcome::Timeout { waited } => {
                assert!(waited >= Duration::from_millis(250));
                assert!(waited < Duration::from_millis(250) + DEFAULT_POLL_INTERVAL);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        assert_eq!(clock.elapsed(), Duration::from_millis(250));
        assert_eq!(port.read_attempts(), 25);
    }

    #[test]
    fn odd_deadline_is_not_overshot() {
        let (reader, clock) = reader(25);
        let mut port = MockSerialPort::new("MOCK0");

        let outcome = reader.read_response(&mut port).unwrap();
        assert_eq!(
            outcome,
            ReadOutcome::Timeout {
                waited: Duration::from_millis(25)
            }
        );
        assert_eq!(clock.elapsed(), Duration::from_millis(25));
    }

    #[test]
    fn read_timeout_is_clamped_to_remaining_budget() {
        let (reader, _) = reader(150);
        let mut port = MockSerialPort::new("MOCK0");

        reader.read_response(&mut port).unwrap();

        let timeouts = port.read_timeouts();
        assert_eq!(timeouts.first(), Some(&DEFAULT_READ_TIMEOUT));
        assert_eq!(timeouts.last(), Some(&Duration::from_millis(10)));
        assert!(timeouts.iter().all(|t| *t <= DEFAULT_READ_TIMEOUT));
    }

    #[test]
    fn first_result_in_chunk_wins() {
        let (reader, _) = reader(1000);
        let mut port = MockSerialPort::new("MOCK0");
        port.enqueue_read(b"dbg: a=5\r\n-5\r\n99\r\n");

        let outcome = reader.read_response(&mut port).unwrap();
        assert_eq!(outcome.result().map(ResultLine::as_str), Some("-5"));
    }

    #[test]
    fn result_split_across_reads() {
        let (reader, _) = reader(1000);
        let mut port = MockSerialPort::new("MOCK0");
        port.enqueue_read(b"11");
        port.enqueue_idle(2);
        port.enqueue_read(b"88\r\n");

        let outcome = reader.read_response(&mut port).unwrap();
        assert_eq!(outcome.result().map(ResultLine::as_str), Some("1188"));
    }

    #[test]
    fn unterminated_result_is_not_accepted() {
        let (reader, _) = reader(100);
        let mut port = MockSerialPort::new("MOCK0");
        port.enqueue_read(b"1188");

        let outcome = reader.read_response(&mut port).unwrap();
        assert!(outcome.is_timeout());
    }

    #[test]
    fn only_noise_times_out() {
        let (reader, _) = reader(100);
        let mut port = MockSerialPort::new("MOCK0");
        port.enqueue_read(b"READY\n");
        port.enqueue_read(b"1 + \n");
        port.enqueue_read(b".5\n");

        assert!(reader.read_response(&mut port).unwrap().is_timeout());
    }

    #[test]
    fn hard_read_error_is_propagated() {
        let (reader, _) = reader(1000);
        let mut port = MockSerialPort::new("MOCK0");
        port.fail_next_read(io::ErrorKind::BrokenPipe);

        let err = reader.read_response(&mut port).unwrap_err();
        assert!(matches!(err, PortError::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn interrupted_read_counts_as_idle() {
        let (reader, _) = reader(1000);
        let mut port = MockSerialPort::new("MOCK0");
        port.fail_next_read(io::ErrorKind::Interrupted);
        port.enqueue_read(b"DIV0\n");

        let outcome = reader.read_response(&mut port).unwrap();
        assert_eq!(outcome.result().map(ResultLine::as_str), Some("DIV0"));
    }

    #[test]
    fn each_call_starts_with_a_fresh_line_buffer() {
        let (reader, _) = reader(50);
        let mut port = MockSerialPort::new("MOCK0");
        port.enqueue_read(b"12");

        assert!(reader.read_response(&mut port).unwrap().is_timeout());

        port.enqueue_read(b"34\n");
        let outcome = reader.read_response(&mut port).unwrap();
        assert_eq!(outcome.result().map(ResultLine::as_str), Some("34"));
    }
}
