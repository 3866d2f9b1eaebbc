//! Interactive calculator session.
//!
//! `Session` owns the port for its whole lifetime. Each request cycle
//! discards stale input, sends one expression line, waits for the result via
//! [`ResponseReader`] and reports the exchange to the console and the results
//! log. Failures of a single cycle are reported and the loop carries on.

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::port::{SerialPortAdapter, SyncSerialPort};
use crate::protocol::{Clock, ReadOutcome, ResponseReader, ResultLine, SystemClock};
use crate::results_log::ResultsLog;
use std::fmt;
use std::io::{BufRead, Write};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Console inputs that end the session.
pub const EXIT_COMMANDS: [&str; 2] = ["exit", "quit"];

/// A request together with the result the device gave for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub expression: String,
    pub result: ResultLine,
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.expression, self.result)
    }
}

/// Outcome of one request cycle that reached the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Completed(Exchange),
    NoResponse { waited: Duration },
}

/// What the interactive loop should do after one console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exit,
}

/// Counters reported when the interactive loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub exchanges: usize,
    pub timeouts: usize,
    pub failures: usize,
}

/// Request/response driver bound to one port.
#[derive(Debug)]
pub struct Session<P, C = SystemClock> {
    port: P,
    reader: ResponseReader<C>,
    terminator: String,
    prompt: String,
    settle: Duration,
    results_log: ResultsLog,
    summary: SessionSummary,
}

impl Session<SyncSerialPort> {
    /// Open the configured device and bring the session up.
    ///
    /// A device that cannot be opened is [`AppError::PortOpen`]; one that
    /// rejects the raw 8N1 settings is [`AppError::PortConfig`].
    pub fn open(config: &Config) -> AppResult<Self> {
        let port = SyncSerialPort::open(&config.serial.port, config.serial.port_configuration())
            .map_err(|e| AppError::port_setup(config.serial.port.as_str(), e))?;
        let mut session = Self::new(port, config);
        session.start()?;
        Ok(session)
    }
}

impl<P: SerialPortAdapter> Session<P> {
    pub fn new(port: P, config: &Config) -> Self {
        Self::with_clock(port, config, SystemClock)
    }
}

impl<P: SerialPortAdapter, C: Clock> Session<P, C> {
    /// Create a session whose waits run on `clock`.
    pub fn with_clock(port: P, config: &Config, clock: C) -> Self {
        Self {
            port,
            reader: ResponseReader::with_clock(config.reader_settings(), clock),
            terminator: config.protocol.terminator.clone(),
            prompt: config.session.prompt.clone(),
            settle: config.serial.settle(),
            results_log: ResultsLog::new(&config.session.results_log),
            summary: SessionSummary::default(),
        }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Wait for the board to come out of reset, then drop its start-up output.
    pub fn start(&mut self) -> AppResult<()> {
        if !self.settle.is_zero() {
            debug!(settle_ms = self.settle.as_millis() as u64, "waiting for device reset");
            self.reader.clock().sleep(self.settle);
        }
        self.port
            .discard_pending()
            .map_err(|source| AppError::PortConfig {
                port: self.port.name().to_string(),
                source,
            })
    }

    /// Run one request cycle for `expression`.
    ///
    /// The terminator is appended unless already present. Timeouts come back
    /// as [`Transaction::NoResponse`]; send and receive failures as errors.
    pub fn transact(&mut self, expression: &str) -> AppResult<Transaction> {
        if let Err(e) = self.port.discard_pending() {
            warn!(port = self.port.name(), error = %e, "could not discard stale input");
        }

        let request = if expression.ends_with(&self.terminator) {
            expression.to_string()
        } else {
            format!("{expression}{}", self.terminator)
        };
        let written = self
            .port
            .write_bytes(request.as_bytes())
            .map_err(AppError::Send)?;
        if written != request.len() {
            return Err(AppError::ShortWrite {
                written,
                expected: request.len(),
            });
        }
        debug!(port = self.port.name(), request = %request.trim_end(), "request sent");

        let outcome = self
            .reader
            .read_response(&mut self.port)
            .map_err(AppError::Receive)?;

        Ok(match outcome {
            ReadOutcome::Done(result) => Transaction::Completed(Exchange {
                expression: display_expression(expression, &self.terminator).to_string(),
                result,
            }),
            ReadOutcome::Timeout { waited } => Transaction::NoResponse { waited },
        })
    }

    /// Handle one console line: send it, or end the session on `exit`/`quit`.
    ///
    /// Per-cycle failures are written to `err` and do not end the session.
    pub fn handle_input<W: Write, E: Write>(
        &mut self,
        input: &str,
        out: &mut W,
        err: &mut E,
    ) -> AppResult<Step> {
        if EXIT_COMMANDS.contains(&input) {
            return Ok(Step::Exit);
        }
        if input.is_empty() {
            return Ok(Step::Continue);
        }

        match self.transact(input) {
            Ok(Transaction::Completed(exchange)) => {
                self.summary.exchanges += 1;
                writeln!(out, "{exchange}")?;
                if let Err(e) = self.results_log.append(&exchange.to_string()) {
                    warn!(error = %e, "results log not updated");
                    writeln!(err, "{e}")?;
                }
            }
            Ok(Transaction::NoResponse { .. }) => {
                self.summary.timeouts += 1;
                writeln!(out, "No response (timeout).")?;
            }
            Err(e) if e.is_recoverable() => {
                self.summary.failures += 1;
                warn!(error = %e, "request cycle failed");
                writeln!(err, "{e}")?;
            }
            Err(e) => return Err(e),
        }
        Ok(Step::Continue)
    }

    /// Prompt for expressions until `exit`, `quit` or end of input.
    ///
    /// Console bytes that are not valid UTF-8 are replaced with U+FFFD; the
    /// line is still sent.
    pub fn run<R: BufRead, W: Write, E: Write>(
        &mut self,
        mut input: R,
        mut out: W,
        mut err: E,
    ) -> AppResult<SessionSummary> {
        let mut line = Vec::new();
        loop {
            write!(out, "{}", self.prompt)?;
            out.flush()?;

            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                writeln!(out)?;
                break;
            }
            let text = String::from_utf8_lossy(&line);
            let expression = text.trim_end_matches(|c: char| c == '\n' || c == '\r');

            if self.handle_input(expression, &mut out, &mut err)? == Step::Exit {
                break;
            }
        }

        info!(
            exchanges = self.summary.exchanges,
            timeouts = self.summary.timeouts,
            failures = self.summary.failures,
            "session finished"
        );
        Ok(self.summary)
    }
}

/// The expression as echoed back, without its line terminator.
fn display_expression<'a>(expression: &'a str, terminator: &str) -> &'a str {
    expression
        .strip_suffix(terminator)
        .unwrap_or(expression)
        .trim_end_matches(|c: char| c == '\n' || c == '\r')
}
