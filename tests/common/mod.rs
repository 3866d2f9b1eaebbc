//! Shared test utilities for serial-calc integration tests.
//!
//! - Mock calculator boards with scripted replies
//! - Sessions wired to a manual clock and a temporary results log

#![allow(dead_code)]

use serial_calc::config::Config;
use serial_calc::protocol::ManualClock;
use serial_calc::{MockSerialPort, Session};
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a mock board that answers each write with the next reply, in order.
pub fn create_mock_board(replies: &[&[u8]]) -> MockSerialPort {
    let mut mock = MockSerialPort::new("MOCK0");
    for reply in replies {
        mock.reply_on_write(reply);
    }
    mock
}

/// A session over a mock board, plus the handles a test needs to inspect it.
pub struct Harness {
    pub port: MockSerialPort,
    pub clock: ManualClock,
    pub session: Session<MockSerialPort, ManualClock>,
    pub results_log: PathBuf,
    // Keeps the results log directory alive for the test's duration.
    _dir: TempDir,
}

impl Harness {
    /// Build a session with a 500 ms response deadline.
    pub fn new(port: MockSerialPort) -> Self {
        Self::with_config(port, |config| {
            config.protocol.response_timeout_ms = 500;
        })
    }

    /// Build a session after letting `tweak` adjust the configuration.
    pub fn with_config(port: MockSerialPort, tweak: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let results_log = dir.path().join("results.txt");

        let mut config = Config::default();
        config.session.results_log = results_log.clone();
        config.session.prompt = "> ".to_string();
        tweak(&mut config);

        let clock = ManualClock::new();
        let session = Session::with_clock(port.clone(), &config, clock.clone());

        Self {
            port,
            clock,
            session,
            results_log,
            _dir: dir,
        }
    }

    /// Feed `input` as console text and collect (stdout, stderr).
    pub fn run(&mut self, input: &str) -> (String, String) {
        self.run_bytes(input.as_bytes())
    }

    /// Feed raw console bytes and collect (stdout, stderr).
    pub fn run_bytes(&mut self, input: &[u8]) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        self.session
            .run(input, &mut out, &mut err)
            .expect("session run");
        (
            String::from_utf8(out).expect("utf8 stdout"),
            String::from_utf8(err).expect("utf8 stderr"),
        )
    }

    /// Contents of the results log, or empty if it was never written.
    pub fn results_log_contents(&self) -> String {
        std::fs::read_to_string(&self.results_log).unwrap_or_default()
    }

    /// Requests written to the board, as text.
    pub fn sent_requests(&self) -> Vec<String> {
        self.port
            .get_write_log()
            .into_iter()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .collect()
    }
}
