//! Calculator line protocol.
//!
//! ```text
//! port bytes ──> LineFramer ──> classify ──> ReadOutcome
//!                    ^                            |
//!                    └──── ResponseReader ────────┘
//! ```
//!
//! Requests are `"<number> <operator> <number>\n"`; the device answers with
//! one numeric line or `ERR` / `DIV0`, possibly preceded by unrelated text.

pub mod classifier;
pub mod clock;
pub mod framer;
pub mod reader;

pub use classifier::{classify, is_result_line, DeviceError, ResultLine, ResultValue, Sign};
pub use clock::{Clock, ManualClock, SystemClock};
pub use framer::{LineFramer, DEFAULT_MAX_LINE_LEN};
pub use reader::{
    ReadOutcome, ReaderSettings, ResponseReader, DEFAULT_POLL_INTERVAL, DEFAULT_READ_TIMEOUT,
    DEFAULT_RESPONSE_TIMEOUT,
};
