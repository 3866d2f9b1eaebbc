//! Line framing for the device byte stream.
//!
//! The calculator terminates every line with `\n`, `\r` or `\r\n`, and reads
//! can split a line anywhere. `LineFramer` reassembles the chunks into
//! trimmed candidate lines.

use memchr::memchr2;
use tracing::debug;

/// Default upper bound on the bytes buffered for a single line.
pub const DEFAULT_MAX_LINE_LEN: usize = 256;

/// Accumulates raw bytes and emits trimmed, delimiter-free lines.
///
/// Blank lines (including the empty line between the `\r` and `\n` of a CRLF
/// pair) are swallowed. A line that grows past the configured bound is
/// dropped, and the framer skips input until the next delimiter.
#[derive(Debug, Clone)]
pub struct LineFramer {
    buffer: Vec<u8>,
    max_line_len: usize,
    /// Set while skipping the tail of an over-long line.
    discarding: bool,
    overflowed_lines: u64,
}

impl LineFramer {
    /// Create a framer with the default line bound.
    pub fn new() -> Self {
        Self::with_max_line_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a framer that drops lines longer than `max_line_len` bytes.
    pub fn with_max_line_len(max_line_len: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(max_line_len.min(DEFAULT_MAX_LINE_LEN)),
            max_line_len,
            discarding: false,
            overflowed_lines: 0,
        }
    }

    /// Feed a single byte, returning a line if `byte` completed one.
    pub fn push_byte(&mut self, byte: u8) -> Option<String> {
        if is_delimiter(byte) {
            self.finish_line()
        } else {
            self.append(&[byte]);
            None
        }
    }

    /// Feed a chunk, returning every line it completed in order.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        let mut rest = chunk;
        while let Some(pos) = memchr2(b'\n', b'\r', rest) {
            self.append(&rest[..pos]);
            if let Some(line) = self.finish_line() {
                lines.push(line);
            }
            rest = &rest[pos + 1..];
        }
        self.append(rest);
        lines
    }

    /// Bytes buffered for the line in progress.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Number of lines dropped for exceeding the bound.
    pub fn overflowed_lines(&self) -> u64 {
        self.overflowed_lines
    }

    /// Forget the line in progress.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    fn append(&mut self, bytes: &[u8]) {
        if self.discarding || bytes.is_empty() {
            return;
        }
        if self.buffer.len() + bytes.len() > self.max_line_len {
            debug!(
                limit = self.max_line_len,
                buffered = self.buffer.len(),
                "line exceeds bound, dropping until next delimiter"
            );
            self.buffer.clear();
            self.discarding = true;
            self.overflowed_lines += 1;
            return;
        }
        self.buffer.extend_from_slice(bytes);
    }

    fn finish_line(&mut self) -> Option<String> {
        if self.discarding {
            self.discarding = false;
            return None;
        }
        let trimmed = trim_ascii_space(&self.buffer);
        let line = if trimmed.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(trimmed).into_owned())
        };
        self.buffer.clear();
        line
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_delimiter(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

// Space, tab, LF, VT, FF, CR.
fn is_ascii_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

fn trim_ascii_space(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !is_ascii_space(*b))
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !is_ascii_space(*b))
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn feed_bytewise(framer: &mut LineFramer, input: &[u8]) -> Vec<String> {
        input.iter().filter_map(|b| framer.push_byte(*b)).collect()
    }

    #[test]
    fn crlf_stream_fed_bytewise_yields_two_lines() {
        let mut framer = LineFramer::new();
        let lines = feed_bytewise(&mut framer, b"42\r\nERR\n");
        assert_eq!(lines, vec!["42".to_string(), "ERR".to_string()]);
        assert_eq!(framer.pending_len(), 0);
    }

    #[test]
    fn chunked_and_bytewise_agree() {
        let input = b"BOOT v1.2\r\n  -7.25 \n\rDIV0\r";
        let mut bytewise = LineFramer::new();
        let mut chunked = LineFramer::new();

        let expected = feed_bytewise(&mut bytewise, input);
        let mut actual = Vec::new();
        for piece in input.chunks(3) {
            actual.extend(chunked.push_chunk(piece));
        }

        assert_eq!(expected, vec!["BOOT v1.2", "-7.25", "DIV0"]);
        assert_eq!(actual, expected);
    }

    #[test]
    fn line_split_across_chunks_is_reassembled() {
        let mut framer = LineFramer::new();
        assert!(framer.push_chunk(b"11").is_empty());
        assert_eq!(framer.pending_len(), 2);
        assert_eq!(framer.push_chunk(b"88\n"), vec!["1188"]);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed_but_inner_kept() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.push_chunk(b"\t 1 + 1 \x0b\n"), vec!["1 + 1"]);
    }

    #[test]
    fn blank_lines_are_swallowed() {
        let mut framer = LineFramer::new();
        assert!(framer.push_chunk(b"\n\r\n   \r\n\t\n").is_empty());
    }

    #[test]
    fn unterminated_tail_stays_pending() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.push_chunk(b"5\n6"), vec!["5"]);
        assert_eq!(framer.pending_len(), 1);

        framer.reset();
        assert_eq!(framer.pending_len(), 0);
        assert_eq!(framer.push_chunk(b"7\n"), vec!["7"]);
    }

    #[test]
    fn overlong_line_is_dropped_and_framer_resyncs() {
        let mut framer = LineFramer::with_max_line_len(8);
        let mut input = vec![b'#'; 20];
        input.extend_from_slice(b"\n123\n");

        assert_eq!(framer.push_chunk(&input), vec!["123"]);
        assert_eq!(framer.overflowed_lines(), 1);
    }

    #[test]
    fn line_at_exact_bound_is_kept() {
        let mut framer = LineFramer::with_max_line_len(4);
        assert_eq!(framer.push_chunk(b"1234\n12345\n9\n"), vec!["1234", "9"]);
        assert_eq!(framer.overflowed_lines(), 1);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut framer = LineFramer::new();
        let lines = framer.push_chunk(b"4\xff2\n");
        assert_eq!(lines, vec!["4\u{fffd}2"]);
    }
}
