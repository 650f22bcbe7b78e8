//! Splitting raw pipe output into complete lines

use crate::monitor::constants::MAX_LINE_BYTES;

/// Accumulates byte chunks from a pipe and yields complete lines.
///
/// A trailing fragment without a terminator is held back until a later chunk
/// completes it, up to `max_line` bytes; past that it is flushed as a line of
/// its own. `\r\n` endings (Windows ping) are stripped along with `\n`.
#[derive(Debug)]
pub struct LineBuffer {
    pending: Vec<u8>,
    max_line: usize,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::with_max_line(MAX_LINE_BYTES)
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line(max_line: usize) -> Self {
        Self {
            pending: Vec::new(),
            max_line: max_line.max(1),
        }
    }

    /// Append a chunk and return every line it completed, in order
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        loop {
            let rest = &self.pending[start..];
            match rest.iter().position(|&b| b == b'\n') {
                Some(offset) if offset <= self.max_line => {
                    lines.push(decode_line(&rest[..offset]));
                    start += offset + 1;
                }
                _ if rest.len() > self.max_line => {
                    lines.push(decode_line(&rest[..self.max_line]));
                    start += self.max_line;
                }
                _ => break,
            }
        }
        self.pending.drain(..start);
        lines
    }

    /// Flush the unterminated remainder once the stream has closed
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = decode_line(&self.pending);
        self.pending.clear();
        Some(line)
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    // Windows ping writes in the console code page; keep what decodes
    String::from_utf8_lossy(bytes).into_owned()
}
