//! Line sinks the diagnostic channel can point at

use parking_lot::Mutex;

/// Destination for diagnostic lines
pub trait LineSink: Send + Sync {
    /// Write one line of output
    fn write_line(&self, line: &str);
}

/// Default sink: forwards submission output to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LineSink for TracingSink {
    fn write_line(&self, line: &str) {
        tracing::info!(target: "proctor::submission", "{}", line);
    }
}

#[derive(Debug, Default)]
struct BufferState {
    lines: Vec<String>,
    /// Lines emitted by submitted code that did not fit under the cap
    dropped: usize,
    /// How many lines emitted by submitted code are held in `lines`
    emitted: usize,
}

/// Bounded in-memory buffer that captured output is appended to
///
/// Submitted code can only fill `max_lines` entries; anything beyond that is
/// counted and summarized by a single marker line when the buffer is taken.
/// Lines recorded by the harness itself are never dropped.
#[derive(Debug)]
pub struct CaptureBuffer {
    state: Mutex<BufferState>,
    max_lines: usize,
    max_line_len: usize,
}

impl CaptureBuffer {
    pub fn new(max_lines: usize, max_line_len: usize) -> Self {
        Self {
            state: Mutex::new(BufferState::default()),
            max_lines,
            max_line_len,
        }
    }

    /// Append output produced by submitted code, honoring the caps
    pub fn push(&self, text: &str) {
        let mut state = self.state.lock();
        for line in text.split('\n') {
            if state.emitted >= self.max_lines {
                state.dropped += 1;
                continue;
            }
            state.emitted += 1;
            let line = truncate_line(line, self.max_line_len);
            state.lines.push(line);
        }
    }

    /// Append a harness-owned line; not subject to the caps
    pub fn record(&self, line: impl Into<String>) {
        self.state.lock().lines.push(line.into());
    }

    /// Number of lines currently held
    pub fn len(&self) -> usize {
        self.state.lock().lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain the buffer, appending a truncation marker if lines were dropped
    pub fn take(&self) -> Vec<String> {
        let mut state = self.state.lock();
        let mut lines = std::mem::take(&mut state.lines);
        if state.dropped > 0 {
            lines.push(format!("... {} more line(s) truncated", state.dropped));
        }
        state.dropped = 0;
        state.emitted = 0;
        lines
    }
}

impl LineSink for CaptureBuffer {
    fn write_line(&self, line: &str) {
        self.push(line);
    }
}

fn truncate_line(line: &str, max_len: usize) -> String {
    match line.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}…", &line[..cut]),
        None => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_keeps_call_order() {
        let buffer = CaptureBuffer::new(10, 100);
        buffer.push("first");
        buffer.record("harness line");
        buffer.push("second");
        assert_eq!(buffer.take(), vec!["first", "harness line", "second"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_buffer_splits_multiline_output() {
        let buffer = CaptureBuffer::new(10, 100);
        buffer.push("a\nb");
        assert_eq!(buffer.take(), vec!["a", "b"]);
    }

    #[test]
    fn test_buffer_caps_submitted_output() {
        let buffer = CaptureBuffer::new(2, 100);
        for i in 0..5 {
            buffer.push(&format!("line {}", i));
        }
        buffer.record("test line");

        let lines = buffer.take();
        assert_eq!(
            lines,
            vec![
                "line 0",
                "line 1",
                "test line",
                "... 3 more line(s) truncated"
            ]
        );
    }

    #[test]
    fn test_buffer_truncates_long_lines() {
        let buffer = CaptureBuffer::new(10, 4);
        buffer.push("abcdefgh");
        buffer.push("abcd");
        assert_eq!(buffer.take(), vec!["abcd…", "abcd"]);
    }
}
