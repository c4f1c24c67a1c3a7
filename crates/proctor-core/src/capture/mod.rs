//! Capture proxy for the harness-wide diagnostic channel
//!
//! Submitted code writes its `print`/`debug` output into a
//! [`DiagnosticChannel`]. [`DiagnosticChannel::begin_capture`] pushes an
//! in-memory buffer onto the channel's capture stack and hands back a
//! [`CaptureGuard`]; ending the guard (or dropping it on any exit path)
//! unlinks that buffer wherever it sits, so guards may end in any order.

mod sink;

pub use sink::{CaptureBuffer, LineSink, TracingSink};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Options for a single capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureOptions {
    /// Also forward captured lines to the sink that was active before
    #[serde(default)]
    pub pass_through: bool,

    /// Maximum number of lines submitted code may emit
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    /// Maximum characters kept per line
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
}

fn default_max_lines() -> usize {
    1000
}

fn default_max_line_len() -> usize {
    2000
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            pass_through: false,
            max_lines: default_max_lines(),
            max_line_len: default_max_line_len(),
        }
    }
}

impl CaptureOptions {
    /// Enable pass-through to the previous sink
    pub fn with_pass_through(mut self, pass_through: bool) -> Self {
        self.pass_through = pass_through;
        self
    }

    /// Set the line cap
    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }
}

/// One active capture on the stack
struct CaptureLayer {
    id: u64,
    buffer: Arc<CaptureBuffer>,
    pass_through: bool,
}

struct ChannelState {
    host: Arc<dyn LineSink>,
    /// Active captures, innermost last
    layers: Vec<CaptureLayer>,
    next_id: u64,
}

impl ChannelState {
    /// Sinks a line reaches, innermost first
    fn route(&self) -> Vec<Arc<dyn LineSink>> {
        let mut targets: Vec<Arc<dyn LineSink>> = Vec::new();
        for layer in self.layers.iter().rev() {
            targets.push(layer.buffer.clone());
            if !layer.pass_through {
                return targets;
            }
        }
        targets.push(Arc::clone(&self.host));
        targets
    }
}

/// Harness-wide output channel that submitted code prints through
#[derive(Clone)]
pub struct DiagnosticChannel {
    state: Arc<RwLock<ChannelState>>,
}

impl Default for DiagnosticChannel {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl std::fmt::Debug for DiagnosticChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticChannel")
            .field("captures", &self.state.read().layers.len())
            .finish()
    }
}

impl DiagnosticChannel {
    /// Create a channel writing to `sink`
    pub fn new(sink: Arc<dyn LineSink>) -> Self {
        Self {
            state: Arc::new(RwLock::new(ChannelState {
                host: sink,
                layers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Write a line to the innermost capture, or the host sink when idle
    pub fn emit(&self, line: &str) {
        // Resolve targets under the lock, write outside it, so a sink may
        // itself touch the channel.
        let targets = self.state.read().route();
        for target in targets {
            target.write_line(line);
        }
    }

    /// The sink a line lands in first
    pub fn current_sink(&self) -> Arc<dyn LineSink> {
        let state = self.state.read();
        match state.layers.last() {
            Some(layer) => layer.buffer.clone() as Arc<dyn LineSink>,
            None => Arc::clone(&state.host),
        }
    }

    /// Whether any capture is active
    pub fn is_capturing(&self) -> bool {
        !self.state.read().layers.is_empty()
    }

    /// Redirect the channel into a fresh buffer until the guard is ended
    pub fn begin_capture(&self, options: &CaptureOptions) -> CaptureGuard {
        let buffer = Arc::new(CaptureBuffer::new(options.max_lines, options.max_line_len));

        let mut state = self.state.write();
        let id = state.next_id;
        state.next_id += 1;
        state.layers.push(CaptureLayer {
            id,
            buffer: Arc::clone(&buffer),
            pass_through: options.pass_through,
        });
        let depth = state.layers.len();
        drop(state);

        tracing::trace!(id, depth, pass_through = options.pass_through, "capture started");

        CaptureGuard {
            channel: self.clone(),
            id: Some(id),
            buffer,
        }
    }

    /// Unlink capture `id`; lines then fall through to whatever sits below it
    fn release(&self, id: u64) {
        let mut state = self.state.write();
        if let Some(index) = state.layers.iter().position(|layer| layer.id == id) {
            state.layers.remove(index);
        }
    }
}

/// Scoped redirection of a [`DiagnosticChannel`]
///
/// The redirection is removed by [`CaptureGuard::end`] or, failing that,
/// when the guard is dropped. Removal happens exactly once and only touches
/// this guard's own capture.
pub struct CaptureGuard {
    channel: DiagnosticChannel,
    id: Option<u64>,
    buffer: Arc<CaptureBuffer>,
}

impl CaptureGuard {
    /// Append a harness-owned line in order with captured output
    pub fn record(&self, line: impl Into<String>) {
        self.buffer.record(line);
    }

    /// The buffer captured output is going to
    pub fn buffer(&self) -> &Arc<CaptureBuffer> {
        &self.buffer
    }

    /// Whether this guard still holds the redirection
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    /// Remove the redirection and return everything captured
    ///
    /// Calling this again after the first time restores nothing and returns
    /// an empty list.
    pub fn end(&mut self) -> Vec<String> {
        if !self.restore() {
            return Vec::new();
        }
        self.buffer.take()
    }

    fn restore(&mut self) -> bool {
        match self.id.take() {
            Some(id) => {
                self.channel.release(id);
                tracing::trace!(id, "capture released");
                true
            }
            None => false,
        }
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        if self.restore() {
            tracing::debug!("capture released on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_channel() -> (DiagnosticChannel, Arc<CaptureBuffer>) {
        let host = Arc::new(CaptureBuffer::new(100, 200));
        (DiagnosticChannel::new(host.clone()), host)
    }

    #[test]
    fn test_capture_redirects_and_restores() {
        let (channel, host) = recording_channel();
        let original = channel.current_sink();

        let mut guard = channel.begin_capture(&CaptureOptions::default());
        channel.emit("captured");
        assert!(channel.is_capturing());

        let lines = guard.end();
        assert_eq!(lines, vec!["captured"]);
        assert!(host.is_empty());
        assert!(Arc::ptr_eq(&channel.current_sink(), &original));

        channel.emit("after");
        assert_eq!(host.take(), vec!["after"]);
    }

    #[test]
    fn test_end_is_idempotent() {
        let (channel, _host) = recording_channel();
        let mut guard = channel.begin_capture(&CaptureOptions::default());
        channel.emit("once");

        assert_eq!(guard.end(), vec!["once"]);
        assert!(!guard.is_active());
        assert!(guard.end().is_empty());
        assert!(!channel.is_capturing());
    }

    #[test]
    fn test_drop_restores_sink() {
        let (channel, host) = recording_channel();
        let original = channel.current_sink();
        {
            let _guard = channel.begin_capture(&CaptureOptions::default());
            channel.emit("lost with the guard");
        }
        assert!(Arc::ptr_eq(&channel.current_sink(), &original));
        assert!(!channel.is_capturing());
        assert!(host.is_empty());
    }

    #[test]
    fn test_restores_on_unwind() {
        let (channel, _host) = recording_channel();
        let original = channel.current_sink();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = channel.begin_capture(&CaptureOptions::default());
            panic!("evaluation blew up");
        }));

        assert!(result.is_err());
        assert!(Arc::ptr_eq(&channel.current_sink(), &original));
    }

    #[test]
    fn test_repeated_pairs_never_leak() {
        let (channel, _host) = recording_channel();
        let original = channel.current_sink();

        for i in 0..50 {
            let mut guard = channel.begin_capture(&CaptureOptions::default());
            channel.emit(&format!("run {}", i));
            assert_eq!(guard.end(), vec![format!("run {}", i)]);
        }

        assert!(Arc::ptr_eq(&channel.current_sink(), &original));
        assert!(!channel.is_capturing());
    }

    #[test]
    fn test_pass_through_reaches_host() {
        let (channel, host) = recording_channel();
        let mut guard = channel.begin_capture(&CaptureOptions::default().with_pass_through(true));
        channel.emit("both");

        assert_eq!(guard.end(), vec!["both"]);
        assert_eq!(host.take(), vec!["both"]);
    }

    #[test]
    fn test_nested_captures_unwind_in_order() {
        let (channel, _host) = recording_channel();
        let original = channel.current_sink();

        let mut outer = channel.begin_capture(&CaptureOptions::default());
        channel.emit("outer");
        let mut inner = channel.begin_capture(&CaptureOptions::default());
        channel.emit("inner");

        assert_eq!(inner.end(), vec!["inner"]);
        channel.emit("outer again");
        assert_eq!(outer.end(), vec!["outer", "outer again"]);
        assert!(Arc::ptr_eq(&channel.current_sink(), &original));
    }

    #[test]
    fn test_record_interleaves_with_output() {
        let (channel, _host) = recording_channel();
        let mut guard = channel.begin_capture(&CaptureOptions::default());
        channel.emit("from code");
        guard.record("from harness");
        channel.emit("more code");
        assert_eq!(guard.end(), vec!["from code", "from harness", "more code"]);
    }

    #[test]
    fn test_out_of_order_end_restores_host() {
        let (channel, host) = recording_channel();
        let original = channel.current_sink();

        let mut first = channel.begin_capture(&CaptureOptions::default());
        let mut second = channel.begin_capture(&CaptureOptions::default());
        channel.emit("inside both");

        assert!(first.end().is_empty());
        channel.emit("second still open");
        assert_eq!(second.end(), vec!["inside both", "second still open"]);

        channel.emit("after both ended");
        assert_eq!(host.take(), vec!["after both ended"]);
        assert!(Arc::ptr_eq(&channel.current_sink(), &original));
        assert!(!channel.is_capturing());
    }

    #[test]
    fn test_unlinked_outer_capture_stops_receiving_pass_through() {
        let (channel, host) = recording_channel();

        let mut outer = channel.begin_capture(&CaptureOptions::default());
        let mut inner = channel.begin_capture(&CaptureOptions::default().with_pass_through(true));
        channel.emit("shared");
        assert_eq!(outer.end(), vec!["shared"]);

        channel.emit("inner and host");
        assert_eq!(inner.end(), vec!["shared", "inner and host"]);
        assert_eq!(host.take(), vec!["inner and host"]);
    }

    #[test]
    fn test_dropping_outer_guard_first_keeps_inner_capture() {
        let (channel, host) = recording_channel();

        let outer = channel.begin_capture(&CaptureOptions::default());
        let mut inner = channel.begin_capture(&CaptureOptions::default());
        drop(outer);

        channel.emit("still captured");
        assert!(channel.is_capturing());
        assert_eq!(inner.end(), vec!["still captured"]);
        assert!(host.is_empty());
        assert!(!channel.is_capturing());
    }
}
