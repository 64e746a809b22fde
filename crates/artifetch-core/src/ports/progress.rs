//! Transfer progress reporting.
//!
//! Progress is an observability side effect. Capabilities report through a
//! [`ProgressSink`]; the CLI decides how (or whether) to render it.

use std::sync::Arc;

const MIB: u64 = 1024 * 1024;

/// Receiver of transfer progress events.
pub trait ProgressSink: Send + Sync {
    /// A transfer named `label` is starting; `total` is its size if known.
    fn start(&self, label: &str, total: Option<u64>);

    /// `downloaded` bytes of the current transfer are on disk.
    fn advance(&self, downloaded: u64);

    /// The current transfer ended (successfully or not).
    fn finish(&self);
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn start(&self, _label: &str, _total: Option<u64>) {}
    fn advance(&self, _downloaded: u64) {}
    fn finish(&self) {}
}

/// Shared handle to a sink.
pub type SharedProgress = Arc<dyn ProgressSink>;

/// Shared no-op sink.
pub fn noop_progress() -> SharedProgress {
    Arc::new(NoopProgress)
}

/// Forwards byte counts to a sink at whole-megabyte boundaries.
///
/// Also forwards the final count when it reaches the known total.
pub struct MegabyteTicker<'a> {
    sink: &'a dyn ProgressSink,
    total: Option<u64>,
    downloaded: u64,
    last_reported_mib: u64,
}

impl<'a> MegabyteTicker<'a> {
    /// Start a transfer on `sink`.
    pub fn start(sink: &'a dyn ProgressSink, label: &str, total: Option<u64>) -> Self {
        sink.start(label, total);
        Self {
            sink,
            total,
            downloaded: 0,
            last_reported_mib: 0,
        }
    }

    /// Record `bytes` more bytes on disk.
    pub fn add(&mut self, bytes: u64) {
        self.downloaded += bytes;
        let mib = self.downloaded / MIB;
        let complete = self.total.is_some_and(|t| self.downloaded >= t);
        if mib > self.last_reported_mib || complete {
            self.last_reported_mib = mib;
            self.sink.advance(self.downloaded);
        }
    }

    /// Bytes recorded so far.
    pub const fn downloaded(&self) -> u64 {
        self.downloaded
    }
}

impl Drop for MegabyteTicker<'_> {
    fn drop(&mut self) {
        self.sink.finish();
    }
}
