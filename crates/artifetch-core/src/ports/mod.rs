//! Port definitions implemented by adapter crates.

mod fetcher;
mod progress;

pub use fetcher::SourceFetcher;
pub use progress::{MegabyteTicker, NoopProgress, ProgressSink, SharedProgress, noop_progress};
