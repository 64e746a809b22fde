#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod checksum;
pub mod config;
pub mod error;
pub mod manifest;
pub mod outcome;
pub mod ports;
pub mod retry;

// Re-export commonly used types for convenience
pub use checksum::{sha256_file, verify_checksum};
pub use config::{FetchConfig, ObjectStorageConfig};
pub use error::{FetchError, FetchResult, ParseError, ParseErrorKind};
pub use manifest::{LineFormat, ManifestEntry, Source, is_entry_line, parse_line, parse_line_strict};
pub use outcome::{DownloadOutcome, SkipReason};
pub use ports::{MegabyteTicker, NoopProgress, ProgressSink, SharedProgress, SourceFetcher, noop_progress};
pub use retry::{RetryPolicy, retry_with_backoff};

