//! Per-entry download outcome.

use std::path::PathBuf;

use crate::error::FetchError;

/// How an existing file was accepted without fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The file's digest matched the manifest checksum.
    Verified,
    /// No checksum given; existence is sufficient.
    Unchecked,
}

/// Terminal result of processing one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The file was already present and acceptable.
    Skipped {
        /// Existing file.
        path: PathBuf,
        /// Why it was accepted.
        reason: SkipReason,
    },
    /// The file was fetched (and verified, if a checksum was given).
    Downloaded {
        /// Written file.
        path: PathBuf,
        /// Final size in bytes.
        size: u64,
    },
    /// The entry could not be materialized.
    Failed {
        /// What went wrong.
        error: FetchError,
    },
}

impl DownloadOutcome {
    /// Whether the entry counts towards the success total.
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Path of the artifact on disk, if the entry succeeded.
    pub const fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Skipped { path, .. } | Self::Downloaded { path, .. } => Some(path),
            Self::Failed { .. } => None,
        }
    }
}
