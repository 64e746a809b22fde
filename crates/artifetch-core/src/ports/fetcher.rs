//! Fetch capability port.
//!
//! One implementation per remote source. The orchestrator calls `fetch`
//! at most once per entry; any retrying happens inside it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::manifest::Source;

/// A capability that materializes one remote file on local disk.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// The source this capability serves.
    fn source(&self) -> Source;

    /// Fetch `identifier`/`filename` into `destination_dir`.
    ///
    /// The directory is created if absent. Returns the path of the written
    /// file, which may differ from `destination_dir/filename` when the
    /// source resolves a wildcard filename.
    async fn fetch(
        &self,
        identifier: &str,
        filename: &str,
        destination_dir: &Path,
    ) -> FetchResult<PathBuf>;

    /// The concrete name a wildcard `filename` stands for.
    ///
    /// Sources that pick the remote file themselves override this so an
    /// earlier download can be recognised before any transfer. A following
    /// `fetch` with the same arguments transfers the file resolved here.
    async fn resolve_filename(
        &self,
        _identifier: &str,
        _filename: &str,
    ) -> FetchResult<Option<String>> {
        Ok(None)
    }
}
