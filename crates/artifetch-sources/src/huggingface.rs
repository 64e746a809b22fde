//! `HuggingFace` Hub capability.
//!
//! Uses the hf-hub sync client against a cache kept inside the models
//! directory, then moves the resolved blob to its target location so each
//! artifact is stored once.

use std::path::{Path, PathBuf};

use artifetch_core::{FetchError, FetchResult, Source, SourceFetcher};
use async_trait::async_trait;
use hf_hub::api::sync::{Api, ApiBuilder};
use tracing::{debug, info};

use crate::transfer::{commit_partial, partial_path, remove_partial};

/// Cache location relative to the models directory.
const CACHE_SUBDIR: &str = ".cache/huggingface";

/// Fetches single files from `HuggingFace` Hub repositories.
#[derive(Debug, Clone)]
pub struct HuggingFaceFetcher {
    token: Option<String>,
    cache_dir: PathBuf,
    show_progress: bool,
}

impl HuggingFaceFetcher {
    /// Create a fetcher caching under `models_dir`.
    pub fn new(token: Option<String>, models_dir: &Path) -> Self {
        Self {
            token,
            cache_dir: models_dir.join(CACHE_SUBDIR),
            show_progress: false,
        }
    }

    /// Let hf-hub draw its own progress bar.
    #[must_use]
    pub const fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Directory hf-hub caches blobs in.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn create_api(&self) -> FetchResult<Api> {
        ApiBuilder::new()
            .with_token(self.token.clone())
            .with_cache_dir(self.cache_dir.clone())
            .with_progress(self.show_progress)
            .build()
            .map_err(|e| FetchError::configuration(format!("Failed to create HF API client: {e}")))
    }
}

/// Repository path of a manifest filename (`./sub/a.bin` → `sub/a.bin`).
fn repo_path(filename: &str) -> &str {
    filename.trim_start_matches("./")
}

#[async_trait]
impl SourceFetcher for HuggingFaceFetcher {
    fn source(&self) -> Source {
        Source::HuggingFace
    }

    async fn fetch(
        &self,
        identifier: &str,
        filename: &str,
        destination_dir: &Path,
    ) -> FetchResult<PathBuf> {
        tokio::fs::create_dir_all(destination_dir)
            .await
            .map_err(|e| FetchError::io(&format!("creating {}", destination_dir.display()), &e))?;

        let file = repo_path(filename).to_string();
        info!("Downloading from HuggingFace: {identifier}/{file}");

        let api = self.create_api()?;
        let repo_id = identifier.to_string();
        let remote = file.clone();
        let cached = tokio::task::spawn_blocking(move || api.model(repo_id).get(&remote))
            .await
            .map_err(|e| FetchError::transport(format!("HuggingFace download task failed: {e}")))?
            .map_err(|e| FetchError::transport(format!("HuggingFace download failed: {e}")))?;
        debug!("Resolved {identifier}/{file} to cache entry {}", cached.display());

        let target = destination_dir.join(&file);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FetchError::io(&format!("creating {}", parent.display()), &e))?;
        }
        take_from_cache(&cached, &target).await?;

        Ok(target)
    }
}

/// Move a resolved cache entry to `target` and drop it from the cache.
///
/// `cached` is usually a snapshot symlink into the blob store; the blob is
/// moved and the then-dangling link removed, so the next lookup of the same
/// file goes back to the network. Falls back to copying through a partial
/// file when the blob cannot be renamed.
async fn take_from_cache(cached: &Path, target: &Path) -> FetchResult<()> {
    let blob = tokio::fs::canonicalize(cached)
        .await
        .map_err(|e| FetchError::io(&format!("resolving {}", cached.display()), &e))?;

    if tokio::fs::rename(&blob, target).await.is_err() {
        let partial = partial_path(target);
        if let Err(e) = tokio::fs::copy(&blob, &partial).await {
            remove_partial(&partial).await;
            return Err(FetchError::io(&format!("copying into {}", target.display()), &e));
        }
        commit_partial(&partial, target).await?;
        remove_partial(&blob).await;
    }

    if blob != cached {
        remove_partial(cached).await;
    }
    Ok(())
}
