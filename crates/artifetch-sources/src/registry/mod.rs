//! Model registry capability (`CivitAI`).
//!
//! Two-step protocol: query the model's metadata, pick one file from its
//! versions, then stream that file to disk. Both steps run under their own
//! bounded retry policy.

mod config;
mod http;
mod models;
mod select;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use artifetch_core::manifest::is_contained_relative;
use artifetch_core::{
    FetchError, FetchResult, RetryPolicy, SharedProgress, Source, SourceFetcher, retry_with_backoff,
};
use async_trait::async_trait;
use tracing::info;

use crate::transfer::{partial_path, remove_partial, write_body};

pub use config::RegistryClientConfig;
pub use http::{RegistryBackend, ReqwestRegistryBackend};
pub use models::{RegistryFile, RegistryModel, RegistryVersion};
pub use select::{available_files, select_file};

/// Fetches files listed in a registry model's metadata.
pub struct ModelRegistryFetcher<B> {
    backend: B,
    metadata_retry: RetryPolicy,
    download_retry: RetryPolicy,
    progress: SharedProgress,
    resolved: Mutex<Option<Resolved>>,
}

/// The last selection made by `resolve_filename`, reused by the next fetch.
struct Resolved {
    identifier: String,
    requested: String,
    file: RegistryFile,
}

impl ModelRegistryFetcher<ReqwestRegistryBackend> {
    /// Create a fetcher talking to the real registry.
    pub fn from_config(config: &RegistryClientConfig, progress: SharedProgress) -> FetchResult<Self> {
        let backend = ReqwestRegistryBackend::new(config)?;
        Ok(Self::new(backend, config, progress))
    }
}

impl<B: RegistryBackend> ModelRegistryFetcher<B> {
    /// Create a fetcher over any backend, taking retry policies from `config`.
    pub const fn new(backend: B, config: &RegistryClientConfig, progress: SharedProgress) -> Self {
        Self {
            backend,
            metadata_retry: config.metadata_retry,
            download_retry: config.download_retry,
            progress,
            resolved: Mutex::new(None),
        }
    }

    /// The underlying backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    async fn query_model(&self, model_id: &str) -> FetchResult<RegistryModel> {
        info!("Fetching CivitAI model info: {model_id}");
        retry_with_backoff(self.metadata_retry, "Model info request", |_| {
            self.backend.get_model(model_id)
        })
        .await
    }

    async fn download(&self, file: &RegistryFile, target: &Path) -> FetchResult<u64> {
        let size_hint = file.size_hint();
        info!(
            "Downloading from CivitAI: {} ({} bytes)",
            file.name,
            size_hint.unwrap_or(0)
        );

        retry_with_backoff(self.download_retry, "Download", |attempt| async move {
            if attempt > 1 {
                remove_partial(&partial_path(target)).await;
            }
            let body = self.backend.open_download(&file.download_url).await?;
            write_body(body, target, &file.name, size_hint, self.progress.as_ref()).await
        })
        .await
    }

    /// Query metadata and pick the file `filename` designates.
    async fn select(&self, identifier: &str, filename: &str) -> FetchResult<RegistryFile> {
        let model = self.query_model(identifier).await?;

        let file = select_file(&model, filename).ok_or_else(|| {
            FetchError::not_found(format!(
                "File '{filename}' not found. Available files: [{}]",
                available_files(&model).join(", ")
            ))
        })?;

        // Remote names replace the requested one; keep them inside the target dir.
        if file.name.is_empty()
            || file.name.contains(['/', '\\'])
            || !is_contained_relative(Path::new(&file.name))
        {
            return Err(FetchError::configuration(format!(
                "Registry returned unsafe filename '{}'",
                file.name
            )));
        }

        Ok(file.clone())
    }

    /// Take the selection cached for exactly these arguments, if any.
    fn take_resolved(&self, identifier: &str, filename: &str) -> Option<RegistryFile> {
        let mut slot = self.resolved.lock().ok()?;
        match slot.take() {
            Some(r) if r.identifier == identifier && r.requested == filename => Some(r.file),
            _ => None,
        }
    }
}

#[async_trait]
impl<B: RegistryBackend> SourceFetcher for ModelRegistryFetcher<B> {
    fn source(&self) -> Source {
        Source::ModelRegistry
    }

    async fn fetch(
        &self,
        identifier: &str,
        filename: &str,
        destination_dir: &Path,
    ) -> FetchResult<PathBuf> {
        let file = match self.take_resolved(identifier, filename) {
            Some(file) => file,
            None => self.select(identifier, filename).await?,
        };

        let target = destination_dir.join(&file.name);
        self.download(&file, &target).await?;
        Ok(target)
    }

    async fn resolve_filename(
        &self,
        identifier: &str,
        filename: &str,
    ) -> FetchResult<Option<String>> {
        let file = self.select(identifier, filename).await?;
        let name = file.name.clone();
        if let Ok(mut slot) = self.resolved.lock() {
            *slot = Some(Resolved {
                identifier: identifier.to_string(),
                requested: filename.to_string(),
                file,
            });
        }
        Ok(Some(name))
    }
}
