//! Maps a manifest entry's source to the capability that fetches it.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use artifetch_core::{FetchConfig, FetchError, FetchResult, SharedProgress, Source, SourceFetcher};
use tracing::warn;

use crate::huggingface::HuggingFaceFetcher;
use crate::object_storage::{ObjectStorageFetcher, R2Client};
use crate::registry::{ModelRegistryFetcher, RegistryClientConfig};

/// Registered fetch capabilities, keyed by source.
///
/// A source can be known but disabled (for example object storage without
/// credentials); dispatching to it is a configuration error rather than an
/// unsupported source.
#[derive(Default)]
pub struct SourceDispatcher {
    fetchers: HashMap<Source, Arc<dyn SourceFetcher>>,
    disabled: HashMap<Source, String>,
}

impl SourceDispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the production capabilities from the startup configuration.
    ///
    /// `interactive` lets the hf-hub client draw its own progress bar.
    pub fn from_config(
        config: &FetchConfig,
        models_dir: &Path,
        progress: &SharedProgress,
        interactive: bool,
    ) -> Self {
        let mut dispatcher = Self::new().with_fetcher(Arc::new(
            HuggingFaceFetcher::new(config.hf_token.clone(), models_dir).with_progress(interactive),
        ));

        match &config.object_storage {
            Some(storage) => {
                dispatcher = dispatcher.with_fetcher(Arc::new(ObjectStorageFetcher::new(
                    Box::new(R2Client::new(storage.clone())),
                    storage.default_bucket.clone(),
                    Arc::clone(progress),
                )));
            }
            None => {
                dispatcher = dispatcher.with_disabled(
                    Source::ObjectStorage,
                    "R2 client not configured. Set R2_ACCESS_KEY_ID, R2_SECRET_ACCESS_KEY, R2_ACCOUNT_ID environment variables",
                );
            }
        }

        let registry_config = RegistryClientConfig::new().with_optional_token(config.civitai_token.clone());
        match ModelRegistryFetcher::from_config(&registry_config, Arc::clone(progress)) {
            Ok(fetcher) => dispatcher = dispatcher.with_fetcher(Arc::new(fetcher)),
            Err(e) => {
                warn!("CivitAI source disabled: {e}");
                dispatcher = dispatcher.with_disabled(Source::ModelRegistry, e.to_string());
            }
        }

        dispatcher
    }

    /// Register a capability under the source it reports.
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Arc<dyn SourceFetcher>) -> Self {
        let source = fetcher.source();
        self.disabled.remove(&source);
        self.fetchers.insert(source, fetcher);
        self
    }

    /// Mark a source as known but unusable.
    #[must_use]
    pub fn with_disabled(mut self, source: Source, reason: impl Into<String>) -> Self {
        self.fetchers.remove(&source);
        self.disabled.insert(source, reason.into());
        self
    }

    /// The capability for `source`.
    pub fn dispatch(&self, source: Source) -> FetchResult<&dyn SourceFetcher> {
        if let Some(fetcher) = self.fetchers.get(&source) {
            return Ok(fetcher.as_ref());
        }
        if let Some(reason) = self.disabled.get(&source) {
            return Err(FetchError::configuration(reason.clone()));
        }
        Err(FetchError::UnsupportedSource {
            tag: source.tag().to_string(),
            supported: self.supported().join(", "),
        })
    }

    /// Tags of the sources that can currently be dispatched, in canonical order.
    pub fn supported(&self) -> Vec<&'static str> {
        Source::ALL
            .iter()
            .filter(|s| self.fetchers.contains_key(*s))
            .map(|s| s.tag())
            .collect()
    }
}

impl std::fmt::Debug for SourceDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDispatcher")
            .field("supported", &self.supported())
            .field("disabled", &self.disabled)
            .finish()
    }
}
