//! CLI bootstrap - the composition root.
//!
//! The only place where capabilities are wired together. Credentials are
//! read from the environment here and nowhere else.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use artifetch_core::{FetchConfig, SharedProgress};
use artifetch_sources::SourceDispatcher;

use crate::error::CliError;
use crate::presentation::CliProgressPrinter;

/// Fully composed context for the download handler.
pub struct CliContext {
    /// Destination root, already created.
    pub models_dir: PathBuf,
    /// Registered fetch capabilities.
    pub dispatcher: SourceDispatcher,
}

/// Read credentials from the process environment and log what was found.
pub fn load_config() -> FetchConfig {
    let config = FetchConfig::from_env();
    config.log_loaded();
    config
}

/// Create the destination root and wire the capabilities.
pub async fn bootstrap(models_dir: &Path, config: &FetchConfig) -> Result<CliContext, CliError> {
    tokio::fs::create_dir_all(models_dir)
        .await
        .map_err(|e| CliError::ModelsDir {
            path: models_dir.to_path_buf(),
            message: e.to_string(),
        })?;

    let printer = CliProgressPrinter::new();
    let interactive = printer.is_interactive();
    let progress: SharedProgress = Arc::new(printer);
    let dispatcher = SourceDispatcher::from_config(config, models_dir, &progress, interactive);

    Ok(CliContext {
        models_dir: models_dir.to_path_buf(),
        dispatcher,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bootstrap_creates_models_dir() {
        let dir = tempfile::tempdir().unwrap();
        let models_dir = dir.path().join("nested/models");

        let ctx = bootstrap(&models_dir, &FetchConfig::default()).await.unwrap();

        assert!(models_dir.is_dir());
        assert_eq!(ctx.models_dir, models_dir);
        assert_eq!(ctx.dispatcher.supported(), vec!["huggingface", "civitai"]);
    }

    #[tokio::test]
    async fn test_bootstrap_reports_uncreatable_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"").unwrap();

        let err = bootstrap(&blocker.join("models"), &FetchConfig::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, CliError::ModelsDir { .. }));
    }
}
