//! Download mode.

use std::path::Path;

use artifetch_download::{BatchRunner, Orchestrator, read_manifest};
use tracing::info;

use crate::bootstrap::{bootstrap, load_config};
use crate::error::CliError;

/// Download every entry of `manifest` into `models_dir`.
pub async fn execute(manifest: &Path, models_dir: &Path) -> Result<(), CliError> {
    // Fail on a missing manifest before creating anything.
    let content = read_manifest(manifest)?;

    let config = load_config();
    let ctx = bootstrap(models_dir, &config).await?;

    info!("Processing manifest: {}", manifest.display());
    info!("Models directory: {}", ctx.models_dir.display());

    let runner = BatchRunner::new(Orchestrator::new(&ctx.dispatcher, &ctx.models_dir));
    let summary = runner.run_content(&content).await;
    summary.log();

    if summary.is_success() {
        Ok(())
    } else {
        Err(CliError::DownloadsFailed {
            failed: summary.errors,
        })
    }
}
