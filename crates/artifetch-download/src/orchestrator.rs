//! Per-entry download state machine.
//!
//! ```text
//! Start -> CheckExisting -> { Skip | Redownload | Fetch } -> Verify -> { Success | FailCleanup }
//! ```
//!
//! A wildcard filename is first resolved by its source, and `CheckExisting`
//! runs against the resolved name.
//!
//! Every error is folded into [`DownloadOutcome::Failed`]; nothing here
//! aborts the batch.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use artifetch_core::manifest::is_contained_relative;
use artifetch_core::{DownloadOutcome, FetchError, FetchResult, ManifestEntry, SkipReason, verify_checksum};
use artifetch_sources::SourceDispatcher;
use tracing::{error, info, warn};

/// Drives manifest entries to files under a destination root.
pub struct Orchestrator<'a> {
    dispatcher: &'a SourceDispatcher,
    models_dir: PathBuf,
}

/// What `CheckExisting` decided.
enum Existing {
    Accept(SkipReason),
    Fetch,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator writing under `models_dir`.
    pub fn new(dispatcher: &'a SourceDispatcher, models_dir: impl Into<PathBuf>) -> Self {
        Self {
            dispatcher,
            models_dir: models_dir.into(),
        }
    }

    /// Destination root.
    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Run one entry to a terminal outcome.
    pub async fn process(&self, entry: &ManifestEntry) -> DownloadOutcome {
        let target = match self.plan_target(entry, &entry.filename) {
            Ok(target) => target,
            Err(error) => return Self::fail(entry, error),
        };

        match self.materialize(entry, &target).await {
            Ok(outcome) => outcome,
            Err(error) => {
                remove_empty_stub(&target).await;
                Self::fail(entry, error)
            }
        }
    }

    /// Target path of `filename` under the entry's subdir, refusing anything
    /// outside the destination root.
    fn plan_target(&self, entry: &ManifestEntry, filename: &str) -> FetchResult<PathBuf> {
        let relative = Path::new(&entry.subdir).join(filename);
        if !is_contained_relative(&relative) {
            return Err(FetchError::configuration(format!(
                "Target {} escapes the models directory",
                relative.display()
            )));
        }
        Ok(self.models_dir.join(relative))
    }

    async fn materialize(&self, entry: &ManifestEntry, target: &Path) -> FetchResult<DownloadOutcome> {
        let wildcard = entry.has_wildcard_filename();
        if !wildcard {
            if let Existing::Accept(reason) = check_existing(entry, target).await? {
                return Ok(skipped(target, reason));
            }
        }

        let fetcher = self.dispatcher.dispatch(entry.source)?;

        if wildcard {
            if let Some(name) = fetcher
                .resolve_filename(&entry.identifier, &entry.filename)
                .await?
            {
                info!("{} resolved to {name}", entry.filename);
                let resolved = self.plan_target(entry, &name)?;
                if let Existing::Accept(reason) = check_existing(entry, &resolved).await? {
                    return Ok(skipped(&resolved, reason));
                }
            }
        }
        let target_dir = entry.target_dir(&self.models_dir);
        tokio::fs::create_dir_all(&target_dir)
            .await
            .map_err(|e| FetchError::io(&format!("creating {}", target_dir.display()), &e))?;

        let path = fetcher
            .fetch(&entry.identifier, &entry.filename, &target_dir)
            .await?;

        if let Some(expected) = entry.checksum() {
            if !verify(&path, Some(expected)).await {
                remove_file(&path).await?;
                return Err(FetchError::checksum_mismatch(path, expected));
            }
        }

        let size = tokio::fs::metadata(&path)
            .await
            .map_err(|e| FetchError::io(&format!("reading {}", path.display()), &e))?
            .len();
        info!("Downloaded {} ({size} bytes)", path.display());

        Ok(DownloadOutcome::Downloaded { path, size })
    }

    fn fail(entry: &ManifestEntry, error: FetchError) -> DownloadOutcome {
        error!("Failed to download {}: {error}", entry.filename);
        DownloadOutcome::Failed { error }
    }
}

fn skipped(path: &Path, reason: SkipReason) -> DownloadOutcome {
    DownloadOutcome::Skipped {
        path: path.to_path_buf(),
        reason,
    }
}

async fn check_existing(entry: &ManifestEntry, target: &Path) -> FetchResult<Existing> {
    if !exists(target).await {
        return Ok(Existing::Fetch);
    }

    let name = target.file_name().unwrap_or_default().to_string_lossy();
    let Some(expected) = entry.checksum() else {
        info!("{name} already exists, skipping");
        return Ok(Existing::Accept(SkipReason::Unchecked));
    };

    if verify(target, Some(expected)).await {
        info!("{name} already exists with valid checksum");
        return Ok(Existing::Accept(SkipReason::Verified));
    }

    warn!("{name} exists but checksum mismatch, redownloading");
    remove_file(target).await?;
    Ok(Existing::Fetch)
}

/// Hash off the runtime thread so interrupts stay responsive.
async fn verify(path: &Path, expected: Option<&str>) -> bool {
    let path = path.to_path_buf();
    let expected = expected.map(str::to_string);
    tokio::task::spawn_blocking(move || verify_checksum(&path, expected.as_deref()))
        .await
        .unwrap_or(false)
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

async fn remove_file(path: &Path) -> FetchResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FetchError::io(&format!("removing {}", path.display()), &e)),
    }
}

/// An empty file left at the target would be taken as "already exists" next run.
async fn remove_empty_stub(target: &Path) {
    let Ok(meta) = tokio::fs::metadata(target).await else {
        return;
    };
    if meta.is_file() && meta.len() == 0 {
        if let Err(e) = tokio::fs::remove_file(target).await {
            warn!("Failed to remove empty file {}: {e}", target.display());
        }
    }
}
