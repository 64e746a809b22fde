//! Manifest batch runner.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use artifetch_core::{DownloadOutcome, parse_line};
use tracing::{Instrument, error, info, info_span, warn};

use crate::manifest_file::{BatchError, entry_lines, read_manifest, relative_target};
use crate::orchestrator::Orchestrator;

/// Aggregate counters of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Entries skipped or downloaded.
    pub success: usize,
    /// Parse failures plus failed entries.
    pub errors: usize,
    /// Uppercased source labels of every parsed entry.
    pub sources: BTreeSet<String>,
}

impl BatchSummary {
    /// Whether the whole batch succeeded.
    pub const fn is_success(&self) -> bool {
        self.errors == 0
    }

    /// Log the totals.
    pub fn log(&self) {
        info!("Download summary: {} success, {} errors", self.success, self.errors);
        if !self.sources.is_empty() {
            let sources: Vec<&str> = self.sources.iter().map(String::as_str).collect();
            info!("Sources used: {}", sources.join(", "));
        }
        if self.errors > 0 {
            warn!("{} model(s) failed to download", self.errors);
        }
    }
}

/// Runs every manifest entry through an [`Orchestrator`], in file order.
pub struct BatchRunner<'a> {
    orchestrator: Orchestrator<'a>,
}

impl<'a> BatchRunner<'a> {
    /// Create a runner over an orchestrator.
    pub const fn new(orchestrator: Orchestrator<'a>) -> Self {
        Self { orchestrator }
    }

    /// Read `manifest` and process it.
    pub async fn run(&self, manifest: &Path) -> Result<BatchSummary, BatchError> {
        info!("Processing manifest: {}", manifest.display());
        let content = read_manifest(manifest)?;
        Ok(self.run_content(&content).await)
    }

    /// Process manifest text.
    pub async fn run_content(&self, content: &str) -> BatchSummary {
        let mut summary = BatchSummary::default();

        let total = entry_lines(content).count();
        if total == 0 {
            info!("No models found in manifest");
            return summary;
        }
        info!("Found {total} models to download");

        let mut claimed: HashMap<PathBuf, usize> = HashMap::new();

        for (line_num, line) in entry_lines(content) {
            let entry = match parse_line(line, line_num) {
                Ok(entry) => entry,
                Err(err) => {
                    error!("{err}");
                    summary.errors += 1;
                    continue;
                }
            };

            if let Some(target) = relative_target(&entry) {
                if let Some(first_line) = claimed.get(&target) {
                    warn!(
                        "Line {line_num}: target {} duplicates line {first_line}",
                        target.display()
                    );
                } else {
                    claimed.insert(target, line_num);
                }
            }

            let span = info_span!("entry", line = line_num, file = %entry.filename, source = %entry.source);
            let outcome = self.orchestrator.process(&entry).instrument(span).await;

            summary.sources.insert(entry.source.summary_label());
            match outcome {
                DownloadOutcome::Failed { .. } => summary.errors += 1,
                DownloadOutcome::Skipped { .. } | DownloadOutcome::Downloaded { .. } => {
                    summary.success += 1;
                }
            }
        }

        summary
    }
}
