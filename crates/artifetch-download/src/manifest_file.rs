//! Reading a manifest file into numbered entry lines.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use artifetch_core::{ManifestEntry, is_entry_line};
use thiserror::Error;

/// Whole-run failure: the manifest itself could not be read.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The manifest path does not exist.
    #[error("Manifest file not found: {}", .path.display())]
    ManifestNotFound {
        /// Requested manifest path.
        path: PathBuf,
    },

    /// The manifest exists but could not be read as UTF-8 text.
    #[error("Failed to read manifest {}: {message}", .path.display())]
    ManifestUnreadable {
        /// Requested manifest path.
        path: PathBuf,
        /// Underlying failure.
        message: String,
    },
}

/// Read the manifest fully.
pub fn read_manifest(path: &Path) -> Result<String, BatchError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => BatchError::ManifestNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::InvalidData => BatchError::ManifestUnreadable {
            path: path.to_path_buf(),
            message: "file is not valid UTF-8".to_string(),
        },
        _ => BatchError::ManifestUnreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })
}

/// Non-blank, non-comment lines with their 1-based line numbers.
pub fn entry_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| is_entry_line(line))
}

/// Destination of an entry relative to the models directory.
///
/// `None` for registry wildcards, whose final name is only known remotely.
pub(crate) fn relative_target(entry: &ManifestEntry) -> Option<PathBuf> {
    (!entry.has_wildcard_filename()).then(|| {
        Path::new(&entry.subdir)
            .join(entry.filename.trim_start_matches("./"))
            .components()
            .collect()
    })
}
