//! CLI-specific error types and exit-code mapping.

use std::path::PathBuf;

use artifetch_download::BatchError;
use thiserror::Error;

/// Every entry succeeded, or the manifest validated.
pub const EXIT_SUCCESS: i32 = 0;
/// Any failure.
pub const EXIT_FAILURE: i32 = 1;
/// Interrupted by the user (128 + SIGINT).
pub const EXIT_INTERRUPTED: i32 = 130;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The manifest could not be read.
    #[error(transparent)]
    Batch(#[from] BatchError),

    /// The destination root could not be created.
    #[error("Failed to create models directory {}: {message}", .path.display())]
    ModelsDir {
        /// Requested destination root.
        path: PathBuf,
        /// Underlying failure.
        message: String,
    },

    /// At least one entry failed.
    #[error("{failed} model(s) failed to download")]
    DownloadsFailed {
        /// Number of failed entries, parse failures included.
        failed: usize,
    },

    /// Validate-only mode found invalid entries.
    #[error("Manifest validation failed: {invalid} invalid entries")]
    ValidationFailed {
        /// Number of invalid entry lines.
        invalid: usize,
    },

    /// The user pressed Ctrl-C.
    #[error("Download interrupted by user")]
    Interrupted,
}

impl CliError {
    /// Map error to the process exit code.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Interrupted => EXIT_INTERRUPTED,
            Self::Batch(_)
            | Self::ModelsDir { .. }
            | Self::DownloadsFailed { .. }
            | Self::ValidationFailed { .. } => EXIT_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Interrupted.exit_code(), 130);
        assert_eq!(CliError::DownloadsFailed { failed: 2 }.exit_code(), 1);
        assert_eq!(CliError::ValidationFailed { invalid: 1 }.exit_code(), 1);
        let missing = CliError::from(BatchError::ManifestNotFound {
            path: PathBuf::from("models.txt"),
        });
        assert_eq!(missing.exit_code(), 1);
        assert!(missing.to_string().contains("not found"));
    }
}
