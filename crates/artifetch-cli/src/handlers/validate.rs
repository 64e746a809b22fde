//! Validate-only mode.

use std::path::Path;

use artifetch_download::validate_manifest;
use tracing::info;

use crate::error::CliError;

/// Validate `manifest` without network access or writes.
pub fn execute(manifest: &Path) -> Result<(), CliError> {
    info!("Validating manifest: {}", manifest.display());
    let report = validate_manifest(manifest)?;
    report.log();

    if report.is_valid() {
        Ok(())
    } else {
        Err(CliError::ValidationFailed {
            invalid: report.issues.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_manifest_passes() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("models.txt");
        std::fs::write(&manifest, "# base\norg/repo|model.bin|checkpoints\n").unwrap();
        assert!(execute(&manifest).is_ok());
    }

    #[test]
    fn test_invalid_entries_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("models.txt");
        std::fs::write(&manifest, "org/repo|model.bin|checkpoints\nbroken|line\n").unwrap();

        match execute(&manifest) {
            Err(CliError::ValidationFailed { invalid }) => assert_eq!(invalid, 1),
            other => panic!("Expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_manifest_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, CliError::Batch(_)));
    }
}
