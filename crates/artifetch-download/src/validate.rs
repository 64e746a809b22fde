//! Validate-only pass over a manifest.
//!
//! Applies the strict parser to every entry line and flags entries whose
//! target duplicates an earlier one. No network access, no writes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use artifetch_core::{ManifestEntry, ParseError, parse_line_strict};
use tracing::{error, info};

use crate::manifest_file::{BatchError, entry_lines, read_manifest, relative_target};

/// Why a line failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// The line did not parse or failed a strict rule.
    Invalid(ParseError),
    /// The line's target is already claimed by an earlier line.
    DuplicateTarget {
        /// Line of the duplicate.
        line_num: usize,
        /// Line that first claimed the target.
        first_line: usize,
        /// Shared relative target.
        target: PathBuf,
    },
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::DuplicateTarget {
                line_num,
                first_line,
                target,
            } => write!(
                f,
                "Line {line_num}: target {} duplicates line {first_line}",
                target.display()
            ),
        }
    }
}

/// Result of validating a whole manifest.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Entries that passed.
    pub valid: Vec<ManifestEntry>,
    /// Lines that did not.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Whether every entry line passed.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Log each issue and the final verdict.
    pub fn log(&self) {
        for issue in &self.issues {
            error!("{issue}");
        }
        if self.is_valid() {
            info!("Manifest validation passed ({} valid entries)", self.valid.len());
        } else {
            error!(
                "Manifest validation failed: {} invalid entries ({} valid)",
                self.issues.len(),
                self.valid.len()
            );
        }
    }
}

/// Validate manifest text.
pub fn validate_content(content: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut claimed: HashMap<PathBuf, usize> = HashMap::new();

    for (line_num, line) in entry_lines(content) {
        let entry = match parse_line_strict(line, line_num) {
            Ok(entry) => entry,
            Err(err) => {
                report.issues.push(ValidationIssue::Invalid(err));
                continue;
            }
        };

        if let Some(target) = relative_target(&entry) {
            if let Some(&first_line) = claimed.get(&target) {
                report.issues.push(ValidationIssue::DuplicateTarget {
                    line_num,
                    first_line,
                    target,
                });
                continue;
            }
            claimed.insert(target, line_num);
        }
        report.valid.push(entry);
    }

    report
}

/// Read and validate a manifest file.
pub fn validate_manifest(path: &Path) -> Result<ValidationReport, BatchError> {
    let content = read_manifest(path)?;
    Ok(validate_content(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifetch_core::ParseErrorKind;

    #[test]
    fn test_one_malformed_one_valid() {
        let report = validate_content("org/repo|model.bin|checkpoints\nonly|two\n");
        assert!(!report.is_valid());
        assert_eq!(report.valid.len(), 1);
        assert_eq!(report.issues.len(), 1);
        match &report.issues[0] {
            ValidationIssue::Invalid(err) => {
                assert_eq!(err.line_num, 2);
                assert_eq!(err.kind, ParseErrorKind::TooFewFields { found: 2 });
            }
            other => panic!("Expected parse failure, got {other:?}"),
        }
    }

    #[test]
    fn test_strict_rules_apply() {
        let report = validate_content("justname|model.bin|checkpoints\norg/repo|sub/model.bin|x\n");
        assert_eq!(report.issues.len(), 2);
    }

    #[test]
    fn test_duplicate_target_is_reported() {
        let content = "org/a|model.bin|ckpt\n# comment\nr2|bucket/model.bin|model.bin|ckpt\n";
        let report = validate_content(content);

        assert_eq!(report.valid.len(), 1);
        assert_eq!(
            report.issues,
            vec![ValidationIssue::DuplicateTarget {
                line_num: 3,
                first_line: 1,
                target: PathBuf::from("ckpt/model.bin"),
            }]
        );
        assert!(report.issues[0].to_string().contains("duplicates line 1"));
    }

    #[test]
    fn test_registry_wildcards_never_collide() {
        let report = validate_content("civitai|1|auto|ckpt\ncivitai|2|auto|ckpt\n");
        assert!(report.is_valid());
    }

    #[test]
    fn test_empty_manifest_is_valid() {
        let report = validate_content("# nothing here\n\n");
        assert!(report.is_valid());
        assert!(report.valid.is_empty());
    }

    #[test]
    fn test_validate_manifest_does_not_touch_models_dir() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("models.txt");
        std::fs::write(&manifest, "org/repo|model.bin|checkpoints\n").unwrap();

        let report = validate_manifest(&manifest).unwrap();
        assert!(report.is_valid());
        assert!(!dir.path().join("checkpoints").exists());
    }
}
