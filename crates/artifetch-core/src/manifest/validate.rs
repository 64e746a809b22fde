//! Strict validation used by the validate-only entry point.
//!
//! Never touches the network or the filesystem.

use std::path::{Component, Path};

use super::entry::ManifestEntry;
use super::parse::parse_line;
use super::source::Source;
use crate::error::{ParseError, ParseErrorKind};

/// Parse a line and apply the stricter validation rules on top.
pub fn parse_line_strict(line: &str, line_num: usize) -> Result<ManifestEntry, ParseError> {
    let entry = parse_line(line, line_num)?;
    validate_entry(&entry).map_err(|kind| ParseError::new(line_num, kind))?;
    Ok(entry)
}

/// Check an already-parsed entry against the strict rules.
pub fn validate_entry(entry: &ManifestEntry) -> Result<(), ParseErrorKind> {
    if entry.source == Source::HuggingFace && !is_owner_name(&entry.identifier) {
        return Err(ParseErrorKind::InvalidRepoId {
            identifier: entry.identifier.clone(),
        });
    }

    if has_separator(&entry.filename) && !entry.filename.starts_with("./") {
        return Err(ParseErrorKind::NestedFilename {
            filename: entry.filename.clone(),
        });
    }

    if !is_contained_relative(Path::new(&entry.subdir)) {
        return Err(ParseErrorKind::UnsafeSubdir {
            subdir: entry.subdir.clone(),
        });
    }

    Ok(())
}

/// `owner/name[/...]` with no empty segments.
fn is_owner_name(identifier: &str) -> bool {
    let mut segments = identifier.split('/');
    let owner = segments.next().unwrap_or_default();
    let name = segments.next().unwrap_or_default();
    !owner.is_empty() && !name.is_empty() && segments.all(|s| !s.is_empty())
}

fn has_separator(filename: &str) -> bool {
    filename.contains('/') || filename.contains('\\')
}

/// A relative path that never climbs above its starting point.
pub fn is_contained_relative(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict_kind(line: &str) -> ParseErrorKind {
        parse_line_strict(line, 1).unwrap_err().kind
    }

    #[test]
    fn test_valid_lines_pass() {
        assert!(parse_line_strict("org/repo|model.bin|checkpoints", 1).is_ok());
        assert!(parse_line_strict("hf|org/repo|./sub/model.bin|checkpoints/sd15", 1).is_ok());
        assert!(parse_line_strict("civitai|12345|auto|checkpoints", 1).is_ok());
        assert!(parse_line_strict("r2|bucket/key.bin|key.bin|loras", 1).is_ok());
    }

    #[test]
    fn test_repo_without_owner_rejected() {
        assert!(matches!(
            strict_kind("repo-only|model.bin|checkpoints"),
            ParseErrorKind::InvalidRepoId { .. }
        ));
        assert!(matches!(
            strict_kind("hf|org/|model.bin|checkpoints"),
            ParseErrorKind::InvalidRepoId { .. }
        ));
    }

    #[test]
    fn test_repo_rule_only_for_huggingface() {
        // Registry ids are plain numbers.
        assert!(parse_line_strict("civitai|4201|model.safetensors|loras", 1).is_ok());
    }

    #[test]
    fn test_nested_filename_needs_relative_prefix() {
        assert!(matches!(
            strict_kind("org/repo|sub/model.bin|checkpoints"),
            ParseErrorKind::NestedFilename { .. }
        ));
        assert!(matches!(
            strict_kind("org/repo|sub\\model.bin|checkpoints"),
            ParseErrorKind::NestedFilename { .. }
        ));
    }

    #[test]
    fn test_unsafe_subdir_rejected() {
        assert!(matches!(
            strict_kind("org/repo|model.bin|../outside"),
            ParseErrorKind::UnsafeSubdir { .. }
        ));
        assert!(matches!(
            strict_kind("org/repo|model.bin|/etc"),
            ParseErrorKind::UnsafeSubdir { .. }
        ));
    }

    #[test]
    fn test_base_parse_errors_surface_first() {
        assert!(matches!(
            strict_kind("org/repo|model.bin"),
            ParseErrorKind::TooFewFields { found: 2 }
        ));
    }
}
