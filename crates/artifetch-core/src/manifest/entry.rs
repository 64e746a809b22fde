//! The structured form of one manifest line.

use std::fmt;
use std::path::{Path, PathBuf};

use super::source::Source;

/// Field separator used by both manifest dialects.
pub const FIELD_SEPARATOR: char = '|';

/// Filenames that ask the registry for the version's primary file.
const PRIMARY_SENTINELS: [&str; 2] = ["auto", "latest"];

/// Which manifest dialect a line was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    /// `identifier|filename|subdir[|checksum]`, implicitly `HuggingFace`.
    Legacy,
    /// `source|identifier|filename|subdir[|checksum]`.
    Enhanced,
}

impl LineFormat {
    /// Human-readable name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Enhanced => "enhanced",
        }
    }
}

/// One requested artifact.
///
/// `identifier`, `filename` and `subdir` are never empty for a parsed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Normalized source kind.
    pub source: Source,
    /// Source-specific locator (repo id, bucket/key, registry model id).
    pub identifier: String,
    /// Requested local file name, or a registry sentinel/suffix pattern.
    pub filename: String,
    /// Relative directory under the destination root.
    pub subdir: String,
    /// Expected SHA-256 digest in hex, if any.
    pub checksum: Option<String>,
    /// 1-based manifest line, diagnostics only.
    pub line_num: usize,
    /// Dialect the line was written in.
    pub format: LineFormat,
}

impl ManifestEntry {
    /// Directory the artifact is written into.
    pub fn target_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.subdir)
    }

    /// Path the artifact is expected at before any remote resolution.
    ///
    /// For registry entries with a sentinel or suffix filename the actual
    /// file name is only known after the metadata query.
    pub fn target_path(&self, root: &Path) -> PathBuf {
        self.target_dir(root).join(&self.filename)
    }

    /// Whether the filename is a registry primary-file sentinel (`auto`/`latest`).
    pub fn is_primary_sentinel(filename: &str) -> bool {
        PRIMARY_SENTINELS
            .iter()
            .any(|s| filename.eq_ignore_ascii_case(s))
    }

    /// Whether the filename is a registry suffix pattern such as `.safetensors`.
    pub fn is_suffix_pattern(filename: &str) -> bool {
        filename.starts_with('.') && !filename.starts_with("./")
    }

    /// Whether the requested filename only becomes concrete after remote resolution.
    pub fn has_wildcard_filename(&self) -> bool {
        self.source == Source::ModelRegistry
            && (Self::is_primary_sentinel(&self.filename)
                || Self::is_suffix_pattern(&self.filename))
    }

    /// Expected checksum as a borrowed string.
    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }
}

/// Serializes to the enhanced dialect with the canonical source tag.
impl fmt::Display for ManifestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = FIELD_SEPARATOR;
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}",
            self.source, self.identifier, self.filename, self.subdir
        )?;
        if let Some(checksum) = &self.checksum {
            write!(f, "{sep}{checksum}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(source: Source, filename: &str) -> ManifestEntry {
        ManifestEntry {
            source,
            identifier: "12345".to_string(),
            filename: filename.to_string(),
            subdir: "checkpoints".to_string(),
            checksum: None,
            line_num: 1,
            format: LineFormat::Enhanced,
        }
    }

    #[test]
    fn test_target_path_joins_root_subdir_filename() {
        let e = entry(Source::HuggingFace, "model.bin");
        assert_eq!(
            e.target_path(Path::new("/models")),
            PathBuf::from("/models/checkpoints/model.bin")
        );
    }

    #[test]
    fn test_sentinels_are_case_insensitive() {
        assert!(ManifestEntry::is_primary_sentinel("auto"));
        assert!(ManifestEntry::is_primary_sentinel("LATEST"));
        assert!(!ManifestEntry::is_primary_sentinel("automatic"));
    }

    #[test]
    fn test_wildcards_only_apply_to_registry() {
        assert!(entry(Source::ModelRegistry, "auto").has_wildcard_filename());
        assert!(entry(Source::ModelRegistry, ".safetensors").has_wildcard_filename());
        assert!(!entry(Source::ModelRegistry, "model.safetensors").has_wildcard_filename());
        assert!(!entry(Source::HuggingFace, "auto").has_wildcard_filename());
    }

    #[test]
    fn test_display_omits_absent_checksum() {
        let e = entry(Source::ObjectStorage, "file.safetensors");
        assert_eq!(e.to_string(), "r2|12345|file.safetensors|checkpoints");

        let with_sum = ManifestEntry {
            checksum: Some("abc".to_string()),
            ..e
        };
        assert_eq!(with_sum.to_string(), "r2|12345|file.safetensors|checkpoints|abc");
    }
}
