//! Error types shared by every artifetch crate.
//!
//! `ParseError` covers a single manifest line and never aborts a batch.
//! `FetchError` covers everything that can go wrong while materializing one
//! entry on disk; the orchestrator folds it into a failed outcome.

use std::path::PathBuf;

use thiserror::Error;

/// Why a manifest line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// Fewer than three `|`-separated fields.
    #[error("Invalid format - minimum 3 fields required, got {found}")]
    TooFewFields {
        /// Number of fields found.
        found: usize,
    },

    /// Source-tagged line with fewer than four fields.
    #[error("Enhanced format requires: source|identifier|filename|subdir[|checksum]")]
    EnhancedTooShort,

    /// More fields than the detected format allows.
    ///
    /// Both formats are capped: trailing fields past the optional checksum
    /// are rejected rather than ignored, so a shifted column cannot pass as
    /// a valid line.
    #[error("Too many fields for {format} format: expected at most {max}, got {found}")]
    TooManyFields {
        /// Detected format name.
        format: &'static str,
        /// Maximum accepted field count.
        max: usize,
        /// Number of fields found.
        found: usize,
    },

    /// A mandatory field was blank after trimming.
    #[error("Field '{field}' must not be empty")]
    EmptyField {
        /// Name of the blank field.
        field: &'static str,
    },

    /// `HuggingFace` identifier not of the form `owner/name`.
    #[error("Repository id '{identifier}' must have the form owner/name")]
    InvalidRepoId {
        /// The offending identifier.
        identifier: String,
    },

    /// Filename contains a path separator without a `./` prefix.
    #[error("Filename '{filename}' contains a path separator; prefix it with './' to place it in a subfolder")]
    NestedFilename {
        /// The offending filename.
        filename: String,
    },

    /// Subdirectory is absolute or climbs out of the destination root.
    #[error("Subdirectory '{subdir}' must be a relative path inside the models directory")]
    UnsafeSubdir {
        /// The offending subdirectory.
        subdir: String,
    },
}

/// A rejected manifest line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Line {line_num}: {kind}")]
pub struct ParseError {
    /// 1-based manifest line number.
    pub line_num: usize,
    /// What was wrong with the line.
    pub kind: ParseErrorKind,
}

impl ParseError {
    /// Create a parse error for the given line.
    pub const fn new(line_num: usize, kind: ParseErrorKind) -> Self {
        Self { line_num, kind }
    }
}

/// Error type for fetching a single manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No capability is registered for the entry's source.
    #[error("Unsupported source type: {tag}. Supported: {supported}")]
    UnsupportedSource {
        /// The source tag that could not be dispatched.
        tag: String,
        /// Comma-separated list of dispatchable tags.
        supported: String,
    },

    /// The capability is missing required credentials or client setup.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Detailed error message.
        message: String,
    },

    /// Network or remote API failure.
    #[error("Network error: {message}")]
    Transport {
        /// Detailed error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// Remote object, model or file does not exist.
    #[error("Not found: {message}")]
    NotFound {
        /// What was not found, with any diagnostic listing.
        message: String,
    },

    /// Content digest disagrees with the manifest.
    #[error("Checksum mismatch for {}: expected {expected}", .path.display())]
    ChecksumMismatch {
        /// The file whose digest did not match.
        path: PathBuf,
        /// Expected digest from the manifest.
        expected: String,
    },

    /// Local file operation failed.
    #[error("I/O error ({kind}): {message}")]
    Io {
        /// The kind of I/O error (e.g., "`NotFound`", "`PermissionDenied`").
        kind: String,
        /// Detailed error message.
        message: String,
    },
}

impl FetchError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: None,
        }
    }

    /// Create a transport error with HTTP status code.
    pub fn transport_with_status(message: impl Into<String>, status: u16) -> Self {
        Self::Transport {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a checksum mismatch error.
    pub fn checksum_mismatch(path: impl Into<PathBuf>, expected: impl Into<String>) -> Self {
        Self::ChecksumMismatch {
            path: path.into(),
            expected: expected.into(),
        }
    }

    /// Create an I/O error from a `std::io::Error`, prefixed with context.
    #[must_use]
    pub fn io(context: &str, err: &std::io::Error) -> Self {
        Self::Io {
            kind: format!("{:?}", err.kind()),
            message: format!("{context}: {err}"),
        }
    }

    /// Whether a bounded retry loop may attempt the operation again.
    ///
    /// Only transport failures are retried; everything else is terminal.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Convenience result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message_includes_line() {
        let err = ParseError::new(7, ParseErrorKind::TooFewFields { found: 2 });
        let msg = err.to_string();
        assert!(msg.starts_with("Line 7:"));
        assert!(msg.contains("minimum 3 fields"));
    }

    #[test]
    fn test_only_transport_is_retryable() {
        assert!(FetchError::transport("timeout").is_retryable());
        assert!(FetchError::transport_with_status("bad gateway", 502).is_retryable());
        assert!(!FetchError::not_found("gone").is_retryable());
        assert!(!FetchError::configuration("no client").is_retryable());
        assert!(!FetchError::checksum_mismatch("/tmp/x", "abc").is_retryable());
    }

    #[test]
    fn test_io_error_captures_kind() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        match FetchError::io("opening model.bin", &io_err) {
            FetchError::Io { kind, message } => {
                assert_eq!(kind, "PermissionDenied");
                assert!(message.contains("opening model.bin"));
            }
            other => panic!("Expected Io variant, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_source_lists_supported() {
        let err = FetchError::UnsupportedSource {
            tag: "civitai".to_string(),
            supported: "huggingface, r2".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("civitai"));
        assert!(msg.contains("huggingface, r2"));
    }
}
