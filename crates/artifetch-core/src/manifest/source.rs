//! Remote source kinds and their manifest tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The remote system an artifact is fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    /// `HuggingFace` Hub repository file.
    HuggingFace,
    /// S3-compatible bucket (Cloudflare R2).
    ObjectStorage,
    /// `CivitAI` model registry.
    ModelRegistry,
}

impl Source {
    /// Every source, in dispatch-table order.
    pub const ALL: [Self; 3] = [Self::HuggingFace, Self::ObjectStorage, Self::ModelRegistry];

    /// Resolve a manifest source tag (case-insensitive, surrounding
    /// whitespace ignored). Aliases are normalized here.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "huggingface" | "hf" => Some(Self::HuggingFace),
            "r2" | "cloudflare" => Some(Self::ObjectStorage),
            "civitai" => Some(Self::ModelRegistry),
            _ => None,
        }
    }

    /// Canonical tag written when an entry is serialized back to a manifest line.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::HuggingFace => "huggingface",
            Self::ObjectStorage => "r2",
            Self::ModelRegistry => "civitai",
        }
    }

    /// Upper-cased label used in batch summaries.
    pub fn summary_label(self) -> String {
        self.tag().to_ascii_uppercase()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
