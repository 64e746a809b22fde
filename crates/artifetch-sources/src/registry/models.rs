//! Registry API response shapes.
//!
//! Only the fields file selection needs are deserialized; everything else
//! in the payload is ignored.

use serde::Deserialize;

/// A model with its published versions, newest first.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryModel {
    #[serde(default)]
    pub model_versions: Vec<RegistryVersion>,
}

/// One published version of a model.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryVersion {
    #[serde(default = "unknown_version")]
    pub name: String,
    #[serde(default)]
    pub files: Vec<RegistryFile>,
}

fn unknown_version() -> String {
    "Unknown".to_string()
}

/// A downloadable file of a version.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryFile {
    #[serde(default)]
    pub name: String,
    pub download_url: String,
    #[serde(default)]
    pub primary: Option<bool>,
    #[serde(default, rename = "sizeKB")]
    pub size_kb: Option<f64>,
}

impl RegistryFile {
    /// Whether the registry flags this file as the version's primary file.
    pub fn is_primary(&self) -> bool {
        self.primary.unwrap_or(false)
    }

    /// Size advertised by the registry, in bytes.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn size_hint(&self) -> Option<u64> {
        self.size_kb
            .filter(|kb| kb.is_finite() && *kb > 0.0)
            .map(|kb| (kb * 1024.0) as u64)
    }
}
