//! File selection over registry metadata.
//!
//! Each matching rule is a named predicate. Rules are tried in order over
//! every version and file: the first rule with any match wins, and within
//! a rule the first file in registry order wins.

use artifetch_core::ManifestEntry;

use super::models::{RegistryFile, RegistryModel, RegistryVersion};

/// Versions included in the "available files" diagnostic.
const DIAGNOSTIC_VERSIONS: usize = 2;
/// Files included in the "available files" diagnostic.
const DIAGNOSTIC_FILES: usize = 10;

type MatchRule = fn(requested: &str, file: &RegistryFile) -> bool;

fn exact_name(requested: &str, file: &RegistryFile) -> bool {
    file.name == requested
}

fn primary_sentinel(requested: &str, file: &RegistryFile) -> bool {
    ManifestEntry::is_primary_sentinel(requested) && file.is_primary()
}

fn suffix_pattern(requested: &str, file: &RegistryFile) -> bool {
    ManifestEntry::is_suffix_pattern(requested) && file.name.ends_with(requested)
}

/// Matching rules in priority order.
const MATCH_RULES: [MatchRule; 3] = [exact_name, primary_sentinel, suffix_pattern];

/// Pick the file to download for `requested`.
pub fn select_file<'a>(model: &'a RegistryModel, requested: &str) -> Option<&'a RegistryFile> {
    MATCH_RULES.iter().find_map(|rule| {
        model
            .model_versions
            .iter()
            .flat_map(|version| version.files.iter())
            .find(|file| rule(requested, file))
    })
}

/// Files to show when nothing matched, as `name (v:version)`.
pub fn available_files(model: &RegistryModel) -> Vec<String> {
    model
        .model_versions
        .iter()
        .take(DIAGNOSTIC_VERSIONS)
        .flat_map(|version: &RegistryVersion| {
            version
                .files
                .iter()
                .map(move |file| format!("{} (v:{})", file.name, version.name))
        })
        .take(DIAGNOSTIC_FILES)
        .collect()
}
