//! Manifest line parsing.
//!
//! Both dialects share one field splitter. The first field decides the
//! dialect: a known source tag selects the enhanced form, anything else is a
//! legacy `HuggingFace` line.

use super::entry::{FIELD_SEPARATOR, LineFormat, ManifestEntry};
use super::source::Source;
use crate::error::{ParseError, ParseErrorKind};

const MIN_FIELDS: usize = 3;
const ENHANCED_MIN_FIELDS: usize = 4;
const ENHANCED_MAX_FIELDS: usize = 5;
const LEGACY_MAX_FIELDS: usize = 4;

/// Whether a raw manifest line carries an entry (not blank, not a `#` comment).
pub fn is_entry_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

/// Split on the field separator and trim each field.
fn split_fields(line: &str) -> Vec<&str> {
    line.split(FIELD_SEPARATOR).map(str::trim).collect()
}

/// Parse one entry line.
///
/// Callers filter blank and comment lines with [`is_entry_line`] first.
pub fn parse_line(line: &str, line_num: usize) -> Result<ManifestEntry, ParseError> {
    let fail = |kind| ParseError::new(line_num, kind);
    let fields = split_fields(line);

    if fields.len() < MIN_FIELDS {
        return Err(fail(ParseErrorKind::TooFewFields {
            found: fields.len(),
        }));
    }

    let (source, format, rest) = match Source::from_tag(fields[0]) {
        Some(source) => {
            if fields.len() < ENHANCED_MIN_FIELDS {
                return Err(fail(ParseErrorKind::EnhancedTooShort));
            }
            (source, LineFormat::Enhanced, &fields[1..])
        }
        None => (Source::HuggingFace, LineFormat::Legacy, &fields[..]),
    };

    let max = match format {
        LineFormat::Enhanced => ENHANCED_MAX_FIELDS,
        LineFormat::Legacy => LEGACY_MAX_FIELDS,
    };
    if fields.len() > max {
        return Err(fail(ParseErrorKind::TooManyFields {
            format: format.name(),
            max,
            found: fields.len(),
        }));
    }

    let required = |index: usize, field: &'static str| -> Result<String, ParseError> {
        let value = rest[index];
        if value.is_empty() {
            Err(fail(ParseErrorKind::EmptyField { field }))
        } else {
            Ok(value.to_string())
        }
    };

    Ok(ManifestEntry {
        source,
        identifier: required(0, "identifier")?,
        filename: required(1, "filename")?,
        subdir: required(2, "subdir")?,
        checksum: rest
            .get(3)
            .filter(|value| !value.is_empty())
            .map(|value| (*value).to_string()),
        line_num,
        format,
    })
}
