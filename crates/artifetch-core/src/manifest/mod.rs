//! Manifest model and parsing.
//!
//! A manifest is a line-oriented text file. Each entry line is either
//!
//! ```text
//! identifier|filename|subdir[|checksum]            (legacy, HuggingFace)
//! source|identifier|filename|subdir[|checksum]     (enhanced)
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

mod entry;
mod parse;
mod source;
mod validate;

pub use entry::{FIELD_SEPARATOR, LineFormat, ManifestEntry};
pub use parse::{is_entry_line, parse_line};
pub use source::Source;
pub use validate::{is_contained_relative, parse_line_strict, validate_entry};
