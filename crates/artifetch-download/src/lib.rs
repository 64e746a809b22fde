#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod batch;
pub mod manifest_file;
pub mod orchestrator;
pub mod validate;

pub use batch::{BatchRunner, BatchSummary};
pub use manifest_file::{BatchError, entry_lines, read_manifest};
pub use orchestrator::Orchestrator;
pub use validate::{ValidationIssue, ValidationReport, validate_content, validate_manifest};

// Used by the integration tests only
#[cfg(test)]
use bytes as _;
#[cfg(test)]
use futures_util as _;
