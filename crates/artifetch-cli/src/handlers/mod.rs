//! Command handlers.
//!
//! Thin wrappers that compose the context, call into `artifetch-download`
//! and turn the result into a [`CliError`] for exit-code mapping.

pub mod download;
pub mod validate;

use crate::error::CliError;
use crate::parser::Cli;

/// Run the mode selected on the command line.
pub async fn execute(cli: &Cli) -> Result<(), CliError> {
    if cli.validate_only {
        validate::execute(&cli.manifest)
    } else {
        download::execute(&cli.manifest, &cli.models_dir).await
    }
}
