//! CLI entry point - the composition root.
//!
//! Builds a current-thread runtime and races the selected handler against
//! Ctrl-C so an interrupt maps to its own exit code.

use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use artifetch_cli::interrupt::{ctrl_c, until_interrupted};
use artifetch_cli::{Cli, CliError, EXIT_FAILURE, EXIT_INTERRUPTED, EXIT_SUCCESS, handlers};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let result = runtime.block_on(until_interrupted(handlers::execute(cli), ctrl_c()));

    // Blocking hf-hub transfers are not awaited past this point.
    runtime.shutdown_timeout(Duration::from_secs(1));
    result.map_err(anyhow::Error::from)
}

fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(&cli) {
        Ok(()) => EXIT_SUCCESS,
        Err(err) => {
            let code = err
                .downcast_ref::<CliError>()
                .map_or(EXIT_FAILURE, CliError::exit_code);
            if code == EXIT_INTERRUPTED {
                warn!("{err}");
            } else {
                error!("{err:#}");
            }
            code
        }
    };

    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
