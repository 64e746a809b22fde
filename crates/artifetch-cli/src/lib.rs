#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

// Used by the binary only
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod interrupt;
pub mod parser;
pub mod presentation;

pub use bootstrap::{CliContext, bootstrap};
pub use error::{CliError, EXIT_FAILURE, EXIT_INTERRUPTED, EXIT_SUCCESS};
pub use parser::Cli;
