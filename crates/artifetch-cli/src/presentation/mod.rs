//! Terminal presentation.

pub mod progress;

pub use progress::CliProgressPrinter;
