//! Ctrl-C handling for the batch.
//!
//! An interrupt drops the in-flight handler future. Transfers write to
//! partial files, so a dropped transfer never leaves a file at its target.

use std::future::Future;

use crate::error::CliError;

/// Resolves on the first Ctrl-C, or never if no handler could be installed.
pub async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Run `work` to completion unless `interrupt` resolves first.
///
/// An interrupt that is already pending wins over finished work.
pub async fn until_interrupted<W, I>(work: W, interrupt: I) -> Result<(), CliError>
where
    W: Future<Output = Result<(), CliError>>,
    I: Future<Output = ()>,
{
    tokio::select! {
        biased;
        () = interrupt => Err(CliError::Interrupted),
        result = work => result,
    }
}
