//! Streaming a remote body to a local file.
//!
//! Transfers are all-or-nothing: bytes land in a `<name>.part` sibling that
//! is renamed onto the target only once the body is complete. A failed
//! stream removes the partial file; a cancelled one leaves it behind, never
//! the target.

use std::path::{Path, PathBuf};

use artifetch_core::{FetchError, FetchResult, MegabyteTicker, ProgressSink};
use bytes::Bytes;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Suffix of the in-progress sibling of a target file.
const PARTIAL_SUFFIX: &str = ".part";

/// Body chunks of a remote object.
pub type ByteStream = BoxStream<'static, FetchResult<Bytes>>;

/// An opened remote download.
pub struct RemoteBody {
    /// Body chunks.
    pub stream: ByteStream,
    /// Exact length announced by the remote, if any.
    pub content_length: Option<u64>,
}

impl RemoteBody {
    /// Wrap a stream with an optional announced length.
    pub fn new(stream: ByteStream, content_length: Option<u64>) -> Self {
        Self {
            stream,
            content_length,
        }
    }
}

/// Write `body` to `target`, returning the number of bytes written.
///
/// `size_hint` is only used for progress display when the remote did not
/// announce a length. An announced length that disagrees with the bytes
/// received is a transport failure.
pub async fn write_body(
    body: RemoteBody,
    target: &Path,
    label: &str,
    size_hint: Option<u64>,
    progress: &dyn ProgressSink,
) -> FetchResult<u64> {
    let partial = partial_path(target);
    let result = stream_to_file(body, &partial, label, size_hint, progress).await;
    match result {
        Ok(written) => {
            commit_partial(&partial, target).await?;
            Ok(written)
        }
        Err(e) => {
            remove_partial(&partial).await;
            Err(e)
        }
    }
}

/// Sibling path a transfer into `target` writes to.
pub fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().map(ToOwned::to_owned).unwrap_or_default();
    name.push(PARTIAL_SUFFIX);
    target.with_file_name(name)
}

/// Rename a finished partial file onto `target`, replacing any file there.
pub async fn commit_partial(partial: &Path, target: &Path) -> FetchResult<()> {
    if let Err(e) = tokio::fs::rename(partial, target).await {
        remove_partial(partial).await;
        return Err(FetchError::io(&format!("moving into {}", target.display()), &e));
    }
    Ok(())
}

async fn stream_to_file(
    body: RemoteBody,
    target: &Path,
    label: &str,
    size_hint: Option<u64>,
    progress: &dyn ProgressSink,
) -> FetchResult<u64> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| FetchError::io(&format!("creating {}", parent.display()), &e))?;
    }

    let mut file = tokio::fs::File::create(target)
        .await
        .map_err(|e| FetchError::io(&format!("creating {}", target.display()), &e))?;

    let RemoteBody {
        mut stream,
        content_length,
    } = body;
    let mut ticker = MegabyteTicker::start(progress, label, content_length.or(size_hint));

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| FetchError::io(&format!("writing {}", target.display()), &e))?;
        ticker.add(chunk.len() as u64);
    }

    file.flush()
        .await
        .map_err(|e| FetchError::io(&format!("flushing {}", target.display()), &e))?;
    file.sync_all()
        .await
        .map_err(|e| FetchError::io(&format!("syncing {}", target.display()), &e))?;

    let written = ticker.downloaded();
    if let Some(expected) = content_length {
        if written != expected {
            return Err(FetchError::transport(format!(
                "connection closed after {written} of {expected} bytes"
            )));
        }
    }

    Ok(written)
}

/// Delete a partially written file, ignoring a file that is already gone.
pub async fn remove_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial file {}: {e}", path.display()),
    }
}
