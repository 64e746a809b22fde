//! S3-compatible object storage capability (Cloudflare R2).
//!
//! The store client is a port so the fetcher can be exercised without a
//! live bucket. [`R2Client`] is the production adapter.

mod r2;

use std::path::{Path, PathBuf};

use artifetch_core::{FetchError, FetchResult, SharedProgress, Source, SourceFetcher};
use async_trait::async_trait;
use tracing::info;

use crate::transfer::{RemoteBody, write_body};

pub use r2::R2Client;

/// A bucket and key inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
}

impl std::fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Resolve a manifest identifier to a bucket and key.
///
/// With a default bucket the whole identifier is the key. Without one the
/// identifier must be `bucket/key`.
pub fn resolve_location(identifier: &str, default_bucket: Option<&str>) -> FetchResult<ObjectLocation> {
    let (bucket, key) = match default_bucket {
        Some(bucket) => (bucket, identifier),
        None => identifier.split_once('/').ok_or_else(|| {
            FetchError::configuration(format!(
                "R2 identifier must include bucket or set R2_BUCKET environment variable. Got: {identifier}"
            ))
        })?,
    };

    if bucket.is_empty() || key.is_empty() {
        return Err(FetchError::configuration(format!(
            "R2 identifier must name both a bucket and a key. Got: {identifier}"
        )));
    }

    Ok(ObjectLocation {
        bucket: bucket.to_string(),
        key: key.to_string(),
    })
}

/// Minimal object store operations the fetcher needs.
#[async_trait]
pub trait ObjectStoreClient: Send + Sync {
    /// Probe an object, returning its size in bytes.
    async fn head(&self, location: &ObjectLocation) -> FetchResult<u64>;

    /// Open an object for streaming.
    async fn get(&self, location: &ObjectLocation) -> FetchResult<RemoteBody>;
}

/// Fetches objects from an S3-compatible store.
pub struct ObjectStorageFetcher {
    client: Box<dyn ObjectStoreClient>,
    default_bucket: Option<String>,
    progress: SharedProgress,
}

impl ObjectStorageFetcher {
    /// Create a fetcher over a pre-configured client.
    pub fn new(
        client: Box<dyn ObjectStoreClient>,
        default_bucket: Option<String>,
        progress: SharedProgress,
    ) -> Self {
        Self {
            client,
            default_bucket,
            progress,
        }
    }
}

#[async_trait]
impl SourceFetcher for ObjectStorageFetcher {
    fn source(&self) -> Source {
        Source::ObjectStorage
    }

    async fn fetch(
        &self,
        identifier: &str,
        filename: &str,
        destination_dir: &Path,
    ) -> FetchResult<PathBuf> {
        let location = resolve_location(identifier, self.default_bucket.as_deref())?;
        info!("Downloading from R2: {location}");

        let size = self.client.head(&location).await.map_err(|e| {
            FetchError::not_found(format!("Object not found in R2: {location} - {e}"))
        })?;
        info!("File size: {size} bytes");

        let target = destination_dir.join(filename);
        let body = self.client.get(&location).await?;
        write_body(body, &target, filename, Some(size), self.progress.as_ref()).await?;

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::testing::body_from;
    use artifetch_core::noop_progress;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeStore {
        objects: HashMap<String, Vec<u8>>,
    }

    impl FakeStore {
        fn with_object(mut self, bucket: &str, key: &str, data: &[u8]) -> Self {
            self.objects.insert(format!("{bucket}/{key}"), data.to_vec());
            self
        }

        fn lookup(&self, location: &ObjectLocation) -> FetchResult<&Vec<u8>> {
            self.objects
                .get(&format!("{}/{}", location.bucket, location.key))
                .ok_or_else(|| FetchError::not_found("NoSuchKey"))
        }
    }

    #[async_trait]
    impl ObjectStoreClient for FakeStore {
        async fn head(&self, location: &ObjectLocation) -> FetchResult<u64> {
            Ok(self.lookup(location)?.len() as u64)
        }

        async fn get(&self, location: &ObjectLocation) -> FetchResult<RemoteBody> {
            let data = self.lookup(location)?;
            Ok(body_from(&[data.as_slice()], None, true))
        }
    }

    #[test]
    fn test_resolve_explicit_bucket() {
        let loc = resolve_location("mybucket/path/file.safetensors", None).unwrap();
        assert_eq!(loc.bucket, "mybucket");
        assert_eq!(loc.key, "path/file.safetensors");
        assert_eq!(loc.to_string(), "s3://mybucket/path/file.safetensors");
    }

    #[test]
    fn test_resolve_default_bucket_keeps_whole_key() {
        let loc = resolve_location("path/file.safetensors", Some("models")).unwrap();
        assert_eq!(loc.bucket, "models");
        assert_eq!(loc.key, "path/file.safetensors");
    }

    #[test]
    fn test_resolve_without_any_bucket_is_configuration_error() {
        let err = resolve_location("file.safetensors", None).unwrap_err();
        assert!(matches!(err, FetchError::Configuration { .. }));
        assert!(err.to_string().contains("R2_BUCKET"));
    }

    #[test]
    fn test_resolve_rejects_empty_key() {
        assert!(resolve_location("bucket/", None).is_err());
        assert!(resolve_location("", Some("models")).is_err());
    }

    #[tokio::test]
    async fn test_fetch_writes_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = FakeStore::default().with_object("mybucket", "loras/a.safetensors", b"weights");
        let fetcher = ObjectStorageFetcher::new(Box::new(store), None, noop_progress());

        let path = fetcher
            .fetch("mybucket/loras/a.safetensors", "a.safetensors", dir.path())
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("a.safetensors"));
        assert_eq!(std::fs::read(&path).unwrap(), b"weights");
    }

    #[tokio::test]
    async fn test_missing_object_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = ObjectStorageFetcher::new(
            Box::new(FakeStore::default()),
            Some("models".to_string()),
            noop_progress(),
        );

        let err = fetcher
            .fetch("missing.bin", "missing.bin", dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::NotFound { .. }));
        assert!(err.to_string().contains("s3://models/missing.bin"));
        assert!(!dir.path().join("missing.bin").exists());
    }
}
