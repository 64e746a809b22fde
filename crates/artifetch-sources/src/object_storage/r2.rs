//! Cloudflare R2 adapter over `object_store`'s S3 client.

use artifetch_core::{FetchError, FetchResult, ObjectStorageConfig};
use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use object_store::ObjectStore;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;

use super::{ObjectLocation, ObjectStoreClient};
use crate::transfer::RemoteBody;

/// R2 uses a single pseudo-region.
const R2_REGION: &str = "auto";

/// S3 client bound to one R2 account.
///
/// Buckets are chosen per request, so a store is built for each call.
#[derive(Clone)]
pub struct R2Client {
    config: ObjectStorageConfig,
}

impl R2Client {
    /// Create a client from the credential bundle.
    pub const fn new(config: ObjectStorageConfig) -> Self {
        Self { config }
    }

    fn store(&self, bucket: &str) -> FetchResult<AmazonS3> {
        AmazonS3Builder::new()
            .with_endpoint(self.config.endpoint())
            .with_access_key_id(&self.config.access_key)
            .with_secret_access_key(&self.config.secret_key)
            .with_region(R2_REGION)
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| FetchError::configuration(format!("Failed to initialize R2 client: {e}")))
    }
}

impl std::fmt::Debug for R2Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("R2Client")
            .field("config", &self.config)
            .finish()
    }
}

fn map_store_error(location: &ObjectLocation, err: object_store::Error) -> FetchError {
    match err {
        object_store::Error::NotFound { .. } => FetchError::not_found(format!("{location}: {err}")),
        other => FetchError::transport(format!("R2 download failed: {other}")),
    }
}

fn to_u64(size: usize) -> FetchResult<u64> {
    u64::try_from(size).map_err(|_| FetchError::transport("object size out of range"))
}

#[async_trait]
impl ObjectStoreClient for R2Client {
    async fn head(&self, location: &ObjectLocation) -> FetchResult<u64> {
        let store = self.store(&location.bucket)?;
        let meta = store
            .head(&ObjectPath::from(location.key.as_str()))
            .await
            .map_err(|e| map_store_error(location, e))?;
        to_u64(meta.size)
    }

    async fn get(&self, location: &ObjectLocation) -> FetchResult<RemoteBody> {
        let store = self.store(&location.bucket)?;
        let result = store
            .get(&ObjectPath::from(location.key.as_str()))
            .await
            .map_err(|e| map_store_error(location, e))?;

        let length = to_u64(result.meta.size)?;
        let stream = result
            .into_stream()
            .map_err(|e| FetchError::transport(format!("R2 download failed: {e}")))
            .boxed();

        Ok(RemoteBody::new(stream, Some(length)))
    }
}
