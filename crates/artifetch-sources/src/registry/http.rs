//! HTTP backend abstraction for the registry API.
//!
//! A backend performs exactly one request per call. Retrying is the
//! fetcher's concern, so a fake backend can script failures per attempt.

use artifetch_core::{FetchError, FetchResult};
use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use reqwest::StatusCode;
use url::Url;

use super::config::RegistryClientConfig;
use super::models::RegistryModel;
use crate::transfer::RemoteBody;

// ============================================================================
// Backend Trait
// ============================================================================

/// The two registry operations the fetcher needs.
#[async_trait]
pub trait RegistryBackend: Send + Sync {
    /// Fetch metadata for one model id.
    async fn get_model(&self, model_id: &str) -> FetchResult<RegistryModel>;

    /// Open a file download URL taken from the metadata.
    async fn open_download(&self, url: &str) -> FetchResult<RemoteBody>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production backend using reqwest.
///
/// Every request carries the configured user agent and, when a token is
/// set, a bearer authorization header.
pub struct ReqwestRegistryBackend {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    metadata_timeout: std::time::Duration,
}

impl ReqwestRegistryBackend {
    /// Create a backend from the given configuration.
    pub fn new(config: &RegistryClientConfig) -> FetchResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            FetchError::configuration(format!("Invalid registry URL '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::configuration(format!(
                "Registry URL cannot be a base: {base_url}"
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .build()
            .map_err(|e| FetchError::configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
            metadata_timeout: config.metadata_timeout,
        })
    }

    /// Metadata URL for `model_id`.
    pub(crate) fn model_url(&self, model_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("models").push(model_id);
        }
        url
    }

    /// Build a request with optional authentication.
    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }
        request
    }
}

fn transport(err: &reqwest::Error) -> FetchError {
    match err.status() {
        Some(status) => FetchError::transport_with_status(err.to_string(), status.as_u16()),
        None => FetchError::transport(err.to_string()),
    }
}

/// Reject non-success responses. 404 is terminal, everything else transient.
fn check_status(response: reqwest::Response, what: &str) -> FetchResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::not_found(format!("{what} (HTTP 404)")));
    }
    Err(FetchError::transport_with_status(
        format!("{what}: HTTP {status}"),
        status.as_u16(),
    ))
}

#[async_trait]
impl RegistryBackend for ReqwestRegistryBackend {
    async fn get_model(&self, model_id: &str) -> FetchResult<RegistryModel> {
        let url = self.model_url(model_id);
        let response = self
            .build_request(url.as_str())
            .timeout(self.metadata_timeout)
            .send()
            .await
            .map_err(|e| transport(&e))?;
        let response = check_status(response, &format!("Model {model_id} on CivitAI"))?;

        response.json::<RegistryModel>().await.map_err(|e| {
            FetchError::transport(format!("Invalid model metadata for {model_id}: {e}"))
        })
    }

    async fn open_download(&self, url: &str) -> FetchResult<RemoteBody> {
        let response = self
            .build_request(url)
            .send()
            .await
            .map_err(|e| transport(&e))?;
        let response = check_status(response, &format!("Download {url}"))?;

        let length = response.content_length();
        let stream = response
            .bytes_stream()
            .map_err(|e| transport(&e))
            .boxed();
        Ok(RemoteBody::new(stream, length))
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::transfer::testing::body_from;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Scripted outcome of one download attempt.
    pub enum DownloadScript {
        /// Fail before any bytes arrive.
        Refuse(FetchError),
        /// Deliver some bytes, then drop the connection.
        Truncate(Vec<u8>),
        /// Deliver the whole body.
        Body(Vec<u8>),
    }

    /// A fake backend that replays scripted results in order.
    ///
    /// Once a script runs out, its last entry keeps being replayed.
    pub struct FakeBackend {
        metadata: Mutex<VecDeque<FetchResult<RegistryModel>>>,
        downloads: Mutex<VecDeque<DownloadScript>>,
        metadata_calls: AtomicU32,
        download_calls: AtomicU32,
        pub last_download_url: Mutex<Option<String>>,
    }

    impl FakeBackend {
        /// Create a backend that serves `model` and a body of `data`.
        pub fn serving(model: RegistryModel, data: &[u8]) -> Self {
            Self::new()
                .with_metadata(Ok(model))
                .with_download(DownloadScript::Body(data.to_vec()))
        }

        /// Create a backend with empty scripts.
        pub fn new() -> Self {
            Self {
                metadata: Mutex::new(VecDeque::new()),
                downloads: Mutex::new(VecDeque::new()),
                metadata_calls: AtomicU32::new(0),
                download_calls: AtomicU32::new(0),
                last_download_url: Mutex::new(None),
            }
        }

        /// Queue a metadata result.
        pub fn with_metadata(self, result: FetchResult<RegistryModel>) -> Self {
            self.metadata.lock().unwrap().push_back(result);
            self
        }

        /// Queue a download attempt.
        pub fn with_download(self, script: DownloadScript) -> Self {
            self.downloads.lock().unwrap().push_back(script);
            self
        }

        pub fn metadata_calls(&self) -> u32 {
            self.metadata_calls.load(Ordering::SeqCst)
        }

        pub fn download_calls(&self) -> u32 {
            self.download_calls.load(Ordering::SeqCst)
        }
    }

    fn next_or_last<T>(queue: &Mutex<VecDeque<T>>, clone: impl Fn(&T) -> T) -> Option<T> {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().map(clone)
        }
    }

    fn clone_script(script: &DownloadScript) -> DownloadScript {
        match script {
            DownloadScript::Refuse(e) => DownloadScript::Refuse(e.clone()),
            DownloadScript::Truncate(d) => DownloadScript::Truncate(d.clone()),
            DownloadScript::Body(d) => DownloadScript::Body(d.clone()),
        }
    }

    #[async_trait]
    impl RegistryBackend for FakeBackend {
        async fn get_model(&self, _model_id: &str) -> FetchResult<RegistryModel> {
            self.metadata_calls.fetch_add(1, Ordering::SeqCst);
            next_or_last(&self.metadata, Clone::clone)
                .unwrap_or_else(|| Err(FetchError::not_found("no scripted metadata")))
        }

        async fn open_download(&self, url: &str) -> FetchResult<RemoteBody> {
            self.download_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_download_url.lock().unwrap() = Some(url.to_string());
            match next_or_last(&self.downloads, clone_script) {
                Some(DownloadScript::Refuse(e)) => Err(e),
                Some(DownloadScript::Truncate(data)) => {
                    let mut body = body_from(&[data.as_slice()], None, true);
                    body.content_length = Some(data.len() as u64 * 2 + 1);
                    Ok(body)
                }
                Some(DownloadScript::Body(data)) => Ok(body_from(&[data.as_slice()], None, true)),
                None => Err(FetchError::not_found("no scripted download")),
            }
        }
    }
}
