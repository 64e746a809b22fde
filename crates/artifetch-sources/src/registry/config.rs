//! Configuration for the model registry client.

use std::time::Duration;

use artifetch_core::RetryPolicy;

/// Configuration for the `CivitAI` registry client.
///
/// # Example
///
/// ```
/// use artifetch_sources::RegistryClientConfig;
/// use std::time::Duration;
///
/// let config = RegistryClientConfig::new()
///     .with_optional_token(Some("token".to_string()))
///     .with_read_timeout(Duration::from_secs(120));
/// ```
#[derive(Debug, Clone)]
pub struct RegistryClientConfig {
    /// Base URL of the read API, with trailing slash
    pub(crate) base_url: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Optional bearer token
    pub(crate) token: Option<String>,
    /// Connect timeout for every request
    pub(crate) connect_timeout: Duration,
    /// Whole-request timeout for metadata queries
    pub(crate) metadata_timeout: Duration,
    /// Idle read timeout while streaming a file
    pub(crate) read_timeout: Duration,
    /// Retry policy for metadata queries
    pub(crate) metadata_retry: RetryPolicy,
    /// Retry policy for file transfers
    pub(crate) download_retry: RetryPolicy,
}

impl Default for RegistryClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://civitai.com/api/v1/".to_string(),
            user_agent: concat!("artifetch/", env!("CARGO_PKG_VERSION")).to_string(),
            token: None,
            connect_timeout: Duration::from_secs(30),
            metadata_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(60),
            metadata_retry: RetryPolicy::new(3, Duration::from_secs(2)),
            download_retry: RetryPolicy::new(3, Duration::from_secs(5)),
        }
    }
}

impl RegistryClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the registry API.
    ///
    /// Defaults to `https://civitai.com/api/v1/`.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set an optional authentication token.
    #[must_use]
    pub fn with_optional_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Set the idle read timeout used while streaming files.
    ///
    /// Defaults to 60 seconds.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the retry policy for metadata queries.
    ///
    /// Defaults to 3 attempts, 2 seconds apart.
    #[must_use]
    pub const fn with_metadata_retry(mut self, policy: RetryPolicy) -> Self {
        self.metadata_retry = policy;
        self
    }

    /// Set the retry policy for file transfers.
    ///
    /// Defaults to 3 attempts, 5 seconds apart.
    #[must_use]
    pub const fn with_download_retry(mut self, policy: RetryPolicy) -> Self {
        self.download_retry = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryClientConfig::new();
        assert_eq!(config.base_url, "https://civitai.com/api/v1/");
        assert!(config.user_agent.starts_with("artifetch/"));
        assert!(config.token.is_none());
        assert_eq!(config.metadata_retry, RetryPolicy::new(3, Duration::from_secs(2)));
        assert_eq!(config.download_retry, RetryPolicy::new(3, Duration::from_secs(5)));
    }

    #[test]
    fn test_builder_pattern() {
        let config = RegistryClientConfig::new()
            .with_base_url("http://localhost:9000/api/")
            .with_user_agent("test-agent")
            .with_optional_token(Some("secret".to_string()))
            .with_download_retry(RetryPolicy::once());

        assert_eq!(config.base_url, "http://localhost:9000/api/");
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.download_retry.max_attempts, 1);
    }
}
