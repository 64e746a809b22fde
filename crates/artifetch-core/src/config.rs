//! Credential configuration, constructed once at startup.
//!
//! Capability implementations receive this value by reference; nothing
//! below the composition root reads the process environment.

use std::fmt;

use tracing::info;

/// `HuggingFace` Hub token.
pub const ENV_HF_TOKEN: &str = "HF_TOKEN";
/// `CivitAI` token.
pub const ENV_CIVITAI_TOKEN: &str = "CIVITAI_TOKEN";
/// Alternate name for the `CivitAI` token.
pub const ENV_CIVITAI_API_KEY: &str = "CIVITAI_API_KEY";
/// R2 access key id.
pub const ENV_R2_ACCESS_KEY_ID: &str = "R2_ACCESS_KEY_ID";
/// R2 secret access key.
pub const ENV_R2_SECRET_ACCESS_KEY: &str = "R2_SECRET_ACCESS_KEY";
/// Cloudflare account id hosting the R2 buckets.
pub const ENV_R2_ACCOUNT_ID: &str = "R2_ACCOUNT_ID";
/// Optional default R2 bucket.
pub const ENV_R2_BUCKET: &str = "R2_BUCKET";

/// Credentials for the S3-compatible object store.
#[derive(Clone, PartialEq, Eq)]
pub struct ObjectStorageConfig {
    /// Access key id.
    pub access_key: String,
    /// Secret access key.
    pub secret_key: String,
    /// Cloudflare account id; determines the endpoint.
    pub account_id: String,
    /// Bucket used when an identifier carries no bucket prefix.
    pub default_bucket: Option<String>,
}

impl ObjectStorageConfig {
    /// R2 endpoint for this account.
    pub fn endpoint(&self) -> String {
        format!("https://{}.r2.cloudflarestorage.com", self.account_id)
    }
}

impl fmt::Debug for ObjectStorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStorageConfig")
            .field("access_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("default_bucket", &self.default_bucket)
            .finish()
    }
}

/// All remote credentials. Absent tokens mean unauthenticated requests.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FetchConfig {
    /// `HuggingFace` Hub token.
    pub hf_token: Option<String>,
    /// `CivitAI` API token.
    pub civitai_token: Option<String>,
    /// Object-storage bundle; `None` disables that source.
    pub object_storage: Option<ObjectStorageConfig>,
}

impl FetchConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Blank values count as absent. The object-storage bundle exists only
    /// when access key, secret key and account id are all present.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let object_storage = match (
            get(ENV_R2_ACCESS_KEY_ID),
            get(ENV_R2_SECRET_ACCESS_KEY),
            get(ENV_R2_ACCOUNT_ID),
        ) {
            (Some(access_key), Some(secret_key), Some(account_id)) => Some(ObjectStorageConfig {
                access_key,
                secret_key,
                account_id,
                default_bucket: get(ENV_R2_BUCKET),
            }),
            _ => None,
        };

        Self {
            hf_token: get(ENV_HF_TOKEN),
            civitai_token: get(ENV_CIVITAI_TOKEN).or_else(|| get(ENV_CIVITAI_API_KEY)),
            object_storage,
        }
    }

    /// Log which credentials were loaded, never their values.
    pub fn log_loaded(&self) {
        if self.object_storage.is_some() {
            info!("R2 configuration loaded");
        }
        if self.civitai_token.is_some() {
            info!("CivitAI token loaded");
        }
        if self.hf_token.is_some() {
            info!("HuggingFace token loaded");
        }
    }
}

impl fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |token: &Option<String>| token.as_ref().map(|_| "<redacted>");
        f.debug_struct("FetchConfig")
            .field("hf_token", &redact(&self.hf_token))
            .field("civitai_token", &redact(&self.civitai_token))
            .field("object_storage", &self.object_storage)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> FetchConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        FetchConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_empty_environment() {
        let config = config_from(&[]);
        assert_eq!(config, FetchConfig::default());
    }

    #[test]
    fn test_full_object_storage_bundle() {
        let config = config_from(&[
            (ENV_R2_ACCESS_KEY_ID, "ak"),
            (ENV_R2_SECRET_ACCESS_KEY, "sk"),
            (ENV_R2_ACCOUNT_ID, "acct"),
            (ENV_R2_BUCKET, "models"),
        ]);
        let storage = config.object_storage.unwrap();
        assert_eq!(storage.default_bucket.as_deref(), Some("models"));
        assert_eq!(storage.endpoint(), "https://acct.r2.cloudflarestorage.com");
    }

    #[test]
    fn test_partial_object_storage_bundle_disables_source() {
        let config = config_from(&[(ENV_R2_ACCESS_KEY_ID, "ak"), (ENV_R2_ACCOUNT_ID, "acct")]);
        assert!(config.object_storage.is_none());
    }

    #[test]
    fn test_blank_values_are_absent() {
        let config = config_from(&[(ENV_HF_TOKEN, "  "), (ENV_R2_BUCKET, "")]);
        assert!(config.hf_token.is_none());
    }

    #[test]
    fn test_civitai_api_key_fallback() {
        let config = config_from(&[(ENV_CIVITAI_API_KEY, "key")]);
        assert_eq!(config.civitai_token.as_deref(), Some("key"));

        let both = config_from(&[(ENV_CIVITAI_TOKEN, "token"), (ENV_CIVITAI_API_KEY, "key")]);
        assert_eq!(both.civitai_token.as_deref(), Some("token"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = config_from(&[
            (ENV_HF_TOKEN, "hf_secret"),
            (ENV_R2_ACCESS_KEY_ID, "ak_secret"),
            (ENV_R2_SECRET_ACCESS_KEY, "sk_secret"),
            (ENV_R2_ACCOUNT_ID, "acct"),
        ]);
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hf_secret"));
        assert!(!rendered.contains("ak_secret"));
        assert!(!rendered.contains("sk_secret"));
        assert!(rendered.contains("acct"));
    }
}
