//! Client configuration.
//!
//! The API base URL and the optional `api_key` are passed into the client
//! explicitly. Nothing here is process-global; two clients may point at
//! different hosts, which is how the integration tests target the mock
//! server.

use std::env;

pub const DEFAULT_API_BASE: &str = "https://api.tumblr.com/v2";

pub const API_BASE_ENV: &str = "TUMBLR_API_BASE";
pub const API_KEY_ENV: &str = "TUMBLR_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    api_key: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Consumer key sent as the `api_key` query parameter on GET requests.
    /// Endpoints that only need API-key authentication work without a
    /// signing transport.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Defaults overridden by `TUMBLR_API_BASE` and `TUMBLR_API_KEY`.
    pub fn from_env() -> Self {
        let mut config = match env::var(API_BASE_ENV) {
            Ok(base) if !base.trim().is_empty() => Self::new(base.trim()),
            _ => Self::default(),
        };
        if let Ok(key) = env::var(API_KEY_ENV) {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Join an endpoint path onto the base URL. A leading `/` on `path` is
    /// optional.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
