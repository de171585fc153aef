//! Outbound HTTP capability.
//!
//! ### Behaviour
//!
//! - Fixed headers: configured `User-Agent` and `Accept: application/json`
//! - Fixed per-request timeout, no retries
//! - At most 5 redirects; a redirect loop is a network error
//! - Non-2xx responses fail with the status and URL

mod http;

#[cfg(test)]
pub(crate) mod fake;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thorns_core::{AppConfig, Error};

use crate::endpoint::HttpRequest;

pub use http::HttpTransport;

/// Issues GET requests and returns the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, req: &HttpRequest) -> Result<Bytes, Error>;
}

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// User agent string (default: "thorns-cache/0.1")
    pub user_agent: String,

    /// Request timeout (default: 10s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { user_agent: "thorns-cache/0.1".to_string(), timeout: Duration::from_secs(10), max_redirects: 5 }
    }
}

impl From<&AppConfig> for TransportConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout(), ..Default::default() }
    }
}
