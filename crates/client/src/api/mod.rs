//! Fetch-or-refresh operations, one per remote endpoint.
//!
//! Every flow has the same shape: return the cached value if it is fresh,
//! otherwise call the endpoint, store the decoded value with the current
//! time, persist its domain and return it. Nothing serializes concurrent
//! refreshes of the same key; the last write wins.

mod episodic;
mod images;
mod news;
pub(crate) mod response;
mod search;

#[cfg(test)]
pub(crate) mod fixtures;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use thorns_core::cache::CacheLayout;
use thorns_core::{AppConfig, CacheDomain, CacheRegistry, CachedItems, Clock, Error, SystemClock};

use crate::endpoint::{Arguments, Endpoint};
use crate::transport::{HttpTransport, Transport, TransportConfig};

/// Client for the fractalthorns API with a write-through cache.
#[derive(Clone)]
pub struct ThornsClient {
    transport: Arc<dyn Transport>,
    cache: Arc<CacheRegistry>,
    clock: Arc<dyn Clock>,
    origin: String,
    api_root: String,
}

impl ThornsClient {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<CacheRegistry>, config: &AppConfig) -> Self {
        Self {
            transport,
            cache,
            clock: Arc::new(SystemClock),
            origin: config.origin().to_string(),
            api_root: config.api_root(),
        }
    }

    /// Replace the time source used for freshness and cooldown checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// HTTP transport plus a cache restored from `config.cache_dir`.
    pub async fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let transport = HttpTransport::new(&TransportConfig::from(config))?;
        let cache = CacheRegistry::open(CacheLayout::new(&config.cache_dir)).await;
        Ok(Self::new(Arc::new(transport), Arc::new(cache), config))
    }

    pub fn cache(&self) -> &CacheRegistry {
        &self.cache
    }

    /// Purge one domain. Without `forced` this fails inside the cooldown.
    pub async fn purge(&self, domain: CacheDomain, forced: bool) -> Result<(), Error> {
        self.cache.purge(domain, forced, self.clock.now()).await
    }

    pub fn cached_items(&self, domain: CacheDomain, include_stale: bool) -> CachedItems {
        self.cache.cached_items(domain, include_stale, self.clock.now())
    }

    /// Call `endpoint` and decode its JSON body.
    async fn call<T: DeserializeOwned>(&self, endpoint: Endpoint, args: Arguments) -> Result<T, Error> {
        let req = endpoint.descriptor().request(&self.api_root, &args, true)?;
        let body = self.transport.get(&req).await?;
        serde_json::from_slice(&body).map_err(|e| Error::Parse(format!("{endpoint}: {e}")))
    }
}
