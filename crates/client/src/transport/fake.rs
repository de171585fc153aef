//! In-memory transport for exercising the fetch flows.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Duration;
use thorns_core::{Error, ManualClock};
use tokio::sync::Barrier;

use super::Transport;
use crate::endpoint::HttpRequest;

/// Serves canned bodies keyed by the request's display form
/// (`url?body=<json>`, or the bare URL for binary GETs).
#[derive(Default)]
pub(crate) struct FakeTransport {
    routes: Mutex<HashMap<String, Bytes>>,
    requests: Mutex<Vec<String>>,
    barrier: Option<Arc<Barrier>>,
    clock: Option<Arc<ManualClock>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Hold every request until this many are in flight.
    pub(crate) fn with_barrier(mut self, parties: usize) -> Self {
        self.barrier = Some(Arc::new(Barrier::new(parties)));
        self
    }

    /// Advance `clock` by one second as each response is served.
    pub(crate) fn with_clock(mut self, clock: Arc<ManualClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub(crate) fn route(&self, key: impl Into<String>, body: impl Into<Bytes>) {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner).insert(key.into(), body.into());
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, req: &HttpRequest) -> Result<Bytes, Error> {
        let key = req.to_string();
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(key.clone());

        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if let Some(clock) = &self.clock {
            clock.advance(Duration::seconds(1));
        }

        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
            .ok_or(Error::HttpStatus { status: 404, url: key })
    }
}
