//! Codec for domains stored as a single JSON document.

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{CacheLayout, SnapshotCodec, SnapshotFile, read_optional};
use crate::Error;
use crate::cache::{CacheDomain, CacheState};

/// Serializes the part of [`CacheState`] picked by `select` and restores it
/// with `install`.
pub struct JsonCodec<T> {
    domain: CacheDomain,
    select: fn(&CacheState) -> &T,
    install: fn(&mut CacheState, T),
    _shape: PhantomData<fn() -> T>,
}

impl<T> JsonCodec<T> {
    pub fn new(domain: CacheDomain, select: fn(&CacheState) -> &T, install: fn(&mut CacheState, T)) -> Self {
        Self { domain, select, install, _shape: PhantomData }
    }
}

impl<T> SnapshotCodec for JsonCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    fn domain(&self) -> CacheDomain {
        self.domain
    }

    fn encode(&self, state: &CacheState, layout: &CacheLayout) -> Result<Vec<SnapshotFile>, Error> {
        let bytes = serde_json::to_vec(&(self.select)(state)).map_err(|e| Error::PersistenceDecode {
            domain: self.domain,
            reason: format!("failed to encode: {e}"),
        })?;
        Ok(vec![SnapshotFile::new(layout.domain_file(self.domain), bytes)])
    }

    fn decode(&self, layout: &CacheLayout, state: &mut CacheState) -> Result<bool, Error> {
        let path = layout.domain_file(self.domain);
        let Some(bytes) = read_optional(&path)? else {
            return Ok(false);
        };
        let value = serde_json::from_slice(&bytes)
            .map_err(|e| Error::PersistenceDecode { domain: self.domain, reason: e.to_string() })?;
        (self.install)(state, value);
        Ok(true)
    }
}
