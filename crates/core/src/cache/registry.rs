//! The process-wide cache: every domain table plus optional persistence.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};

use super::snapshot::{CacheLayout, SnapshotFile, SnapshotStore};
use super::{CacheDomain, CacheState, CachedItems};
use crate::Error;

/// Owns the cache state and writes it through to disk.
///
/// Locks are short and synchronous; callers must not hold one across an
/// `.await`. Freshness check and refresh are separate steps, so concurrent
/// callers that both see a stale entry will both refresh it and the later
/// write wins.
pub struct CacheRegistry {
    state: RwLock<CacheState>,
    store: Option<SnapshotStore>,
}

impl CacheRegistry {
    /// A registry that is never persisted.
    pub fn ephemeral() -> Self {
        Self { state: RwLock::new(CacheState::default()), store: None }
    }

    /// Restore every domain found under `layout`.
    pub async fn open(layout: CacheLayout) -> Self {
        let store = SnapshotStore::new(layout);
        let state = store.load().await;
        tracing::info!(root = %store.layout().root().display(), "Cache restored");
        Self { state: RwLock::new(state), store: Some(store) }
    }

    pub fn layout(&self) -> Option<&CacheLayout> {
        self.store.as_ref().map(SnapshotStore::layout)
    }

    pub fn read<R>(&self, f: impl FnOnce(&CacheState) -> R) -> R {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut CacheState) -> R) -> R {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Save `domain`, then the metadata file.
    ///
    /// State is read only once the store's write gate is held, so
    /// concurrent saves reach disk in the order they observed memory.
    pub async fn persist(&self, domain: CacheDomain) -> Result<(), Error> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        store
            .save(|store| {
                self.read(|state| -> Result<Vec<SnapshotFile>, Error> {
                    let mut files = store.encode(domain, state)?;
                    if domain != CacheDomain::CacheMetadata {
                        files.extend(store.encode(CacheDomain::CacheMetadata, state)?);
                    }
                    Ok(files)
                })
            })
            .await?;
        tracing::debug!(%domain, "Cache domain saved");
        Ok(())
    }

    /// Purge `domain` and persist the result so the cooldown survives restarts.
    pub async fn purge(&self, domain: CacheDomain, forced: bool, now: DateTime<Utc>) -> Result<(), Error> {
        self.update(|state| state.purge(domain, forced, now))?;
        tracing::info!(%domain, forced, "Cache domain purged");
        self.persist(domain).await
    }

    pub fn cached_items(&self, domain: CacheDomain, include_stale: bool, now: DateTime<Utc>) -> CachedItems {
        self.read(|state| state.view(domain, include_stale, now))
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::ephemeral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use chrono::Duration;
    use std::sync::Arc;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_722_470_400, 0).unwrap()
    }

    fn record() -> Record {
        Record { chapter: "II".to_string(), name: Some("r".to_string()), title: None, solved: true, iteration: None }
    }

    #[tokio::test]
    async fn test_purge_cooldown_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let registry = CacheRegistry::open(CacheLayout::new(dir.path())).await;
        registry.update(|state| state.records.put("r".to_string(), record(), t0()));
        registry.persist(CacheDomain::Records).await.unwrap();
        registry.purge(CacheDomain::Records, false, t0()).await.unwrap();

        let reopened = CacheRegistry::open(CacheLayout::new(dir.path())).await;
        assert!(reopened.read(|state| state.records.is_empty()));
        let err = reopened.purge(CacheDomain::Records, false, t0() + Duration::minutes(5)).await.unwrap_err();
        assert!(matches!(err, Error::CooldownActive { domain: CacheDomain::Records, .. }));
    }

    #[tokio::test]
    async fn test_persist_writes_metadata_alongside() {
        let dir = tempfile::tempdir().unwrap();
        let layout = CacheLayout::new(dir.path());
        let registry = CacheRegistry::open(layout.clone()).await;
        registry.update(|state| state.records.put("r".to_string(), record(), t0()));
        registry.persist(CacheDomain::Records).await.unwrap();

        assert!(layout.domain_file(CacheDomain::Records).exists());
        assert!(layout.domain_file(CacheDomain::CacheMetadata).exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_persists_leave_latest_state_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Arc::new(CacheRegistry::open(CacheLayout::new(dir.path())).await);

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    let name = format!("r{i}");
                    registry.update(|state| state.records.put(name, record(), t0()));
                    registry.persist(CacheDomain::Records).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let reopened = CacheRegistry::open(CacheLayout::new(dir.path())).await;
        let on_disk = reopened.read(|state| state.records.entries().clone());
        let in_memory = registry.read(|state| state.records.entries().clone());
        assert_eq!(on_disk.len(), 16);
        assert_eq!(on_disk, in_memory);
    }

    #[tokio::test]
    async fn test_ephemeral_registry_skips_disk() {
        let registry = CacheRegistry::ephemeral();
        assert!(registry.layout().is_none());
        registry.update(|state| state.news.put(vec![], t0()));
        registry.persist(CacheDomain::NewsItems).await.unwrap();
        assert_eq!(registry.cached_items(CacheDomain::NewsItems, false, t0()).len(), 1);
    }

    #[tokio::test]
    async fn test_purge_unknown_domain_fails() {
        let registry = CacheRegistry::ephemeral();
        let err = registry.purge(CacheDomain::CacheMetadata, true, t0()).await.unwrap_err();
        assert!(matches!(err, Error::UnknownDomain(_)));
    }
}
