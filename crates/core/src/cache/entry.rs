//! Cache entries and the per-domain tables holding them.
//!
//! Entries are replaced wholesale, never mutated in place. Staleness is
//! derived from `cached_at` and the owning domain's TTL.

use std::borrow::Borrow;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::CacheDomain;
use super::timestamp;

/// A cached value and the moment it was stored.
///
/// Serialized as the pair `[value, unix_seconds]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub value: V,
    pub cached_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V, cached_at: DateTime<Utc>) -> Self {
        Self { value, cached_at }
    }

    pub fn expires_at(&self, domain: CacheDomain) -> DateTime<Utc> {
        self.cached_at + domain.ttl()
    }

    /// An entry is stale once `now` is strictly past its expiry.
    pub fn is_stale(&self, domain: CacheDomain, now: DateTime<Utc>) -> bool {
        now > self.expires_at(domain)
    }

    pub fn annotate(&self, domain: CacheDomain) -> Annotated<V>
    where
        V: Clone,
    {
        Annotated { value: self.value.clone(), cached_at: self.cached_at, expires_at: self.expires_at(domain) }
    }
}

impl<V: Serialize> Serialize for CacheEntry<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.value, timestamp::to_seconds(self.cached_at)).serialize(serializer)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for CacheEntry<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (value, seconds) = <(V, f64)>::deserialize(deserializer)?;
        Ok(Self { value, cached_at: timestamp::decode::<D::Error>(seconds)? })
    }
}

/// A cached value together with when it was stored and when it expires.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotated<V> {
    pub value: V,
    pub cached_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Keyed table of one domain.
///
/// Iteration follows insertion order; replacing a key keeps its position.
#[derive(Debug, Clone)]
pub struct DomainTable<K, V> {
    domain: CacheDomain,
    entries: IndexMap<K, CacheEntry<V>>,
}

impl<K: Hash + Eq, V> DomainTable<K, V> {
    pub fn new(domain: CacheDomain) -> Self {
        Self { domain, entries: IndexMap::new() }
    }

    pub fn domain(&self) -> CacheDomain {
        self.domain
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&CacheEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// The value under `key` if present and not stale at `now`.
    pub fn fresh<Q>(&self, key: &Q, now: DateTime<Utc>) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key)
            .filter(|entry| !entry.is_stale(self.domain, now))
            .map(|entry| &entry.value)
    }

    pub fn put(&mut self, key: K, value: V, now: DateTime<Utc>) {
        self.entries.insert(key, CacheEntry::new(value, now));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &CacheEntry<V>)> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &IndexMap<K, CacheEntry<V>> {
        &self.entries
    }

    /// Replace every entry, as when restoring a snapshot.
    pub fn restore(&mut self, entries: IndexMap<K, CacheEntry<V>>) {
        self.entries = entries;
    }

    /// Annotated copy of the table. Stale entries are left out of the
    /// returned view unless `include_stale`; the table itself is untouched.
    pub fn view(&self, now: DateTime<Utc>, include_stale: bool) -> IndexMap<K, Annotated<V>>
    where
        K: Clone,
        V: Clone,
    {
        self.entries
            .iter()
            .filter(|(_, entry)| include_stale || !entry.is_stale(self.domain, now))
            .map(|(key, entry)| (key.clone(), entry.annotate(self.domain)))
            .collect()
    }
}

/// Single-entry table of a domain that has no key (news, chapters, ...).
#[derive(Debug, Clone)]
pub struct Slot<V> {
    domain: CacheDomain,
    entry: Option<CacheEntry<V>>,
}

impl<V> Slot<V> {
    pub fn new(domain: CacheDomain) -> Self {
        Self { domain, entry: None }
    }

    pub fn domain(&self) -> CacheDomain {
        self.domain
    }

    pub fn get(&self) -> Option<&CacheEntry<V>> {
        self.entry.as_ref()
    }

    pub fn fresh(&self, now: DateTime<Utc>) -> Option<&V> {
        self.entry
            .as_ref()
            .filter(|entry| !entry.is_stale(self.domain, now))
            .map(|entry| &entry.value)
    }

    pub fn put(&mut self, value: V, now: DateTime<Utc>) {
        self.entry = Some(CacheEntry::new(value, now));
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    pub fn entry(&self) -> &Option<CacheEntry<V>> {
        &self.entry
    }

    pub fn restore(&mut self, entry: Option<CacheEntry<V>>) {
        self.entry = entry;
    }

    pub fn view(&self, now: DateTime<Utc>, include_stale: bool) -> Option<Annotated<V>>
    where
        V: Clone,
    {
        self.entry
            .as_ref()
            .filter(|entry| include_stale || !entry.is_stale(self.domain, now))
            .map(|entry| entry.annotate(self.domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_722_470_400, 0).unwrap()
    }

    #[test]
    fn test_staleness_boundary() {
        let entry = CacheEntry::new("value", t0());
        let ttl = CacheDomain::NewsItems.ttl();
        assert!(!entry.is_stale(CacheDomain::NewsItems, t0()));
        assert!(!entry.is_stale(CacheDomain::NewsItems, t0() + ttl));
        assert!(entry.is_stale(CacheDomain::NewsItems, t0() + ttl + Duration::seconds(1)));
    }

    #[test]
    fn test_entry_serializes_as_pair() {
        let entry = CacheEntry::new(vec!["a".to_string()], t0());
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"[["a"],1722470400.0]"#);

        let back: CacheEntry<Vec<String>> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_entry_rejects_bad_timestamp() {
        let result: Result<CacheEntry<i32>, _> = serde_json::from_str(r#"[1, "yesterday"]"#);
        assert!(result.is_err());
        let result: Result<CacheEntry<i32>, _> = serde_json::from_str("[1, 1e300]");
        assert!(result.is_err());
    }

    #[test]
    fn test_table_fresh_and_replace() {
        let mut table: DomainTable<String, i32> = DomainTable::new(CacheDomain::Records);
        table.put("a".into(), 1, t0());
        table.put("b".into(), 2, t0());
        assert_eq!(table.fresh("a", t0()), Some(&1));
        assert_eq!(table.fresh("a", t0() + Duration::hours(13)), None);
        assert!(table.get("a").is_some(), "stale entries stay in the table");

        table.put("a".into(), 3, t0() + Duration::hours(13));
        assert_eq!(table.fresh("a", t0() + Duration::hours(13)), Some(&3));
        let order: Vec<&String> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn test_view_drops_stale_without_mutating() {
        let mut table: DomainTable<String, i32> = DomainTable::new(CacheDomain::SearchResults);
        table.put("old".into(), 1, t0());
        table.put("new".into(), 2, t0() + Duration::hours(10));
        let now = t0() + Duration::hours(13);

        let fresh = table.view(now, false);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh["new"].expires_at, t0() + Duration::hours(22));

        let all = table.view(now, true);
        assert_eq!(all.len(), 2);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_slot_view() {
        let mut slot: Slot<Vec<i32>> = Slot::new(CacheDomain::Chapters);
        assert!(slot.view(t0(), true).is_none());

        slot.put(vec![1, 2], t0());
        assert_eq!(slot.fresh(t0()), Some(&vec![1, 2]));
        let later = t0() + Duration::hours(12) + Duration::seconds(1);
        assert!(slot.fresh(later).is_none());
        assert!(slot.view(later, false).is_none());
        assert_eq!(slot.view(later, true).map(|a| a.value), Some(vec![1, 2]));

        slot.clear();
        assert!(slot.get().is_none());
    }
}
