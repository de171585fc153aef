//! Read-only views of cached domains for inspection.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Value, json};

use super::entry::Annotated;
use super::state::CacheMetadata;
use super::{CacheDomain, ImageKey, SearchKey};
use crate::model::{Chapter, Image, ImageContents, ImageDescription, NewsEntry, Record, RecordText, SearchResult};

/// The entries of one domain, each with its cache and expiry time.
#[derive(Debug, Clone)]
pub enum CachedItems {
    News(Option<Annotated<Vec<NewsEntry>>>),
    Images(IndexMap<ImageKey, Annotated<Image>>),
    ImageContents(IndexMap<ImageKey, Annotated<ImageContents>>),
    ImageDescriptions(IndexMap<String, Annotated<ImageDescription>>),
    Chapters(Option<Annotated<Vec<Chapter>>>),
    Records(IndexMap<String, Annotated<Record>>),
    RecordContents(IndexMap<String, Annotated<RecordText>>),
    SearchResults(IndexMap<SearchKey, Annotated<Vec<SearchResult>>>),
    FullRecordContents(Option<Annotated<BTreeMap<String, RecordText>>>),
    Metadata(MetadataView),
}

impl CachedItems {
    pub fn domain(&self) -> CacheDomain {
        match self {
            CachedItems::News(_) => CacheDomain::NewsItems,
            CachedItems::Images(_) => CacheDomain::Images,
            CachedItems::ImageContents(_) => CacheDomain::ImageContents,
            CachedItems::ImageDescriptions(_) => CacheDomain::ImageDescriptions,
            CachedItems::Chapters(_) => CacheDomain::Chapters,
            CachedItems::Records(_) => CacheDomain::Records,
            CachedItems::RecordContents(_) => CacheDomain::RecordContents,
            CachedItems::SearchResults(_) => CacheDomain::SearchResults,
            CachedItems::FullRecordContents(_) => CacheDomain::FullRecordContents,
            CachedItems::Metadata(_) => CacheDomain::CacheMetadata,
        }
    }

    /// Number of entries in the view; metadata counts as one.
    pub fn len(&self) -> usize {
        match self {
            CachedItems::News(slot) => usize::from(slot.is_some()),
            CachedItems::Images(items) => items.len(),
            CachedItems::ImageContents(items) => items.len(),
            CachedItems::ImageDescriptions(items) => items.len(),
            CachedItems::Chapters(slot) => usize::from(slot.is_some()),
            CachedItems::Records(items) => items.len(),
            CachedItems::RecordContents(items) => items.len(),
            CachedItems::SearchResults(items) => items.len(),
            CachedItems::FullRecordContents(slot) => usize::from(slot.is_some()),
            CachedItems::Metadata(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// JSON rendering of the view. Binary payloads are reduced to their sizes.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        match self {
            CachedItems::News(slot) => serde_json::to_value(slot),
            CachedItems::Images(items) => keyed(items),
            CachedItems::ImageContents(items) => Ok(Value::Object(
                items
                    .iter()
                    .map(|(key, item)| {
                        let summary = json!({
                            "value": {
                                "image_bytes": item.value.image.len(),
                                "thumbnail_bytes": item.value.thumbnail.len(),
                            },
                            "cached_at": item.cached_at,
                            "expires_at": item.expires_at,
                        });
                        (key.to_string(), summary)
                    })
                    .collect(),
            )),
            CachedItems::ImageDescriptions(items) => keyed(items),
            CachedItems::Chapters(slot) => serde_json::to_value(slot),
            CachedItems::Records(items) => keyed(items),
            CachedItems::RecordContents(items) => keyed(items),
            CachedItems::SearchResults(items) => keyed(items),
            CachedItems::FullRecordContents(slot) => serde_json::to_value(slot),
            CachedItems::Metadata(view) => serde_json::to_value(view),
        }
    }
}

fn keyed<K: ToString, V: Serialize>(items: &IndexMap<K, Annotated<V>>) -> Result<Value, serde_json::Error> {
    let mut object = serde_json::Map::with_capacity(items.len());
    for (key, item) in items {
        object.insert(key.to_string(), serde_json::to_value(item)?);
    }
    Ok(Value::Object(object))
}

/// Snapshot of cache metadata with marker expiry and the next permitted
/// purge per domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataView {
    pub last_all_images: Option<DateTime<Utc>>,
    pub all_images_expires_at: Option<DateTime<Utc>>,
    pub last_full_episodic: Option<DateTime<Utc>>,
    pub full_episodic_expires_at: Option<DateTime<Utc>>,
    pub last_purge: BTreeMap<CacheDomain, DateTime<Utc>>,
    pub purge_allowed_at: BTreeMap<CacheDomain, DateTime<Utc>>,
}

impl MetadataView {
    pub fn new(metadata: &CacheMetadata) -> Self {
        let last_purge: BTreeMap<_, _> = metadata.purges.iter().collect();
        let purge_allowed_at = last_purge
            .keys()
            .filter_map(|domain| metadata.purges.allowed_at(*domain).map(|at| (*domain, at)))
            .collect();
        Self {
            last_all_images: metadata.last_all_images,
            all_images_expires_at: metadata.last_all_images.map(|at| at + CacheDomain::Images.ttl()),
            last_full_episodic: metadata.last_full_episodic,
            full_episodic_expires_at: metadata.last_full_episodic.map(|at| at + CacheDomain::Chapters.ttl()),
            last_purge,
            purge_allowed_at,
        }
    }
}
