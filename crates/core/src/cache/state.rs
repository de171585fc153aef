//! The in-memory tables of every domain, plus cache metadata.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entry::{DomainTable, Slot};
use super::introspect::{CachedItems, MetadataView};
use super::{CacheDomain, ImageKey, PurgeLog, SearchKey, timestamp};
use crate::Error;
use crate::model::{Chapter, Image, ImageContents, ImageDescription, NewsEntry, Record, RecordText, SearchResult};

/// Purge history and the markers of the last complete catalogue fetches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheMetadata {
    #[serde(
        rename = "__last_all_images_cache",
        with = "timestamp::seconds_opt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_all_images: Option<DateTime<Utc>>,
    #[serde(
        rename = "__last_full_episodic_cache",
        with = "timestamp::seconds_opt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_full_episodic: Option<DateTime<Utc>>,
    #[serde(rename = "__last_cache_purge", default)]
    pub purges: PurgeLog,
}

impl CacheMetadata {
    /// Whether the all-images catalogue was fetched and is still fresh.
    pub fn all_images_fresh(&self, now: DateTime<Utc>) -> bool {
        marker_fresh(self.last_all_images, CacheDomain::Images, now)
    }

    /// Whether the full episodic was fetched and is still fresh.
    pub fn full_episodic_fresh(&self, now: DateTime<Utc>) -> bool {
        marker_fresh(self.last_full_episodic, CacheDomain::Chapters, now)
    }
}

fn marker_fresh(marker: Option<DateTime<Utc>>, domain: CacheDomain, now: DateTime<Utc>) -> bool {
    marker.is_some_and(|at| now <= at + domain.ttl())
}

/// Every domain table, owned together so cascades update them in one step.
#[derive(Debug, Clone)]
pub struct CacheState {
    pub news: Slot<Vec<NewsEntry>>,
    pub images: DomainTable<ImageKey, Image>,
    pub image_contents: DomainTable<ImageKey, ImageContents>,
    pub image_descriptions: DomainTable<String, ImageDescription>,
    pub chapters: Slot<Vec<Chapter>>,
    pub records: DomainTable<String, Record>,
    pub record_contents: DomainTable<String, RecordText>,
    pub search_results: DomainTable<SearchKey, Vec<SearchResult>>,
    pub full_record_contents: Slot<BTreeMap<String, RecordText>>,
    pub metadata: CacheMetadata,
}

impl Default for CacheState {
    fn default() -> Self {
        Self {
            news: Slot::new(CacheDomain::NewsItems),
            images: DomainTable::new(CacheDomain::Images),
            image_contents: DomainTable::new(CacheDomain::ImageContents),
            image_descriptions: DomainTable::new(CacheDomain::ImageDescriptions),
            chapters: Slot::new(CacheDomain::Chapters),
            records: DomainTable::new(CacheDomain::Records),
            record_contents: DomainTable::new(CacheDomain::RecordContents),
            search_results: DomainTable::new(CacheDomain::SearchResults),
            full_record_contents: Slot::new(CacheDomain::FullRecordContents),
            metadata: CacheMetadata::default(),
        }
    }
}

impl CacheState {
    /// Empty the table of `domain`, dropping any catalogue marker tied to it.
    ///
    /// Does not consult or record purge history.
    pub fn clear(&mut self, domain: CacheDomain) {
        match domain {
            CacheDomain::NewsItems => self.news.clear(),
            CacheDomain::Images => {
                self.images.clear();
                self.metadata.last_all_images = None;
            }
            CacheDomain::ImageContents => self.image_contents.clear(),
            CacheDomain::ImageDescriptions => self.image_descriptions.clear(),
            CacheDomain::Chapters => {
                self.chapters.clear();
                self.metadata.last_full_episodic = None;
            }
            CacheDomain::Records => self.records.clear(),
            CacheDomain::RecordContents => self.record_contents.clear(),
            CacheDomain::SearchResults => self.search_results.clear(),
            CacheDomain::FullRecordContents => self.full_record_contents.clear(),
            CacheDomain::CacheMetadata => {}
        }
    }

    /// Purge `domain` at `now`, honouring its cooldown unless `forced`.
    ///
    /// The purge time is recorded even for forced purges.
    pub fn purge(&mut self, domain: CacheDomain, forced: bool, now: DateTime<Utc>) -> Result<(), Error> {
        self.metadata.purges.check(domain, now, forced)?;
        self.clear(domain);
        self.metadata.purges.record(domain, now);
        Ok(())
    }

    /// Copy out the entries of `domain`, annotated with cache and expiry times.
    pub fn view(&self, domain: CacheDomain, include_stale: bool, now: DateTime<Utc>) -> CachedItems {
        match domain {
            CacheDomain::NewsItems => CachedItems::News(self.news.view(now, include_stale)),
            CacheDomain::Images => CachedItems::Images(self.images.view(now, include_stale)),
            CacheDomain::ImageContents => CachedItems::ImageContents(self.image_contents.view(now, include_stale)),
            CacheDomain::ImageDescriptions => {
                CachedItems::ImageDescriptions(self.image_descriptions.view(now, include_stale))
            }
            CacheDomain::Chapters => CachedItems::Chapters(self.chapters.view(now, include_stale)),
            CacheDomain::Records => CachedItems::Records(self.records.view(now, include_stale)),
            CacheDomain::RecordContents => CachedItems::RecordContents(self.record_contents.view(now, include_stale)),
            CacheDomain::SearchResults => CachedItems::SearchResults(self.search_results.view(now, include_stale)),
            CacheDomain::FullRecordContents => {
                CachedItems::FullRecordContents(self.full_record_contents.view(now, include_stale))
            }
            CacheDomain::CacheMetadata => CachedItems::Metadata(MetadataView::new(&self.metadata)),
        }
    }
}
