//! Cache domain identities and their fixed freshness and cooldown windows.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::Error;

/// One of the fixed categories of cached content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CacheDomain {
    #[serde(rename = "news")]
    NewsItems,
    #[serde(rename = "images")]
    Images,
    #[serde(rename = "image contents")]
    ImageContents,
    #[serde(rename = "image descriptions")]
    ImageDescriptions,
    #[serde(rename = "chapters")]
    Chapters,
    #[serde(rename = "records")]
    Records,
    #[serde(rename = "record contents")]
    RecordContents,
    #[serde(rename = "search results")]
    SearchResults,
    #[serde(rename = "full record contents")]
    FullRecordContents,
    /// Purge history and the two "last full fetch" markers.
    #[serde(rename = "cache metadata")]
    CacheMetadata,
}

impl CacheDomain {
    pub const ALL: [CacheDomain; 10] = [
        CacheDomain::NewsItems,
        CacheDomain::Images,
        CacheDomain::ImageContents,
        CacheDomain::ImageDescriptions,
        CacheDomain::Chapters,
        CacheDomain::Records,
        CacheDomain::RecordContents,
        CacheDomain::SearchResults,
        CacheDomain::FullRecordContents,
        CacheDomain::CacheMetadata,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CacheDomain::NewsItems => "news",
            CacheDomain::Images => "images",
            CacheDomain::ImageContents => "image contents",
            CacheDomain::ImageDescriptions => "image descriptions",
            CacheDomain::Chapters => "chapters",
            CacheDomain::Records => "records",
            CacheDomain::RecordContents => "record contents",
            CacheDomain::SearchResults => "search results",
            CacheDomain::FullRecordContents => "full record contents",
            CacheDomain::CacheMetadata => "cache metadata",
        }
    }

    /// Freshness window of entries in this domain.
    ///
    /// The metadata domain holds no entries and reports zero.
    pub fn ttl(self) -> Duration {
        match self {
            CacheDomain::NewsItems
            | CacheDomain::Images
            | CacheDomain::Chapters
            | CacheDomain::Records
            | CacheDomain::SearchResults => Duration::hours(12),
            CacheDomain::ImageContents | CacheDomain::ImageDescriptions | CacheDomain::RecordContents => {
                Duration::hours(72)
            }
            CacheDomain::FullRecordContents => Duration::hours(730),
            CacheDomain::CacheMetadata => Duration::zero(),
        }
    }

    /// Minimum time between two non-forced purges, `None` when the domain
    /// cannot be purged at all.
    pub fn purge_cooldown(self) -> Option<Duration> {
        match self {
            CacheDomain::NewsItems
            | CacheDomain::Images
            | CacheDomain::Chapters
            | CacheDomain::Records
            | CacheDomain::SearchResults => Some(Duration::hours(1)),
            CacheDomain::ImageContents | CacheDomain::ImageDescriptions | CacheDomain::RecordContents => {
                Some(Duration::hours(3))
            }
            CacheDomain::FullRecordContents => Some(Duration::hours(24)),
            CacheDomain::CacheMetadata => None,
        }
    }

    pub fn is_purgeable(self) -> bool {
        self.purge_cooldown().is_some()
    }

    pub fn purgeable() -> impl Iterator<Item = CacheDomain> {
        Self::ALL.into_iter().filter(|domain| domain.is_purgeable())
    }

    /// Snapshot file stem, e.g. `cache_image_contents`.
    pub fn file_stem(self) -> String {
        format!("cache_{}", self.name().replace(' ', "_"))
    }
}

impl fmt::Display for CacheDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CacheDomain {
    type Err = Error;

    /// Accepts the display name, with underscores or hyphens in place of spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|domain| domain.name() == wanted)
            .ok_or_else(|| Error::UnknownDomain(s.to_string()))
    }
}
