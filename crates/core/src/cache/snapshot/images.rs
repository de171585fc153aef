//! Image contents: a JSON index of `key -> cached_at` plus one binary pair
//! (full image and thumbnail) per key.

use bytes::Bytes;
use indexmap::IndexMap;

use super::{CacheLayout, SnapshotCodec, SnapshotFile, read_optional};
use crate::Error;
use crate::cache::entry::CacheEntry;
use crate::cache::{CacheDomain, CacheState, ImageKey, timestamp};
use crate::model::ImageContents;

pub struct ImageContentsCodec;

impl SnapshotCodec for ImageContentsCodec {
    fn domain(&self) -> CacheDomain {
        CacheDomain::ImageContents
    }

    fn encode(&self, state: &CacheState, layout: &CacheLayout) -> Result<Vec<SnapshotFile>, Error> {
        let table = &state.image_contents;
        let index: IndexMap<&ImageKey, f64> =
            table.iter().map(|(key, entry)| (key, timestamp::to_seconds(entry.cached_at))).collect();
        let index = serde_json::to_vec(&index).map_err(|e| Error::PersistenceDecode {
            domain: CacheDomain::ImageContents,
            reason: format!("failed to encode index: {e}"),
        })?;

        let mut files = Vec::with_capacity(table.len() * 2 + 1);
        for (key, entry) in table.iter() {
            files.push(SnapshotFile::new(layout.image_file(key), entry.value.image.to_vec()));
            files.push(SnapshotFile::new(layout.thumb_file(key), entry.value.thumbnail.to_vec()));
        }
        files.push(SnapshotFile::new(layout.domain_file(CacheDomain::ImageContents), index));
        Ok(files)
    }

    fn decode(&self, layout: &CacheLayout, state: &mut CacheState) -> Result<bool, Error> {
        let Some(raw) = read_optional(&layout.domain_file(CacheDomain::ImageContents))? else {
            return Ok(false);
        };
        let index: IndexMap<ImageKey, f64> = serde_json::from_slice(&raw).map_err(|e| Error::PersistenceDecode {
            domain: CacheDomain::ImageContents,
            reason: e.to_string(),
        })?;

        let mut entries = IndexMap::with_capacity(index.len());
        for (key, seconds) in index {
            let cached_at = timestamp::from_seconds(seconds).ok_or_else(|| Error::PersistenceDecode {
                domain: CacheDomain::ImageContents,
                reason: format!("bad timestamp {seconds} for '{key}'"),
            })?;
            let image = read_optional(&layout.image_file(&key))?;
            let thumbnail = read_optional(&layout.thumb_file(&key))?;
            let (Some(image), Some(thumbnail)) = (image, thumbnail) else {
                tracing::warn!(key = %key, "Image files missing from cache, skipping entry");
                continue;
            };
            let contents = ImageContents { image: Bytes::from(image), thumbnail: Bytes::from(thumbnail) };
            entries.insert(key, CacheEntry::new(contents, cached_at));
        }
        state.image_contents.restore(entries);
        Ok(true)
    }
}
