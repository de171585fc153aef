//! On-disk snapshots of the cache domains.
//!
//! Each domain is handled by one [`SnapshotCodec`] registered in
//! [`codecs`]. Every write first renames an existing target to a `.bak`
//! sibling so an interrupted write leaves the previous generation behind.

mod images;
mod json;
mod layout;

use std::io;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use super::{CacheDomain, CacheState};
use crate::Error;

pub use images::ImageContentsCodec;
pub use json::JsonCodec;
pub use layout::{CacheLayout, backup_path};

/// Bytes destined for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl SnapshotFile {
    pub fn new(path: PathBuf, bytes: Vec<u8>) -> Self {
        Self { path, bytes }
    }
}

/// Converts one domain between [`CacheState`] and its files.
pub trait SnapshotCodec: Send + Sync {
    fn domain(&self) -> CacheDomain;

    /// Render the domain's table as files. Performs no I/O.
    fn encode(&self, state: &CacheState, layout: &CacheLayout) -> Result<Vec<SnapshotFile>, Error>;

    /// Read the domain's files into `state`, replacing its table.
    ///
    /// Returns `false` when no snapshot exists. On error `state` is left
    /// untouched.
    fn decode(&self, layout: &CacheLayout, state: &mut CacheState) -> Result<bool, Error>;
}

/// One codec per domain, metadata included.
pub fn codecs() -> Vec<Box<dyn SnapshotCodec>> {
    vec![
        Box::new(JsonCodec::new(
            CacheDomain::NewsItems,
            |state| state.news.entry(),
            |state, entry| state.news.restore(entry),
        )),
        Box::new(JsonCodec::new(
            CacheDomain::Images,
            |state| state.images.entries(),
            |state, entries| state.images.restore(entries),
        )),
        Box::new(ImageContentsCodec),
        Box::new(JsonCodec::new(
            CacheDomain::ImageDescriptions,
            |state| state.image_descriptions.entries(),
            |state, entries| state.image_descriptions.restore(entries),
        )),
        Box::new(JsonCodec::new(
            CacheDomain::Chapters,
            |state| state.chapters.entry(),
            |state, entry| state.chapters.restore(entry),
        )),
        Box::new(JsonCodec::new(
            CacheDomain::Records,
            |state| state.records.entries(),
            |state, entries| state.records.restore(entries),
        )),
        Box::new(JsonCodec::new(
            CacheDomain::RecordContents,
            |state| state.record_contents.entries(),
            |state, entries| state.record_contents.restore(entries),
        )),
        Box::new(JsonCodec::new(
            CacheDomain::SearchResults,
            |state| state.search_results.entries(),
            |state, entries| state.search_results.restore(entries),
        )),
        Box::new(JsonCodec::new(
            CacheDomain::FullRecordContents,
            |state| state.full_record_contents.entry(),
            |state, entry| state.full_record_contents.restore(entry),
        )),
        Box::new(JsonCodec::new(
            CacheDomain::CacheMetadata,
            |state| &state.metadata,
            |state, metadata| state.metadata = metadata,
        )),
    ]
}

/// Rebuild every domain from `layout`.
///
/// A domain that fails to decode is logged and left cold; it never stops
/// the others from loading.
pub fn load_state(layout: &CacheLayout) -> CacheState {
    let mut state = CacheState::default();
    for codec in codecs() {
        let domain = codec.domain();
        match codec.decode(layout, &mut state) {
            Ok(true) => tracing::debug!(%domain, "Restored cache domain"),
            Ok(false) => tracing::debug!(%domain, "No snapshot for cache domain"),
            Err(e) => tracing::warn!(%domain, error = %e, "Failed to load cache domain, starting cold"),
        }
    }
    state
}

/// Write files in order, each preceded by moving the old file to `.bak`.
pub fn write_files(files: &[SnapshotFile]) -> Result<(), Error> {
    for file in files {
        if let Some(parent) = file.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        if file.path.exists() {
            let backup = backup_path(&file.path);
            std::fs::rename(&file.path, &backup).map_err(|e| Error::io(&backup, e))?;
        }
        std::fs::write(&file.path, &file.bytes).map_err(|e| Error::io(&file.path, e))?;
    }
    Ok(())
}

/// Contents of `path`, or `None` if it does not exist.
pub(crate) fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, Error> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Encodes domains and writes them under a cache directory.
///
/// Writes run on the blocking pool, one batch at a time.
pub struct SnapshotStore {
    layout: CacheLayout,
    codecs: Vec<Box<dyn SnapshotCodec>>,
    gate: Mutex<()>,
}

impl SnapshotStore {
    pub fn new(layout: CacheLayout) -> Self {
        Self { layout, codecs: codecs(), gate: Mutex::new(()) }
    }

    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    pub fn codec_for(&self, domain: CacheDomain) -> Option<&dyn SnapshotCodec> {
        self.codecs.iter().find(|codec| codec.domain() == domain).map(|codec| codec.as_ref())
    }

    pub fn encode(&self, domain: CacheDomain, state: &CacheState) -> Result<Vec<SnapshotFile>, Error> {
        let codec = self.codec_for(domain).ok_or_else(|| Error::UnknownDomain(domain.name().to_string()))?;
        codec.encode(state, &self.layout)
    }

    pub async fn write(&self, files: Vec<SnapshotFile>) -> Result<(), Error> {
        let _guard = self.gate.lock().await;
        self.write_locked(files).await
    }

    /// Run `encode` and write its files while holding the write gate.
    ///
    /// Batches reach disk in the order they were encoded, so the last
    /// snapshot written always reflects the latest state read.
    pub async fn save<F>(&self, encode: F) -> Result<(), Error>
    where
        F: FnOnce(&Self) -> Result<Vec<SnapshotFile>, Error>,
    {
        let _guard = self.gate.lock().await;
        let files = encode(self)?;
        self.write_locked(files).await
    }

    async fn write_locked(&self, files: Vec<SnapshotFile>) -> Result<(), Error> {
        let root = self.layout.root().to_path_buf();
        tokio::task::spawn_blocking(move || write_files(&files))
            .await
            .map_err(|e| Error::io(root, io::Error::other(e)))?
    }

    pub async fn load(&self) -> CacheState {
        let layout = self.layout.clone();
        match tokio::task::spawn_blocking(move || load_state(&layout)).await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(error = %e, "Cache restore task failed, starting cold");
                CacheState::default()
            }
        }
    }
}
