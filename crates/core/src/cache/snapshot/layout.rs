//! Where each domain lives on disk.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::cache::{CacheDomain, DEFAULT_IMAGE_TOKEN, ImageKey};

/// File layout of the snapshot directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `cache_<stem>.json`; for image contents this is the key index.
    pub fn domain_file(&self, domain: CacheDomain) -> PathBuf {
        self.root.join(format!("{}.json", domain.file_stem()))
    }

    pub fn image_dir(&self) -> PathBuf {
        self.root.join(CacheDomain::ImageContents.file_stem())
    }

    pub fn image_file(&self, key: &ImageKey) -> PathBuf {
        self.image_dir().join(format!("image_{}.png", file_token(key)))
    }

    pub fn thumb_file(&self, key: &ImageKey) -> PathBuf {
        self.image_dir().join(format!("thumb_{}.png", file_token(key)))
    }
}

/// Single path component for `key`; separators and `%` are percent-encoded.
fn file_token(key: &ImageKey) -> Cow<'_, str> {
    match key {
        ImageKey::Default => Cow::Borrowed(DEFAULT_IMAGE_TOKEN),
        ImageKey::Named(name) => urlencoding::encode(name),
    }
}

/// Sibling that holds the previous generation of `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}
