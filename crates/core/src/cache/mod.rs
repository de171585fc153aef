//! In-memory cache domains, purge control and on-disk snapshots.
//!
//! This module provides:
//!
//! - Fixed cache domains, each with a freshness window and purge cooldown
//! - Keyed and single-entry tables with staleness derived from `cached_at`
//! - A registry that persists domains through per-domain snapshot codecs

mod domain;
pub mod entry;
mod introspect;
mod key;
mod purge;
mod registry;
pub mod snapshot;
mod state;
pub mod timestamp;

pub use domain::CacheDomain;
pub use entry::{Annotated, CacheEntry, DomainTable, Slot};
pub use introspect::{CachedItems, MetadataView};
pub use key::{DEFAULT_IMAGE_TOKEN, ImageKey, SearchKey};
pub use purge::PurgeLog;
pub use registry::CacheRegistry;
pub use snapshot::CacheLayout;
pub use state::{CacheMetadata, CacheState};
