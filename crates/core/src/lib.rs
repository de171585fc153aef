//! Core types and shared functionality for the fractalthorns cache.
//!
//! This crate provides:
//! - Per-domain cache tables with freshness windows and purge cooldowns
//! - Crash-tolerant on-disk snapshots of every domain
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod model;

pub use cache::{CacheDomain, CacheEntry, CacheRegistry, CacheState, CachedItems, ImageKey, SearchKey};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
