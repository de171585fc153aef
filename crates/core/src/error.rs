//! Unified error types for the fractalthorns cache.
//!
//! Every failure a caller can observe maps to one variant here. Transport
//! failures are propagated untouched; decode failures while restoring
//! snapshots are logged and never surface from startup.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::cache::CacheDomain;

/// Unified error types for the cache and its fetch flows.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required endpoint argument was not supplied.
    #[error("MISSING_ARGUMENT: {endpoint} requires '{argument}'")]
    MissingArgument { endpoint: String, argument: String },

    /// An argument was supplied that the endpoint does not declare.
    #[error("UNEXPECTED_ARGUMENT: {endpoint} does not accept '{argument}'")]
    UnexpectedArgument { endpoint: String, argument: String },

    /// Search type outside of image / episodic-item / episodic-line.
    #[error("INVALID_SEARCH_TYPE: {0}")]
    InvalidSearchType(String),

    /// A non-forced purge was attempted before the domain's cooldown ran out.
    #[error("COOLDOWN_ACTIVE: {domain} can be purged again at {allowed_at}")]
    CooldownActive { domain: CacheDomain, allowed_at: DateTime<Utc> },

    /// Not a recognised (or not a purgeable) cache domain.
    #[error("UNKNOWN_DOMAIN: {0}")]
    UnknownDomain(String),

    /// The request did not complete within the configured timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    Timeout(String),

    /// Connection failure, redirect loop or other network-level error.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// The origin answered with a non-success status.
    #[error("HTTP_ERROR: status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// The origin answered, but the body could not be decoded.
    #[error("PARSE_ERROR: {0}")]
    Parse(String),

    /// An on-disk snapshot could not be decoded.
    #[error("PERSISTENCE_DECODE: {domain}: {reason}")]
    PersistenceDecode { domain: CacheDomain, reason: String },

    /// Reading or writing a snapshot file failed.
    #[error("IO_ERROR: {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
}

impl Error {
    /// Whether this error came from the network layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Timeout(_) | Error::Network(_) | Error::HttpStatus { .. } | Error::Parse(_))
    }

    /// Whether the caller supplied a malformed request.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Error::MissingArgument { .. }
                | Error::UnexpectedArgument { .. }
                | Error::InvalidSearchType(_)
                | Error::UnknownDomain(_)
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}
