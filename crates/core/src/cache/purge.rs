//! Purge history and cooldown enforcement.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CacheDomain, timestamp};
use crate::Error;

/// When each domain was last purged.
///
/// Domains never purged are absent and always eligible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurgeLog {
    #[serde(with = "timestamp::seconds_map")]
    last: BTreeMap<CacheDomain, DateTime<Utc>>,
}

impl PurgeLog {
    pub fn last_purge(&self, domain: CacheDomain) -> Option<DateTime<Utc>> {
        self.last.get(&domain).copied()
    }

    /// Earliest moment a non-forced purge of `domain` is permitted.
    pub fn allowed_at(&self, domain: CacheDomain) -> Option<DateTime<Utc>> {
        let cooldown = domain.purge_cooldown()?;
        self.last_purge(domain).map(|last| last + cooldown)
    }

    /// Fails if `domain` cannot be purged at `now`.
    ///
    /// A forced purge skips the cooldown, never the purgeability check.
    pub fn check(&self, domain: CacheDomain, now: DateTime<Utc>, forced: bool) -> Result<(), Error> {
        if !domain.is_purgeable() {
            return Err(Error::UnknownDomain(domain.name().to_string()));
        }
        if forced {
            return Ok(());
        }
        match self.allowed_at(domain) {
            Some(allowed_at) if now < allowed_at => Err(Error::CooldownActive { domain, allowed_at }),
            _ => Ok(()),
        }
    }

    pub fn record(&mut self, domain: CacheDomain, at: DateTime<Utc>) {
        self.last.insert(domain, at);
    }

    pub fn iter(&self) -> impl Iterator<Item = (CacheDomain, DateTime<Utc>)> + '_ {
        self.last.iter().map(|(domain, at)| (*domain, *at))
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
    fn test_never_purged_is_allowed() {
        let log = PurgeLog::default();
        assert!(log.check(CacheDomain::NewsItems, t0(), false).is_ok());
        assert!(log.allowed_at(CacheDomain::NewsItems).is_none());
    }

    #[test]
    fn test_cooldown_blocks_until_allowed_at() {
        let mut log = PurgeLog::default();
        log.record(CacheDomain::ImageContents, t0());

        let err = log.check(CacheDomain::ImageContents, t0() + Duration::hours(1), false).unwrap_err();
        match err {
            Error::CooldownActive { domain, allowed_at } => {
                assert_eq!(domain, CacheDomain::ImageContents);
                assert_eq!(allowed_at, t0() + Duration::hours(3));
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(log.check(CacheDomain::ImageContents, t0() + Duration::hours(3), false).is_ok());
        assert!(log.check(CacheDomain::Images, t0(), false).is_ok(), "cooldowns are per domain");
    }

    #[test]
    fn test_forced_skips_cooldown() {
        let mut log = PurgeLog::default();
        log.record(CacheDomain::FullRecordContents, t0());
        assert!(log.check(CacheDomain::FullRecordContents, t0(), false).is_err());
        assert!(log.check(CacheDomain::FullRecordContents, t0(), true).is_ok());
    }

    #[test]
    fn test_metadata_never_purgeable() {
        let log = PurgeLog::default();
        assert!(matches!(
            log.check(CacheDomain::CacheMetadata, t0(), true),
            Err(Error::UnknownDomain(_))
        ));
    }

    #[test]
    fn test_serializes_by_domain_name() {
        let mut log = PurgeLog::default();
        log.record(CacheDomain::SearchResults, t0());
        let json = serde_json::to_string(&log).unwrap();
        assert_eq!(json, r#"{"search results":1722470400.0}"#);

        let back: PurgeLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }
}
