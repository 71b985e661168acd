//! Explicit TTL cache for resolution outcomes
//!
//! Owned by the presentation layer; the resolver itself stays stateless.
//! Expiry is checked explicitly on every read instead of relying on an
//! implicit framework decorator.

use crate::error::ResolveError;
use crate::resolve::Resolution;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// What a resolution cycle produced. Exhaustion is cached too, so a dead
/// upstream is not re-polled on every render within the TTL.
pub type Outcome = Result<Resolution, ResolveError>;

/// Cache key: the reference date plus the config fingerprint
/// ([`crate::config::ReportConfig::fingerprint`]), so editing the config
/// invalidates entries resolved under the old settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub date: NaiveDate,
    pub fingerprint: u64,
}

struct Entry {
    outcome: Outcome,
    stored_at: Instant,
}

pub struct ResolutionCache {
    ttl: Duration,
    entries: HashMap<CacheKey, Entry>,
}

impl ResolutionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Get the cached outcome if it exists and has not expired
    pub fn fresh(&self, key: &CacheKey) -> Option<&Outcome> {
        self.entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| &entry.outcome)
    }

    /// Store an outcome, replacing any previous entry for the key
    pub fn insert(&mut self, key: CacheKey, outcome: Outcome) {
        self.entries.insert(
            key,
            Entry {
                outcome,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop expired entries so stale tables do not accumulate
    pub fn purge_expired(&mut self) {
        self.entries
            .retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    fn key(day: u32, fingerprint: u64) -> CacheKey {
        CacheKey {
            date: NaiveDate::from_ymd_opt(2025, 12, day).unwrap(),
            fingerprint,
        }
    }

    fn resolution() -> Resolution {
        Resolution {
            table: Table::default(),
            address: "https://reports.test/x.csv".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 12, 4).unwrap(),
            report_label: None,
        }
    }

    #[test]
    fn fresh_entry_is_served_within_ttl() {
        let mut cache = ResolutionCache::new(Duration::from_secs(600));
        cache.insert(key(4, 1), Ok(resolution()));

        let outcome = cache.fresh(&key(4, 1)).expect("entry should be fresh");
        assert!(outcome.is_ok());
    }

    #[test]
    fn zero_ttl_means_always_stale() {
        let mut cache = ResolutionCache::new(Duration::ZERO);
        cache.insert(key(4, 1), Ok(resolution()));
        assert!(cache.fresh(&key(4, 1)).is_none());
    }

    #[test]
    fn key_includes_config_fingerprint() {
        let mut cache = ResolutionCache::new(Duration::from_secs(600));
        cache.insert(key(4, 1), Ok(resolution()));
        assert!(cache.fresh(&key(4, 2)).is_none());
        assert!(cache.fresh(&key(3, 1)).is_none());
    }

    #[test]
    fn purge_removes_expired_entries() {
        let mut cache = ResolutionCache::new(Duration::ZERO);
        cache.insert(key(4, 1), Ok(resolution()));
        assert_eq!(cache.len(), 1);
        cache.purge_expired();
        assert!(cache.is_empty());
    }

    #[test]
    fn exhaustion_is_cacheable() {
        let mut cache = ResolutionCache::new(Duration::from_secs(600));
        cache.insert(
            key(4, 1),
            Err(ResolveError::Exhausted { attempts: vec![] }),
        );
        let outcome = cache.fresh(&key(4, 1)).unwrap();
        assert!(outcome.is_err());
    }
}
