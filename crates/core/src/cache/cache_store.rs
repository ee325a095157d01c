//! In-memory response cache.
//!
//! Entries are never evicted in the background; freshness is checked on read
//! and the raw entry stays available as a stale fallback until overwritten or
//! cleared.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

use super::Fingerprint;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Fingerprint-keyed cache with a single TTL.
pub struct CacheStore<V> {
    ttl: Duration,
    entries: Mutex<HashMap<Fingerprint, CacheEntry<V>>>,
}

impl<V: Clone> CacheStore<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Lock the entry map, recovering from poison if necessary.
    ///
    /// Every write replaces a whole entry, so a poisoned map is still consistent.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<Fingerprint, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for `key`, or `None` when missing or older than the TTL.
    pub fn get(&self, key: &Fingerprint) -> Option<V> {
        let entries = self.lock_entries();
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                debug!("Cache hit for {}", key);
                Some(entry.value.clone())
            }
            Some(_) => {
                debug!("Cache entry for {} has expired", key);
                None
            }
            None => None,
        }
    }

    /// Value for `key` regardless of age.
    pub fn get_stale(&self, key: &Fingerprint) -> Option<V> {
        self.lock_entries().get(key).map(|entry| entry.value.clone())
    }

    pub fn put(&self, key: Fingerprint, value: V) {
        self.lock_entries().insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        let mut entries = self.lock_entries();
        let dropped = entries.len();
        entries.clear();
        debug!("Cache cleared ({} entries dropped)", dropped);
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etfdash_market_data::EtfSymbol;

    const BTC: Fingerprint = Fingerprint::Current(EtfSymbol::Btc);
    const ETH: Fingerprint = Fingerprint::Current(EtfSymbol::Eth);

    /// Push an entry's timestamp back as if it had been stored `by` ago.
    fn age_entry<V: Clone>(cache: &CacheStore<V>, key: &Fingerprint, by: Duration) {
        let mut entries = cache.lock_entries();
        if let Some(entry) = entries.get_mut(key) {
            entry.stored_at = Instant::now() - by;
        }
    }

    #[test]
    fn test_put_then_get_returns_value() {
        let cache = CacheStore::new(Duration::from_secs(300));
        cache.put(BTC, 42);
        assert_eq!(cache.get(&BTC), Some(42));
        assert_eq!(cache.get(&ETH), None);
    }

    #[test]
    fn test_expired_entry_only_available_as_stale() {
        let cache = CacheStore::new(Duration::from_secs(300));
        cache.put(BTC, "snapshot".to_string());

        age_entry(&cache, &BTC, Duration::from_secs(300));

        assert_eq!(cache.get(&BTC), None);
        assert_eq!(cache.get_stale(&BTC), Some("snapshot".to_string()));
    }

    #[test]
    fn test_entry_just_inside_ttl_is_fresh() {
        let cache = CacheStore::new(Duration::from_secs(300));
        cache.put(BTC, 1);
        age_entry(&cache, &BTC, Duration::from_secs(299));
        assert_eq!(cache.get(&BTC), Some(1));
    }

    #[test]
    fn test_put_overwrites_and_refreshes_timestamp() {
        let cache = CacheStore::new(Duration::from_secs(300));
        cache.put(BTC, 1);
        age_entry(&cache, &BTC, Duration::from_secs(600));
        assert_eq!(cache.get(&BTC), None);

        cache.put(BTC, 2);
        assert_eq!(cache.get(&BTC), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_drops_stale_entries_too() {
        let cache = CacheStore::new(Duration::from_secs(300));
        cache.put(BTC, 1);
        cache.put(ETH, 2);
        assert_eq!(cache.len(), 2);

        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.get_stale(&BTC), None);
    }
}
