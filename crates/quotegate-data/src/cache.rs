//! TTL cache.
//!
//! Freshness is decided at read time against a TTL supplied by the caller,
//! so one store type serves both the short-lived quote cache and the longer
//! lived history cache. Stale entries are never removed on their own; the
//! fallback paths depend on being able to read them.

use chrono::{DateTime, Utc};
use quotegate_core::traits::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::trace;

use crate::key::CacheKey;

/// Result of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// Written less than one TTL ago.
    Fresh(T),
    /// Present but older than the TTL.
    Stale(T),
    Miss,
}

impl<T> Lookup<T> {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Lookup::Fresh(_))
    }

    /// The payload only if it is fresh.
    pub fn fresh(self) -> Option<T> {
        match self {
            Lookup::Fresh(payload) => Some(payload),
            _ => None,
        }
    }

    /// The payload regardless of age.
    pub fn any(self) -> Option<T> {
        match self {
            Lookup::Fresh(payload) | Lookup::Stale(payload) => Some(payload),
            Lookup::Miss => None,
        }
    }
}

#[derive(Debug)]
struct CacheEntry<T> {
    payload: T,
    written_at: DateTime<Utc>,
    last_used: u64,
}

#[derive(Debug)]
struct Inner<T> {
    entries: HashMap<CacheKey, CacheEntry<T>>,
    tick: u64,
}

impl<T> Inner<T> {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn evict_least_recent(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = victim {
            trace!(key = %key, "evicting least recently used cache entry");
            self.entries.remove(&key);
        }
    }
}

/// Thread-safe key → (payload, write time) store.
///
/// Every `get` and `set` is atomic on its own; nothing is held across an
/// await point by callers, and there is no cross-key atomicity.
pub struct CacheStore<T> {
    inner: Mutex<Inner<T>>,
    clock: Arc<dyn Clock>,
    /// Maximum number of entries (0 = unlimited)
    max_entries: usize,
}

impl<T: Clone> CacheStore<T> {
    /// Create an unbounded store.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_capacity(clock, 0)
    }

    /// Create a store holding at most `max_entries` keys.
    /// When full, writing a new key evicts the least recently used one.
    pub fn with_capacity(clock: Arc<dyn Clock>, max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                tick: 0,
            }),
            clock,
            max_entries,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Read an entry and classify it against `ttl`.
    pub fn get(&self, key: &CacheKey, ttl: Duration) -> Lookup<T> {
        let now = self.clock.now();
        let mut inner = self.lock();
        let tick = inner.next_tick();

        match inner.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used = tick;
                let age = (now - entry.written_at).to_std().unwrap_or_default();
                if age < ttl {
                    Lookup::Fresh(entry.payload.clone())
                } else {
                    Lookup::Stale(entry.payload.clone())
                }
            }
            None => Lookup::Miss,
        }
    }

    /// Store a payload, replacing any previous entry for the key.
    pub fn set(&self, key: CacheKey, payload: T) {
        let now = self.clock.now();
        let mut inner = self.lock();
        let tick = inner.next_tick();

        let written_at = match inner.entries.get(&key) {
            // write times never go backwards for a key
            Some(previous) => now.max(previous.written_at),
            None => {
                if self.max_entries > 0 && inner.entries.len() >= self.max_entries {
                    inner.evict_least_recent();
                }
                now
            }
        };

        inner.entries.insert(
            key,
            CacheEntry {
                payload,
                written_at,
                last_used: tick,
            },
        );
    }

    /// When the entry for `key` was last written.
    pub fn written_at(&self, key: &CacheKey) -> Option<DateTime<Utc>> {
        self.lock().entries.get(key).map(|e| e.written_at)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use quotegate_core::traits::ManualClock;
    use quotegate_core::types::HistoryInterval;

    const TTL: Duration = Duration::from_secs(30);

    fn setup(capacity: usize) -> (Arc<ManualClock>, CacheStore<f64>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        ));
        let store = CacheStore::with_capacity(clock.clone(), capacity);
        (clock, store)
    }

    fn key(ticker: &str) -> CacheKey {
        CacheKey::price(ticker, "USD")
    }

    #[test]
    fn test_miss_on_empty_store() {
        let (_, store) = setup(0);
        assert_eq!(store.get(&key("BTCUSDT"), TTL), Lookup::Miss);
        assert!(store.is_empty());
    }

    #[test]
    fn test_fresh_until_ttl_then_stale() {
        let (clock, store) = setup(0);
        store.set(key("BTCUSDT"), 88000.0);

        clock.advance(chrono::Duration::seconds(29));
        assert_eq!(store.get(&key("BTCUSDT"), TTL), Lookup::Fresh(88000.0));

        clock.advance(chrono::Duration::seconds(1));
        assert_eq!(store.get(&key("BTCUSDT"), TTL), Lookup::Stale(88000.0));

        // stale entries stay readable indefinitely
        clock.advance(chrono::Duration::days(30));
        assert_eq!(store.get(&key("BTCUSDT"), TTL).any(), Some(88000.0));
    }

    #[test]
    fn test_same_entry_different_ttls() {
        let (clock, store) = setup(0);
        store.set(key("ETHUSDT"), 3000.0);
        clock.advance(chrono::Duration::seconds(60));

        assert!(!store.get(&key("ETHUSDT"), TTL).is_fresh());
        assert!(store.get(&key("ETHUSDT"), Duration::from_secs(600)).is_fresh());
    }

    #[test]
    fn test_set_overwrites_and_refreshes() {
        let (clock, store) = setup(0);
        store.set(key("BTCUSDT"), 1.0);
        clock.advance(chrono::Duration::seconds(45));
        store.set(key("BTCUSDT"), 2.0);

        assert_eq!(store.get(&key("BTCUSDT"), TTL), Lookup::Fresh(2.0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_written_at_never_goes_backwards() {
        let (clock, store) = setup(0);
        let start = clock.now();
        store.set(key("BTCUSDT"), 1.0);

        clock.set(start - chrono::Duration::seconds(10));
        store.set(key("BTCUSDT"), 2.0);

        assert_eq!(store.written_at(&key("BTCUSDT")), Some(start));
        assert_eq!(store.get(&key("BTCUSDT"), TTL).fresh(), Some(2.0));
    }

    #[test]
    fn test_bounded_store_evicts_least_recently_used() {
        let (_, store) = setup(2);
        store.set(key("BTCUSDT"), 1.0);
        store.set(key("ETHUSDT"), 2.0);

        // touch BTC so ETH becomes the eviction candidate
        assert!(store.get(&key("BTCUSDT"), TTL).is_fresh());
        store.set(key("SOLUSDT"), 3.0);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&key("ETHUSDT"), TTL), Lookup::Miss);
        assert_eq!(store.get(&key("BTCUSDT"), TTL).any(), Some(1.0));
        assert_eq!(store.get(&key("SOLUSDT"), TTL).any(), Some(3.0));
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict() {
        let (_, store) = setup(1);
        store.set(key("BTCUSDT"), 1.0);
        store.set(key("BTCUSDT"), 2.0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&key("BTCUSDT"), TTL).any(), Some(2.0));
    }

    #[test]
    fn test_unbounded_store_grows() {
        let (_, store) = setup(0);
        for days in 1..=50 {
            store.set(CacheKey::history("BTCUSDT", days, HistoryInterval::Hourly), days as f64);
        }
        assert_eq!(store.len(), 50);
    }
}
