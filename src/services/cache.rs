use std::{
    collections::{BTreeMap, HashMap},
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

/// Tutor answers are expensive to regenerate and rarely change.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7);
pub const DEFAULT_MAX_ITEMS: usize = 500;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
    seq: u64,
}

#[derive(Debug)]
struct CacheInner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// Insertion sequence -> key. Lowest sequence is the oldest insert.
    order: BTreeMap<u64, String>,
    next_seq: u64,
}

/// Best-effort, process-local TTL cache.
///
/// Eviction is by insertion order once the store grows past `max_items`;
/// reads never refresh an entry's position, so this is not an LRU.
/// Overwriting a live key keeps its original insertion position.
#[derive(Debug)]
pub struct TtlCache<V> {
    inner: Mutex<CacheInner<V>>,
    default_ttl: Duration,
    max_items: usize,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(default_ttl: Duration, max_items: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                order: BTreeMap::new(),
                next_seq: 0,
            }),
            default_ttl,
            max_items,
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_at(key, value, self.default_ttl, Instant::now());
    }

    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.set_at(key, value, ttl, Instant::now());
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut inner = self.lock();
        inner.prune_expired(now);
        inner
            .entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone())
    }

    fn set_at(&self, key: impl Into<String>, value: V, ttl: Duration, now: Instant) {
        let key = key.into();
        let mut inner = self.lock();
        inner.prune_expired(now);

        let expires_at = now + ttl;
        if let Some(entry) = inner.entries.get_mut(&key) {
            entry.value = value;
            entry.expires_at = expires_at;
        } else {
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner.order.insert(seq, key.clone());
            inner.entries.insert(
                key,
                CacheEntry {
                    value,
                    expires_at,
                    seq,
                },
            );
        }

        while inner.entries.len() > self.max_items {
            let Some((_, oldest)) = inner.order.pop_first() else {
                break;
            };
            inner.entries.remove(&oldest);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheInner<V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V> CacheInner<V> {
    fn prune_expired(&mut self, now: Instant) {
        let expired: Vec<(String, u64)> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.expires_at <= now)
            .map(|(key, entry)| (key.clone(), entry.seq))
            .collect();

        for (key, seq) in expired {
            self.entries.remove(&key);
            self.order.remove(&seq);
        }
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_MAX_ITEMS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_value() {
        let cache = TtlCache::new(Duration::from_secs(60), 10);
        cache.set("k", "v".to_string());

        assert_eq!(cache.get("k"), Some("v".to_string()));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn entry_is_absent_once_ttl_elapses() {
        let cache = TtlCache::new(Duration::from_secs(60), 10);
        let start = Instant::now();
        cache.set_at("k", 1, Duration::from_secs(30), start);

        assert_eq!(cache.get_at("k", start + Duration::from_secs(29)), Some(1));
        assert_eq!(cache.get_at("k", start + Duration::from_secs(30)), None);
        assert!(cache.is_empty(), "expired entry should be purged on read");
    }

    #[test]
    fn overflow_evicts_oldest_inserted_entries() {
        let cache = TtlCache::new(Duration::from_secs(60), 3);
        for i in 0..5 {
            cache.set(format!("k{i}"), i);
        }

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("k0"), None);
        assert_eq!(cache.get("k1"), None);
        assert_eq!(cache.get("k2"), Some(2));
        assert_eq!(cache.get("k4"), Some(4));
    }

    #[test]
    fn reads_do_not_promote_entries() {
        let cache = TtlCache::new(Duration::from_secs(60), 2);
        cache.set("a", 1);
        cache.set("b", 2);
        assert_eq!(cache.get("a"), Some(1));

        cache.set("c", 3);

        assert_eq!(cache.get("a"), None, "insertion order, not access order");
        assert_eq!(cache.get("b"), Some(2));
    }

    #[test]
    fn overwrite_keeps_original_insertion_position() {
        let cache = TtlCache::new(Duration::from_secs(60), 2);
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("a", 10);

        cache.set("c", 3);

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn expired_entries_are_pruned_before_size_eviction() {
        let cache = TtlCache::new(Duration::from_secs(60), 2);
        let start = Instant::now();
        cache.set_at("short", 1, Duration::from_secs(1), start);
        cache.set_at("long", 2, Duration::from_secs(100), start);

        cache.set_at("new", 3, Duration::from_secs(100), start + Duration::from_secs(5));

        let later = start + Duration::from_secs(6);
        assert_eq!(cache.get_at("long", later), Some(2));
        assert_eq!(cache.get_at("new", later), Some(3));
    }

    #[test]
    fn per_entry_ttl_overrides_default() {
        let cache = TtlCache::new(Duration::from_secs(3600), 10);
        let start = Instant::now();
        cache.set_at("small-talk", "hi", Duration::from_secs(1800), start);
        cache.set_at("answer", "long", cache.default_ttl, start);

        let after_hour = start + Duration::from_secs(3599);
        assert_eq!(cache.get_at("small-talk", after_hour), None);
        assert_eq!(cache.get_at("answer", after_hour), Some("long"));
    }
}
