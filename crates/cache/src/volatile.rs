//! In-process volatile cache tier backed by DashMap. Entries are scoped to
//! one logical session and discarded with it; nothing here outlives the
//! process.

use adforge_core::types::{CacheEntry, CompositeKey};
use dashmap::DashMap;
use std::sync::Arc;

/// Session-scoped exact-match cache over composite keys.
pub struct SessionCache {
    store: Arc<DashMap<CompositeKey, CacheEntry>>,
    max_entries: usize,
}

impl SessionCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: Arc::new(DashMap::with_capacity(max_entries.min(1024))),
            max_entries,
        }
    }

    pub fn get(&self, key: &CompositeKey) -> Option<CacheEntry> {
        self.store.get(key).map(|entry| entry.clone())
    }

    /// Insert or update an entry. If the cache is at capacity and the key
    /// is new, the insert is skipped.
    pub fn put(&self, key: CompositeKey, entry: CacheEntry) {
        if self.store.len() >= self.max_entries && !self.store.contains_key(&key) {
            return;
        }
        self.store.insert(key, entry);
    }

    /// Discard every entry. Used when the owning session ends.
    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adforge_core::types::{Provenance, Purpose};
    use chrono::Utc;

    fn entry(value: &str) -> CacheEntry {
        CacheEntry {
            value: value.to_string(),
            provenance: Provenance::FreshlyGenerated,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_put_get_and_clear() {
        let cache = SessionCache::new(16);
        let key = CompositeKey::new("EcoTech", Purpose::Research);

        assert!(cache.get(&key).is_none());
        cache.put(key.clone(), entry("report"));
        assert_eq!(cache.get(&key).map(|e| e.value), Some("report".to_string()));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_skips_new_keys_but_updates_existing() {
        let cache = SessionCache::new(1);
        let first = CompositeKey::new("A", Purpose::Research);
        let second = CompositeKey::new("B", Purpose::Research);

        cache.put(first.clone(), entry("one"));
        cache.put(second.clone(), entry("two"));
        assert!(cache.get(&second).is_none());

        cache.put(first.clone(), entry("updated"));
        assert_eq!(cache.get(&first).map(|e| e.value), Some("updated".to_string()));
    }

    #[test]
    fn test_same_subject_different_purpose_is_a_distinct_key() {
        let cache = SessionCache::new(16);
        cache.put(CompositeKey::new("EcoTech", Purpose::Research), entry("r"));

        let marketing = CompositeKey::new("EcoTech", Purpose::CampaignIdeas);
        assert!(cache.get(&marketing).is_none());
    }
}
