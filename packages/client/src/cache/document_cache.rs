//! Document cache over a [`DocumentStore`]
//!
//! Entries that fail to decode are evicted on read and reported as misses,
//! so a corrupted entry is repaired by the next completed session.

use std::sync::Arc;

use bytes::Bytes;

use super::{cache_entry::CacheEntry, cache_key::CacheKey, store::DocumentStore};
use crate::{
    error::{self, Result},
    telemetry::CacheStats,
};

/// Typed cache of finished documents
pub struct DocumentCache {
    store: Arc<dyn DocumentStore>,
    recent_capacity: usize,
    stats: CacheStats,
}

impl std::fmt::Debug for DocumentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentCache")
            .field("recent_capacity", &self.recent_capacity)
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}

/// Result of a cache lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Hit(CacheEntry),
    Miss,
    /// An entry existed but could not be decoded; it has been evicted
    Corrupted,
}

impl DocumentCache {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, recent_capacity: usize) -> Self {
        Self {
            store,
            recent_capacity,
            stats: CacheStats::new(),
        }
    }

    /// Look up the entry for `key`
    ///
    /// Storage read failures are logged and treated as misses; they never
    /// prevent a fresh session from being opened.
    pub fn lookup(&self, key: &CacheKey) -> Lookup {
        let encoded = match self.store.load(key) {
            Ok(Some(encoded)) => encoded,
            Ok(None) => {
                self.stats.record_miss();
                return Lookup::Miss;
            }
            Err(e) => {
                self.stats.record_store_error();
                self.stats.record_miss();
                tracing::warn!(target: "mindstream::cache", key = %key, error = %e, "cache read failed");
                return Lookup::Miss;
            }
        };

        match Self::decode(key, &encoded) {
            Ok(entry) => {
                self.stats.record_hit();
                Lookup::Hit(entry)
            }
            Err(e) => {
                self.stats.record_corruption();
                self.stats.record_miss();
                tracing::warn!(
                    target: "mindstream::cache",
                    key = %key,
                    error = %e,
                    "evicting corrupted cache entry"
                );
                if let Err(e) = self.store.evict(key) {
                    self.stats.record_store_error();
                    tracing::warn!(target: "mindstream::cache", key = %key, error = %e, "eviction failed");
                }
                Lookup::Corrupted
            }
        }
    }

    /// Persist a finished document and mark its key as recent
    ///
    /// # Errors
    ///
    /// Returns a store error if the entry cannot be encoded or written.
    pub fn insert(&self, entry: &CacheEntry) -> Result<()> {
        let encoded = serde_json::to_vec(entry).map_err(error::store)?;
        let result = self
            .store
            .save(&entry.key, Bytes::from(encoded))
            .and_then(|()| self.store.touch_recent(&entry.key, self.recent_capacity));
        match &result {
            Ok(()) => self.stats.record_write(),
            Err(_) => self.stats.record_store_error(),
        }
        result
    }

    /// Remove the entry for `key`
    ///
    /// # Errors
    ///
    /// Returns a store error when the backing storage fails.
    pub fn invalidate(&self, key: &CacheKey) -> Result<bool> {
        self.store.evict(key)
    }

    /// Up to `limit` distinct keys, most recent first
    ///
    /// # Errors
    ///
    /// Returns a store error when the index cannot be read.
    pub fn recent_keys(&self, limit: usize) -> Result<Vec<CacheKey>> {
        self.store.recent_keys(limit)
    }

    #[inline]
    #[must_use]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    fn decode(key: &CacheKey, encoded: &[u8]) -> Result<CacheEntry> {
        let entry: CacheEntry = serde_json::from_slice(encoded).map_err(|e| {
            error::cache_corruption(e).with_key(key.as_str())
        })?;
        if entry.key != *key {
            return Err(error::cache_corruption(format!(
                "entry key {:?} does not match lookup key",
                entry.key.as_str()
            ))
            .with_key(key.as_str()));
        }
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::store::MemoryStore,
        record::{MapNode, MindMapDocument},
    };

    fn document() -> MindMapDocument {
        MindMapDocument::new(
            "flow",
            vec![MapNode {
                node_name: "A".into(),
                connection: "c".into(),
                insight: "i".into(),
                exploration_methods: vec![],
                references: vec!["r".into()],
            }],
        )
    }

    #[test]
    fn test_round_trip_and_recent_index() {
        let store = Arc::new(MemoryStore::new());
        let cache = DocumentCache::new(store, 10);
        let key = CacheKey::from_normalized("flow");
        assert_eq!(cache.lookup(&key), Lookup::Miss);

        let entry = CacheEntry::new(key.clone(), document(), Some("deepseek".into()));
        cache.insert(&entry).unwrap();
        assert_eq!(cache.lookup(&key), Lookup::Hit(entry));
        assert_eq!(cache.recent_keys(5).unwrap(), vec![key]);

        let stats = cache.stats().snapshot();
        assert_eq!((stats.hits, stats.misses, stats.writes), (1, 1, 1));
    }

    #[test]
    fn test_corrupted_entry_is_evicted() {
        let store = Arc::new(MemoryStore::new());
        let key = CacheKey::from_normalized("flow");
        store.save(&key, Bytes::from_static(b"{\"key\":\"flow\",\"docu")).unwrap();

        let cache = DocumentCache::new(store.clone(), 10);
        assert_eq!(cache.lookup(&key), Lookup::Corrupted);
        assert!(store.load(&key).unwrap().is_none());
        assert_eq!(cache.lookup(&key), Lookup::Miss);
        assert_eq!(cache.stats().snapshot().corruptions, 1);
    }

    #[test]
    fn test_entry_under_wrong_key_is_corruption() {
        let store = Arc::new(MemoryStore::new());
        let cache = DocumentCache::new(store.clone(), 10);
        let other = CacheEntry::new(CacheKey::from_normalized("other"), document(), None);
        let key = CacheKey::from_normalized("flow");
        store
            .save(&key, Bytes::from(serde_json::to_vec(&other).unwrap()))
            .unwrap();
        assert_eq!(cache.lookup(&key), Lookup::Corrupted);
    }
}
