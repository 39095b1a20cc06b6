//! In-process store backed by a lock-free skiplist

use std::sync::{Mutex, PoisonError};

use bytes::Bytes;
use crossbeam_skiplist::SkipMap;

use super::{DocumentStore, push_recent};
use crate::{cache::cache_key::CacheKey, error::Result};

/// Volatile store; entries live as long as the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: SkipMap<CacheKey, Bytes>,
    recent: Mutex<Vec<CacheKey>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, key: &CacheKey) -> Result<Option<Bytes>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn save(&self, key: &CacheKey, encoded: Bytes) -> Result<()> {
        self.entries.insert(key.clone(), encoded);
        Ok(())
    }

    fn evict(&self, key: &CacheKey) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn touch_recent(&self, key: &CacheKey, capacity: usize) -> Result<()> {
        let mut recent = self.recent.lock().unwrap_or_else(PoisonError::into_inner);
        push_recent(&mut recent, key, capacity);
        Ok(())
    }

    fn recent_keys(&self, limit: usize) -> Result<Vec<CacheKey>> {
        let recent = self.recent.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(recent.iter().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_evict() {
        let store = MemoryStore::new();
        let key = CacheKey::from_normalized("k");
        assert!(store.load(&key).unwrap().is_none());
        store.save(&key, Bytes::from_static(b"{}")).unwrap();
        assert_eq!(store.load(&key).unwrap().unwrap(), Bytes::from_static(b"{}"));
        assert!(store.evict(&key).unwrap());
        assert!(!store.evict(&key).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_recent_keys_limit() {
        let store = MemoryStore::new();
        for name in ["a", "b", "c"] {
            store
                .touch_recent(&CacheKey::from_normalized(name), 10)
                .unwrap();
        }
        let recent = store.recent_keys(2).unwrap();
        assert_eq!(
            recent,
            vec![CacheKey::from_normalized("c"), CacheKey::from_normalized("b")]
        );
    }
}
