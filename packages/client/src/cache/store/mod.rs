//! Persistent storage behind the document cache
//!
//! Stores deal in encoded bytes; decoding (and treating undecodable bytes as
//! corruption) is the cache's job, so a store never needs to understand the
//! document format.

mod file;
mod memory;

use bytes::Bytes;

pub use file::FileStore;
pub use memory::MemoryStore;

use super::cache_key::CacheKey;
use crate::error::Result;

/// Key-value storage for encoded cache entries plus a recent-keys index
pub trait DocumentStore: Send + Sync + 'static {
    /// Encoded entry for `key`, if present
    ///
    /// # Errors
    ///
    /// Returns a store error when the backing storage cannot be read.
    fn load(&self, key: &CacheKey) -> Result<Option<Bytes>>;

    /// Insert or replace the entry for `key`
    ///
    /// # Errors
    ///
    /// Returns a store error when the backing storage cannot be written.
    fn save(&self, key: &CacheKey, encoded: Bytes) -> Result<()>;

    /// Remove the entry for `key`; returns whether one existed
    ///
    /// # Errors
    ///
    /// Returns a store error when the backing storage cannot be written.
    fn evict(&self, key: &CacheKey) -> Result<bool>;

    /// Move `key` to the front of the recent index, keeping at most `capacity` keys
    ///
    /// # Errors
    ///
    /// Returns a store error when the index cannot be updated.
    fn touch_recent(&self, key: &CacheKey, capacity: usize) -> Result<()>;

    /// Up to `limit` distinct keys, most recently touched first
    ///
    /// # Errors
    ///
    /// Returns a store error when the index cannot be read.
    fn recent_keys(&self, limit: usize) -> Result<Vec<CacheKey>>;
}

/// Shared recent-index update: move to front, dedupe, truncate
pub(crate) fn push_recent(recent: &mut Vec<CacheKey>, key: &CacheKey, capacity: usize) {
    recent.retain(|existing| existing != key);
    recent.insert(0, key.clone());
    recent.truncate(capacity);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_recent_moves_existing_key_to_front() {
        let a = CacheKey::from_normalized("a");
        let b = CacheKey::from_normalized("b");
        let c = CacheKey::from_normalized("c");
        let mut recent = Vec::new();
        push_recent(&mut recent, &a, 2);
        push_recent(&mut recent, &b, 2);
        push_recent(&mut recent, &a, 2);
        assert_eq!(recent, vec![a.clone(), b.clone()]);
        push_recent(&mut recent, &c, 2);
        assert_eq!(recent, vec![c, a]);
    }
}
