//! Persistent cache of finished documents
//!
//! - [`CacheKey`] and [`KeyNormalizer`]: which queries share an entry
//! - [`DocumentStore`]: storage backends ([`MemoryStore`], [`FileStore`])
//! - [`DocumentCache`]: typed lookups with corruption recovery

pub mod cache_entry;
pub mod cache_key;
pub mod document_cache;
pub mod store;

pub use cache_entry::CacheEntry;
pub use cache_key::{CacheKey, DefaultKeyNormalizer, KeyNormalizer};
pub use document_cache::{DocumentCache, Lookup};
pub use store::{DocumentStore, FileStore, MemoryStore};
