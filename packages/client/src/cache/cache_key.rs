//! Cache key normalization
//!
//! Queries that differ only in case or whitespace share one cache entry and
//! one in-flight session.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized form of a query string
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Wrap an already normalized key
    ///
    /// Keys read back from a store are trusted as-is; use a
    /// [`KeyNormalizer`] for raw query text.
    #[inline]
    #[must_use]
    pub fn from_normalized(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stable hex digest, used where the key must become a file name
    #[must_use]
    pub fn digest(&self) -> String {
        let digest = ring::digest::digest(&ring::digest::SHA256, self.0.as_bytes());
        hex::encode(digest.as_ref())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Maps raw query text to its cache key
pub trait KeyNormalizer: Send + Sync + 'static {
    fn normalize(&self, query: &str) -> CacheKey;
}

/// Lower-cases, trims and collapses whitespace runs to one separator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultKeyNormalizer {
    separator: char,
}

impl Default for DefaultKeyNormalizer {
    fn default() -> Self {
        Self { separator: ' ' }
    }
}

impl DefaultKeyNormalizer {
    #[must_use]
    pub fn with_separator(separator: char) -> Self {
        Self { separator }
    }
}

impl KeyNormalizer for DefaultKeyNormalizer {
    fn normalize(&self, query: &str) -> CacheKey {
        let mut key = String::with_capacity(query.len());
        for word in query.split_whitespace() {
            if !key.is_empty() {
                key.push(self.separator);
            }
            key.extend(word.chars().flat_map(char::to_lowercase));
        }
        CacheKey(key)
    }
}

impl<F> KeyNormalizer for F
where
    F: Fn(&str) -> CacheKey + Send + Sync + 'static,
{
    fn normalize(&self, query: &str) -> CacheKey {
        self(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_normalization() {
        let normalizer = DefaultKeyNormalizer::default();
        assert_eq!(
            normalizer.normalize("  Deep \t  Work\n").as_str(),
            "deep work"
        );
        assert_eq!(normalizer.normalize("无聊").as_str(), "无聊");
        assert_eq!(
            normalizer.normalize("Flow State"),
            normalizer.normalize("flow   state")
        );
    }

    #[test]
    fn test_custom_separator() {
        let normalizer = DefaultKeyNormalizer::with_separator('-');
        assert_eq!(normalizer.normalize("Flow  State").as_str(), "flow-state");
    }

    #[test]
    fn test_digest_is_stable_and_file_safe() {
        let key = CacheKey::from_normalized("deep work");
        let digest = key.digest();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, CacheKey::from_normalized("deep work").digest());
    }
}
