//! Persisted cache entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cache_key::CacheKey;
use crate::record::MindMapDocument;

/// A finished document stored under its normalized query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub key: CacheKey,
    pub document: MindMapDocument,
    /// Name of the model that produced the document, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    #[must_use]
    pub fn new(key: CacheKey, document: MindMapDocument, model: Option<String>) -> Self {
        Self {
            key,
            document,
            model,
            created_at: Utc::now(),
        }
    }
}
