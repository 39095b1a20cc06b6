//! Transport event and request types

use crate::cache::CacheKey;

/// One event from a server-push source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A substring of the generated document
    Chunk(String),
    /// No further chunks will arrive
    Complete,
    /// Upstream failure with an optional diagnostic
    Error(Option<String>),
}

impl TransportEvent {
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransportEvent::Chunk(_))
    }
}

/// What a connector is asked to stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRequest {
    /// Query text as the caller supplied it
    pub query: String,
    /// Normalized key the session is registered under
    pub key: CacheKey,
}

impl StreamRequest {
    #[must_use]
    pub fn new(query: impl Into<String>, key: CacheKey) -> Self {
        Self {
            query: query.into(),
            key,
        }
    }
}
