//! Coordinator implementation
//!
//! Session lifecycle per key:
//!
//! ```text
//! NoSession --cache hit--> Served
//! NoSession --> Fetching --complete--> Served   (cache written first)
//!                        --error----> Failed    (nothing cached)
//!                        --no consumers--> Cancelled
//! ```

use std::{fmt, sync::Arc};

use dashmap::{DashMap, mapref::entry::Entry};
use tokio::runtime::Handle;

use super::session;
use crate::{
    cache::{CacheKey, DocumentCache, DocumentStore, KeyNormalizer, Lookup},
    config::{CoordinatorConfig, Validator},
    dispatch::{DispatchQueue, NodeStream},
    error::{self, Result},
    jsonpath::PathPattern,
    telemetry::{CacheStatsSnapshot, PipelineStats, PipelineStatsSnapshot},
    transport::{Connector, StreamRequest},
};

pub(super) struct Shared {
    pub(super) config: CoordinatorConfig,
    pub(super) target: PathPattern,
    pub(super) center: PathPattern,
    pub(super) cache: DocumentCache,
    pub(super) connector: Arc<dyn Connector>,
    pub(super) normalizer: Arc<dyn KeyNormalizer>,
    /// In-flight sessions; the entry API makes check-and-attach atomic
    pub(super) sessions: DashMap<CacheKey, Arc<DispatchQueue>>,
    pub(super) stats: Arc<PipelineStats>,
}

/// Entry point for streaming mind maps
///
/// Cheap to clone; clones share the cache, the session registry and the
/// statistics.
#[derive(Clone)]
pub struct Coordinator {
    shared: Arc<Shared>,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("config", &self.shared.config)
            .field("in_flight", &self.shared.sessions.len())
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    /// Build a coordinator from its collaborators
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation.
    pub fn new(
        config: CoordinatorConfig,
        store: Arc<dyn DocumentStore>,
        connector: Arc<dyn Connector>,
        normalizer: Arc<dyn KeyNormalizer>,
    ) -> Result<Self> {
        config.validate()?;
        let (target, center) = config.patterns()?;
        let cache = DocumentCache::new(store, config.recent_capacity);
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                target,
                center,
                cache,
                connector,
                normalizer,
                sessions: DashMap::new(),
                stats: Arc::new(PipelineStats::new()),
            }),
        })
    }

    /// Open the record sequence for `query`
    ///
    /// A cached document is replayed without touching the transport. A
    /// session already fetching the same key is joined. Otherwise a new
    /// session is spawned on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// - `InvalidQuery` if the query normalizes to an empty key
    /// - `Runtime` if a session is needed but no tokio runtime is running
    pub fn open(&self, query: &str) -> Result<NodeStream> {
        let key = self.shared.normalizer.normalize(query);
        if key.is_empty() {
            return Err(error::invalid_query("query is empty"));
        }

        if let Some(stream) = self.attach(&key) {
            return Ok(stream);
        }

        match self.shared.cache.lookup(&key) {
            Lookup::Hit(entry) => {
                self.shared.stats.record_cache_hit();
                tracing::debug!(
                    target: "mindstream::coordinator",
                    key = %key,
                    nodes = entry.document.nodes.len(),
                    "cache hit"
                );
                return Ok(NodeStream::from_document(key, entry.document));
            }
            Lookup::Corrupted => {
                self.shared.stats.record_cache_corruption();
                self.shared.stats.record_cache_miss();
            }
            Lookup::Miss => self.shared.stats.record_cache_miss(),
        }

        let runtime = Handle::try_current().map_err(|e| error::runtime(e).with_key(key.as_str()))?;

        let (stream, queue) = match self.shared.sessions.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                if let Some(stream) = occupied.get().try_attach() {
                    self.shared.stats.record_session_attached();
                    return Ok(stream);
                }
                // the registered session is being cancelled; replace it
                let queue = DispatchQueue::new(key.clone(), self.shared.config.initial_buffer_capacity);
                let stream = queue.attach();
                occupied.insert(Arc::clone(&queue));
                (stream, queue)
            }
            Entry::Vacant(vacant) => {
                let queue = DispatchQueue::new(key.clone(), self.shared.config.initial_buffer_capacity);
                let stream = queue.attach();
                vacant.insert(Arc::clone(&queue));
                (stream, queue)
            }
        };

        self.shared.stats.record_session_started();
        tracing::info!(target: "mindstream::coordinator", key = %key, "session opened");
        let request = StreamRequest::new(query.trim(), key);
        runtime.spawn(session::run(Arc::clone(&self.shared), request, queue));
        Ok(stream)
    }

    /// Up to `limit` distinct keys of completed sessions, most recent first
    ///
    /// # Errors
    ///
    /// Returns a store error if the recent index cannot be read.
    pub fn recent_keys(&self, limit: usize) -> Result<Vec<CacheKey>> {
        self.shared.cache.recent_keys(limit)
    }

    /// Number of sessions currently fetching
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.shared.sessions.len()
    }

    /// Whether a session for `query`'s key is currently fetching
    #[must_use]
    pub fn is_in_flight(&self, query: &str) -> bool {
        let key = self.shared.normalizer.normalize(query);
        self.shared.sessions.contains_key(&key)
    }

    /// Cache key `query` maps to
    #[must_use]
    pub fn key_for(&self, query: &str) -> CacheKey {
        self.shared.normalizer.normalize(query)
    }

    /// Drop the cached document for `query`, if any
    ///
    /// # Errors
    ///
    /// Returns a store error when the backing storage fails.
    pub fn invalidate(&self, query: &str) -> Result<bool> {
        self.shared.cache.invalidate(&self.key_for(query))
    }

    #[must_use]
    pub fn stats(&self) -> PipelineStatsSnapshot {
        self.shared.stats.snapshot()
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        self.shared.cache.stats().snapshot()
    }

    #[must_use]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.shared.config
    }

    fn attach(&self, key: &CacheKey) -> Option<NodeStream> {
        let queue = self.shared.sessions.get(key).map(|entry| Arc::clone(entry.value()))?;
        let stream = queue.try_attach()?;
        self.shared.stats.record_session_attached();
        tracing::debug!(target: "mindstream::coordinator", key = %key, "attached to in-flight session");
        Some(stream)
    }
}
