//! Core `MindMapBuilder` structure and pipeline settings
//!
//! The builder is typestated on its connector: `build` only exists once a
//! transport has been chosen.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub use mindstream_client::{
    CompletenessPolicy, Connector, Coordinator, CoordinatorConfig, DefaultKeyNormalizer, DocumentStore,
    FileStore, KeyNormalizer, MemoryStore, Result,
};

/// State marker: no transport chosen yet
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectorNotSet;

/// State marker: transport chosen
#[derive(Clone)]
pub struct ConnectorSet(pub(crate) Arc<dyn Connector>);

impl fmt::Debug for ConnectorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectorSet").finish_non_exhaustive()
    }
}

/// Where completed documents are kept
#[derive(Clone)]
pub(crate) enum StoreChoice {
    Memory,
    Directory(PathBuf),
    Custom(Arc<dyn DocumentStore>),
}

/// Fluent builder for a [`Coordinator`]
pub struct MindMapBuilder<S = ConnectorNotSet> {
    pub(crate) config: CoordinatorConfig,
    pub(crate) store: StoreChoice,
    pub(crate) normalizer: Arc<dyn KeyNormalizer>,
    pub(crate) state: S,
}

impl<S: fmt::Debug> fmt::Debug for MindMapBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = match &self.store {
            StoreChoice::Memory => "memory".to_owned(),
            StoreChoice::Directory(path) => path.display().to_string(),
            StoreChoice::Custom(_) => "custom".to_owned(),
        };
        f.debug_struct("MindMapBuilder")
            .field("config", &self.config)
            .field("store", &store)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Default for MindMapBuilder<ConnectorNotSet> {
    fn default() -> Self {
        Self::new()
    }
}

impl MindMapBuilder<ConnectorNotSet> {
    /// Builder with default paths, lenient completeness and an in-memory store
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: CoordinatorConfig::default(),
            store: StoreChoice::Memory,
            normalizer: Arc::new(DefaultKeyNormalizer::default()),
            state: ConnectorNotSet,
        }
    }
}

impl<S> MindMapBuilder<S> {
    /// Path pattern selecting node records, `$.nodes[*]` by default
    #[must_use]
    pub fn target_path(mut self, path: impl Into<String>) -> Self {
        self.config = self.config.with_target_path(path);
        self
    }

    /// Path pattern selecting the center label, `$.centerNode` by default
    #[must_use]
    pub fn center_path(mut self, path: impl Into<String>) -> Self {
        self.config = self.config.with_center_path(path);
        self
    }

    #[must_use]
    pub fn completeness(mut self, policy: CompletenessPolicy) -> Self {
        self.config = self.config.with_completeness(policy);
        self
    }

    /// Require `explorationMethods` on every node
    #[must_use]
    pub fn strict(self) -> Self {
        self.completeness(CompletenessPolicy::strict())
    }

    #[must_use]
    pub fn recent_capacity(mut self, capacity: usize) -> Self {
        self.config = self.config.with_recent_capacity(capacity);
        self
    }

    #[must_use]
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config = self.config.with_initial_buffer_capacity(capacity);
        self
    }

    /// Replace the whole pipeline configuration
    #[must_use]
    pub fn config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Persist documents as files under `root`
    #[must_use]
    pub fn cache_dir(mut self, root: impl Into<PathBuf>) -> Self {
        self.store = StoreChoice::Directory(root.into());
        self
    }

    #[must_use]
    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = StoreChoice::Custom(store);
        self
    }

    /// Query-to-key mapping; any `Fn(&str) -> CacheKey` works
    #[must_use]
    pub fn normalizer(mut self, normalizer: impl KeyNormalizer + 'static) -> Self {
        self.normalizer = Arc::new(normalizer);
        self
    }

    pub(crate) fn with_state<T>(self, state: T) -> MindMapBuilder<T> {
        MindMapBuilder {
            config: self.config,
            store: self.store,
            normalizer: self.normalizer,
            state,
        }
    }
}

impl MindMapBuilder<ConnectorSet> {
    /// Validate the configuration and build the coordinator
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid paths or capacities, or a
    /// store error if the cache directory cannot be created.
    pub fn build(self) -> Result<Coordinator> {
        let store: Arc<dyn DocumentStore> = match self.store {
            StoreChoice::Memory => Arc::new(MemoryStore::new()),
            StoreChoice::Directory(root) => Arc::new(FileStore::open(root)?),
            StoreChoice::Custom(store) => store,
        };
        tracing::debug!(
            target: "mindstream::builder",
            target_path = %self.config.target_path,
            center_path = %self.config.center_path,
            "building coordinator"
        );
        Coordinator::new(self.config, store, self.state.0, self.normalizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_flow_into_config() {
        let builder = MindMapBuilder::new()
            .target_path("$.items[*]")
            .center_path("$.title")
            .strict()
            .recent_capacity(7)
            .buffer_capacity(4);
        assert_eq!(builder.config.target_path, "$.items[*]");
        assert_eq!(builder.config.center_path, "$.title");
        assert!(builder.config.completeness.require_exploration_methods);
        assert_eq!(builder.config.recent_capacity, 7);
        assert_eq!(builder.config.initial_buffer_capacity, 4);
    }

    #[test]
    fn cache_dir_selects_directory_store() {
        let builder = MindMapBuilder::new().cache_dir("/tmp/mindstream");
        assert!(matches!(builder.store, StoreChoice::Directory(_)));
    }
}
