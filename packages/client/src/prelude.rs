//! Mindstream Prelude
//!
//! The types most callers need to open a stream and consume its nodes.

pub use crate::cache::{
    CacheEntry, CacheKey, DefaultKeyNormalizer, DocumentStore, FileStore, KeyNormalizer, MemoryStore,
};
pub use crate::config::{ConfigurationError, CoordinatorConfig, HttpTransportConfig};
pub use crate::coordinator::Coordinator;
pub use crate::dispatch::{NodeStream, TryNext};
pub use crate::error::{Error, Kind, Result};
pub use crate::record::{CompletenessPolicy, MapNode, MindMapDocument};
pub use crate::telemetry::{CacheStatsSnapshot, PipelineStatsSnapshot};
pub use crate::transport::{ChannelSender, ChannelSource, Connector, EventSource, HttpConnector, TransportEvent};

pub use url::Url;
