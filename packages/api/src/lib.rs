//! Mindstream Public API
//!
//! Progressive mind-map streaming: nodes arrive as soon as the backend has
//! finished writing them, and completed documents are served from cache.
//!
//! ```rust,no_run
//! # async fn run() -> mindstream::Result<()> {
//! let coordinator = mindstream::builder()
//!     .cache_dir("/var/cache/mindstream")
//!     .http("http://127.0.0.1:8080")?
//!     .build()?;
//!
//! let mut nodes = coordinator.open("distributed consensus")?;
//! while let Some(node) = nodes.next().await? {
//!     println!("{}", node.node_name);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod builder;

pub use builder::{ConnectorNotSet, ConnectorSet, MindMapBuilder};

pub use mindstream_client::{
    CacheKey, ChannelSender, ChannelSource, CompletenessPolicy, Connector, Coordinator, CoordinatorConfig,
    DocumentStore, Error, EventSource, HttpTransportConfig, Kind, MapNode, MindMapDocument, NodeStream,
    Result, TransportEvent, TryNext,
};

/// Start building a coordinator
///
/// Shorthand for `MindMapBuilder::new()`
#[must_use]
pub fn builder() -> MindMapBuilder {
    MindMapBuilder::new()
}
