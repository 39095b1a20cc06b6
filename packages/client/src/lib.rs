//! # Mindstream Client
//!
//! Incremental pipeline that turns a fragmented JSON document, delivered as a
//! stream of text chunks by a generative backend, into typed mind-map nodes
//! while the document is still being written.
//!
//! ## Layers
//!
//! - **Decoding**: a character-incremental tokenizer with path tracking and
//!   value assembly (`jsonpath`)
//! - **Records**: completeness checking and deduplication (`record`)
//! - **Dispatch**: per-session buffers with independent consumer cursors
//!   (`dispatch`)
//! - **Transport**: pluggable event sources, including SSE over HTTP/1.1
//!   (`transport`)
//! - **Caching**: keyed document storage with a recent-keys index (`cache`)
//! - **Coordination**: one session per key, shared by concurrent callers
//!   (`coordinator`)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use mindstream_client::{
//!     Coordinator, CoordinatorConfig, DefaultKeyNormalizer, HttpConnector, HttpTransportConfig,
//!     MemoryStore,
//! };
//!
//! # async fn run() -> mindstream_client::Result<()> {
//! let transport = HttpTransportConfig::parse("http://127.0.0.1:8080")?;
//! let coordinator = Coordinator::new(
//!     CoordinatorConfig::default(),
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(HttpConnector::new(transport)?),
//!     Arc::new(DefaultKeyNormalizer::default()),
//! )?;
//!
//! let mut nodes = coordinator.open("Rust ownership")?;
//! while let Some(node) = nodes.next().await? {
//!     println!("{}: {}", node.node_name, node.insight);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod error;
pub mod jsonpath;
pub mod record;
pub mod telemetry;
pub mod transport;

// Prelude with canonical types
pub mod prelude;

pub use crate::prelude::*;
