//! Mind-map builder API
//!
//! Configures the pipeline, the cache and the transport, then builds a
//! [`Coordinator`](mindstream_client::Coordinator).

pub mod core;
pub mod transport;

pub use self::core::*;
