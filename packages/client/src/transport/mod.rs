//! Server-push transports feeding the extraction pipeline
//!
//! A transport is anything that yields the three event kinds of
//! [`TransportEvent`]. [`Connector`]s open one [`EventSource`] per session;
//! the [`TransportAdapter`] drives it through a `RecordExtractor` into a
//! dispatch queue.

pub mod adapter;
pub mod channel;
pub mod event;
pub mod http;
pub mod source;
pub mod sse;

pub use adapter::{AdapterOutcome, TransportAdapter};
pub use channel::{ChannelSender, ChannelSource, channel};
pub use event::{StreamRequest, TransportEvent};
pub use http::HttpConnector;
pub use source::{BoxFuture, Connector, EventSource};
pub use sse::{SseEvent, SseParser, SseSource};
