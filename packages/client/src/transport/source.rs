//! Event source and connector traits

use crate::{
    error::Result,
    transport::event::{StreamRequest, TransportEvent},
};

pub use futures::future::BoxFuture;

/// Pull side of one server-push stream
pub trait EventSource: Send {
    /// Next event; `None` when the underlying stream ended or was closed
    fn next_event(&mut self) -> BoxFuture<'_, Option<TransportEvent>>;

    /// Stop delivery and release the underlying connection
    ///
    /// Idempotent. No event is returned by `next_event` after `close`.
    fn close(&mut self);
}

/// Opens an [`EventSource`] for a query
pub trait Connector: Send + Sync + 'static {
    /// Start streaming the document for `request`
    ///
    /// # Errors
    ///
    /// The returned future resolves to a transport error if the stream
    /// cannot be established.
    fn connect(&self, request: &StreamRequest) -> BoxFuture<'static, Result<Box<dyn EventSource>>>;

    /// Name of the model behind this connector, recorded with cached documents
    fn model(&self) -> Option<&str> {
        None
    }
}
