//! Channel-backed event source for callback-driven transports
//!
//! The sender half can live inside any callback (a websocket handler, a
//! browser-style event listener, a test) and pushes events without awaiting.

use tokio::sync::mpsc;

use super::{
    event::TransportEvent,
    source::{BoxFuture, EventSource},
};

/// Create a connected sender/source pair
#[must_use]
pub fn channel() -> (ChannelSender, ChannelSource) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        ChannelSender { tx },
        ChannelSource {
            rx,
            closed: false,
        },
    )
}

/// Push side of a [`ChannelSource`]
#[derive(Debug, Clone)]
pub struct ChannelSender {
    tx: mpsc::UnboundedSender<TransportEvent>,
}

impl ChannelSender {
    /// Deliver a fragment; returns `false` once the source has been closed
    pub fn chunk(&self, text: impl Into<String>) -> bool {
        self.send(TransportEvent::Chunk(text.into()))
    }

    pub fn complete(&self) -> bool {
        self.send(TransportEvent::Complete)
    }

    pub fn error(&self, reason: Option<String>) -> bool {
        self.send(TransportEvent::Error(reason))
    }

    pub fn send(&self, event: TransportEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Whether the receiving source was closed or dropped
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Event source fed by a [`ChannelSender`]
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<TransportEvent>,
    closed: bool,
}

impl EventSource for ChannelSource {
    fn next_event(&mut self) -> BoxFuture<'_, Option<TransportEvent>> {
        Box::pin(async move {
            if self.closed {
                return None;
            }
            self.rx.recv().await
        })
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.rx.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (tx, mut source) = channel();
        tx.chunk("{");
        tx.chunk("}");
        tx.complete();
        assert_eq!(source.next_event().await, Some(TransportEvent::Chunk("{".into())));
        assert_eq!(source.next_event().await, Some(TransportEvent::Chunk("}".into())));
        assert_eq!(source.next_event().await, Some(TransportEvent::Complete));
    }

    #[tokio::test]
    async fn test_close_is_idempotent_and_stops_delivery() {
        let (tx, mut source) = channel();
        tx.chunk("a");
        source.close();
        source.close();
        assert!(tx.is_closed());
        assert!(!tx.chunk("b"));
        assert_eq!(source.next_event().await, None);
    }

    #[tokio::test]
    async fn test_dropped_sender_ends_source() {
        let (tx, mut source) = channel();
        drop(tx);
        assert_eq!(source.next_event().await, None);
    }
}
