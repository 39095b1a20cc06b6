//! Drives one event source through a record extractor into a dispatch queue

use std::{future::Future, sync::Arc};

use super::{event::TransportEvent, source::EventSource};
use crate::{
    dispatch::DispatchQueue,
    error::{self, Error},
    jsonpath::RecordExtractor,
    record::MindMapDocument,
    telemetry::PipelineStats,
};

/// How an adapter run ended
#[derive(Debug)]
pub enum AdapterOutcome {
    /// `complete` received; the document holds every emitted record
    Completed(MindMapDocument),
    /// `complete` received before the document's root closed; the
    /// document holds the records completed so far
    Truncated(MindMapDocument),
    /// Decode failure, upstream error, or the connection dropped
    Failed(Error),
    /// Cancellation was requested before a terminal event
    Cancelled,
}

enum Step {
    Complete,
    Fail(Error),
    Cancel,
}

/// Feeds fragments from an [`EventSource`] to a [`RecordExtractor`]
///
/// Records are pushed to the queue as soon as they complete. The terminal
/// state is *not* written to the queue; the caller does that after acting
/// on the outcome (e.g. persisting the document first).
pub struct TransportAdapter {
    source: Box<dyn EventSource>,
    extractor: RecordExtractor,
    queue: Arc<DispatchQueue>,
    stats: Arc<PipelineStats>,
}

impl TransportAdapter {
    #[must_use]
    pub fn new(
        source: Box<dyn EventSource>,
        extractor: RecordExtractor,
        queue: Arc<DispatchQueue>,
        stats: Arc<PipelineStats>,
    ) -> Self {
        Self {
            source,
            extractor,
            queue,
            stats,
        }
    }

    /// Run until a terminal event or until `cancel` resolves
    ///
    /// The source is closed before returning, whatever the outcome.
    pub async fn run<C>(mut self, cancel: C) -> AdapterOutcome
    where
        C: Future<Output = ()>,
    {
        let key = self.queue.key().clone();
        tokio::pin!(cancel);

        let step = loop {
            let source = &mut self.source;
            let event = tokio::select! {
                biased;
                () = &mut cancel => break Step::Cancel,
                event = source.next_event() => event,
            };

            match event {
                Some(TransportEvent::Chunk(text)) => {
                    self.stats.record_fragment(text.len());
                    match self.extractor.feed(&text) {
                        Ok(records) => {
                            if !records.is_empty() {
                                self.stats.record_emitted(records.len());
                                self.queue.push(records);
                            }
                        }
                        Err(e) => break Step::Fail(e),
                    }
                }
                Some(TransportEvent::Complete) => break Step::Complete,
                Some(TransportEvent::Error(reason)) => {
                    let reason = reason.unwrap_or_else(|| "stream error".to_string());
                    break Step::Fail(error::transport(reason));
                }
                None => break Step::Fail(error::transport("connection closed")),
            }
        };

        self.source.close();
        self.stats.record_rejected(self.extractor.rejected());

        match step {
            Step::Complete => match self.extractor.close() {
                Ok(extraction) if extraction.truncated => AdapterOutcome::Truncated(extraction.document),
                Ok(extraction) => AdapterOutcome::Completed(extraction.document),
                Err(e) => AdapterOutcome::Failed(e.with_key(key.as_str())),
            },
            Step::Fail(e) => {
                tracing::warn!(target: "mindstream::transport", key = %key, error = %e, "stream failed");
                AdapterOutcome::Failed(e.with_key(key.as_str()))
            }
            Step::Cancel => AdapterOutcome::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::CacheKey,
        jsonpath::PathPattern,
        record::CompletenessPolicy,
        transport::channel::channel,
    };

    fn build(source: Box<dyn EventSource>) -> (TransportAdapter, Arc<DispatchQueue>) {
        let queue = DispatchQueue::new(CacheKey::from_normalized("k"), 4);
        let extractor = RecordExtractor::new(
            PathPattern::parse("$.nodes[*]").unwrap(),
            PathPattern::parse("$.centerNode").unwrap(),
            CompletenessPolicy::default(),
            "k",
        );
        let adapter = TransportAdapter::new(
            source,
            extractor,
            Arc::clone(&queue),
            Arc::new(PipelineStats::new()),
        );
        (adapter, queue)
    }

    const NODE: &str = r#"{"nodeName":"A","connection":"c","insight":"i","references":["r"]}"#;

    #[tokio::test]
    async fn test_completed_run_pushes_records() {
        let (tx, source) = channel();
        let (adapter, queue) = build(Box::new(source));
        tx.chunk(r#"{"centerNode":"x","nodes":["#);
        tx.chunk(NODE);
        tx.chunk("]}");
        tx.complete();

        match adapter.run(std::future::pending()).await {
            AdapterOutcome::Completed(document) => {
                assert_eq!(document.center_node, "x");
                assert_eq!(document.nodes.len(), 1);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(queue.len(), 1);
        assert!(!queue.is_terminal());
        assert!(tx.is_closed());
    }

    #[tokio::test]
    async fn test_early_complete_is_truncated() {
        let (tx, source) = channel();
        let (adapter, queue) = build(Box::new(source));
        tx.chunk(r#"{"centerNode":"x","nodes":["#);
        tx.chunk(NODE);
        tx.complete();

        match adapter.run(std::future::pending()).await {
            AdapterOutcome::Truncated(document) => assert_eq!(document.nodes.len(), 1),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(queue.len(), 1);
    }

    #[tokio::test]
    async fn test_decode_error_fails_fast_and_closes_source() {
        let (tx, source) = channel();
        let (adapter, _queue) = build(Box::new(source));
        tx.chunk(r#"{"nodes":[}"#);
        tx.chunk(NODE);

        match adapter.run(std::future::pending()).await {
            AdapterOutcome::Failed(e) => {
                assert!(e.is_decode());
                assert_eq!(e.key(), Some("k"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(tx.is_closed());
    }

    #[tokio::test]
    async fn test_upstream_error_and_dropped_connection() {
        let (tx, source) = channel();
        let (adapter, _queue) = build(Box::new(source));
        tx.error(Some("quota exceeded".into()));
        match adapter.run(std::future::pending()).await {
            AdapterOutcome::Failed(e) => {
                assert!(e.is_transport());
                assert!(e.to_string().contains("quota exceeded"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        let (tx, source) = channel();
        let (adapter, _queue) = build(Box::new(source));
        tx.chunk("{");
        drop(tx);
        match adapter.run(std::future::pending()).await {
            AdapterOutcome::Failed(e) => assert!(e.to_string().contains("connection closed")),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancel_closes_source() {
        let (tx, source) = channel();
        let (adapter, _queue) = build(Box::new(source));
        tx.chunk("{");
        let outcome = adapter.run(std::future::ready(())).await;
        assert!(matches!(outcome, AdapterOutcome::Cancelled));
        assert!(tx.is_closed());
    }
}
