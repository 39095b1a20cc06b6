//! Session task: connect, stream, persist, publish the terminal state

use std::sync::Arc;

use super::core::Shared;
use crate::{
    cache::CacheEntry,
    dispatch::DispatchQueue,
    jsonpath::RecordExtractor,
    transport::{AdapterOutcome, StreamRequest, TransportAdapter},
};

/// Drive one session to its terminal state
///
/// A completed document is cached before the queue is completed, so any
/// caller that sees the end of the stream also finds the cache entry. A
/// truncated document still completes the queue but is never cached. The
/// registry entry is removed last, and only if it still points at this
/// session's queue.
pub(super) async fn run(shared: Arc<Shared>, request: StreamRequest, queue: Arc<DispatchQueue>) {
    let key = request.key.clone();

    let connected = tokio::select! {
        biased;
        () = queue.cancelled() => None,
        result = shared.connector.connect(&request) => Some(result),
    };

    let outcome = match connected {
        None => AdapterOutcome::Cancelled,
        Some(Err(e)) => AdapterOutcome::Failed(e.with_key(key.as_str())),
        Some(Ok(source)) => {
            let extractor = RecordExtractor::new(
                shared.target.clone(),
                shared.center.clone(),
                shared.config.completeness,
                request.query.clone(),
            );
            TransportAdapter::new(source, extractor, Arc::clone(&queue), Arc::clone(&shared.stats))
                .run(queue.cancelled())
                .await
        }
    };

    match outcome {
        AdapterOutcome::Completed(document) => {
            let nodes = document.nodes.len();
            let entry = CacheEntry::new(
                key.clone(),
                document.clone(),
                shared.connector.model().map(str::to_owned),
            );
            if let Err(e) = shared.cache.insert(&entry) {
                tracing::warn!(target: "mindstream::coordinator", key = %key, error = %e, "failed to cache document");
            }
            queue.complete(document);
            shared.stats.record_session_completed();
            tracing::info!(target: "mindstream::coordinator", key = %key, nodes, "session completed");
        }
        AdapterOutcome::Truncated(document) => {
            let nodes = document.nodes.len();
            queue.complete(document);
            shared.stats.record_session_completed();
            tracing::warn!(
                target: "mindstream::coordinator",
                key = %key,
                nodes,
                "stream completed before the document closed, not caching"
            );
        }
        AdapterOutcome::Failed(e) => {
            tracing::warn!(target: "mindstream::coordinator", key = %key, error = %e, "session failed");
            queue.fail(e);
            shared.stats.record_session_failed();
        }
        AdapterOutcome::Cancelled => {
            queue.cancel();
            shared.stats.record_session_cancelled();
            tracing::info!(target: "mindstream::coordinator", key = %key, "session cancelled");
        }
    }

    shared
        .sessions
        .remove_if(&key, |_, current| Arc::ptr_eq(current, &queue));
}
