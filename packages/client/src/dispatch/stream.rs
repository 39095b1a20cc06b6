//! Consumer side of a dispatch queue

use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::watch;

use super::queue::{DispatchQueue, Terminal};
use crate::{
    cache::CacheKey,
    error::{self, Result},
    record::{MapNode, MindMapDocument},
};

/// Non-blocking poll result of a [`NodeStream`]
#[derive(Debug, Clone)]
pub enum TryNext {
    /// The next record in emission order
    Ready(MapNode),
    /// No record buffered yet and the session is still running
    Pending,
    /// The session completed and every record has been read
    Done,
    /// The session failed; records read before this remain valid
    Failed(error::Error),
}

/// Ordered, forward-only sequence of one session's records
///
/// Every consumer attached to a session reads every record exactly once.
/// Dropping the last consumer of a running session cancels it.
#[derive(Debug)]
pub struct NodeStream {
    queue: Arc<DispatchQueue>,
    wake: watch::Receiver<u64>,
    cursor: usize,
    finished: bool,
}

impl NodeStream {
    pub(super) fn new(queue: Arc<DispatchQueue>, wake: watch::Receiver<u64>) -> Self {
        Self {
            queue,
            wake,
            cursor: 0,
            finished: false,
        }
    }

    /// Stream replaying a finished document, used for cache hits
    #[must_use]
    pub fn from_document(key: CacheKey, document: MindMapDocument) -> Self {
        DispatchQueue::completed(key, document).attach()
    }

    /// Normalized key of the session this stream reads from
    #[must_use]
    pub fn key(&self) -> &CacheKey {
        self.queue.key()
    }

    /// Records read so far
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Take the next record without waiting
    pub fn try_next(&mut self) -> TryNext {
        if self.finished {
            return TryNext::Done;
        }
        let state = self.queue.lock();
        if let Some(node) = state.records.get(self.cursor) {
            self.cursor += 1;
            return TryNext::Ready(node.clone());
        }
        let result = match &state.terminal {
            None => return TryNext::Pending,
            Some(Terminal::Completed(_)) => TryNext::Done,
            Some(Terminal::Failed(e)) => TryNext::Failed(e.clone()),
            Some(Terminal::Cancelled) => {
                TryNext::Failed(error::cancelled().with_key(self.queue.key().as_str()))
            }
        };
        drop(state);
        self.finished = true;
        result
    }

    /// Wait for the next record
    ///
    /// Returns `Ok(None)` at the end of a completed session.
    ///
    /// # Errors
    ///
    /// Returns the session's terminal error once all records emitted before
    /// the failure have been read.
    pub async fn next(&mut self) -> Result<Option<MapNode>> {
        loop {
            self.wake.borrow_and_update();
            match self.try_next() {
                TryNext::Ready(node) => return Ok(Some(node)),
                TryNext::Done => return Ok(None),
                TryNext::Failed(e) => return Err(e),
                TryNext::Pending => {
                    if self.wake.changed().await.is_err() {
                        return Err(error::cancelled().with_key(self.queue.key().as_str()));
                    }
                }
            }
        }
    }

    /// Drain the remaining records and return the finished document
    ///
    /// # Errors
    ///
    /// Returns the session's terminal error if it did not complete.
    pub async fn outcome(mut self) -> Result<MindMapDocument> {
        while self.next().await?.is_some() {}
        let state = self.queue.lock();
        let outcome = match &state.terminal {
            Some(Terminal::Completed(document)) => Ok(document.clone()),
            Some(Terminal::Failed(e)) => Err(e.clone()),
            Some(Terminal::Cancelled) | None => {
                Err(error::cancelled().with_key(self.queue.key().as_str()))
            }
        };
        drop(state);
        outcome
    }

    /// Adapt into a `futures::Stream`; ends after the first error
    #[must_use]
    pub fn into_stream(self) -> BoxStream<'static, Result<MapNode>> {
        stream::unfold(self, |mut nodes| async move {
            match nodes.next().await {
                Ok(Some(node)) => Some((Ok(node), nodes)),
                Ok(None) => None,
                Err(e) => Some((Err(e), nodes)),
            }
        })
        .boxed()
    }
}

impl Drop for NodeStream {
    fn drop(&mut self) {
        self.queue.detach();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn node(name: &str) -> MapNode {
        MapNode {
            node_name: name.into(),
            connection: "c".into(),
            insight: "i".into(),
            exploration_methods: vec![],
            references: vec!["r".into()],
        }
    }

    #[test]
    fn test_try_next_states() {
        let queue = DispatchQueue::new(CacheKey::from_normalized("k"), 4);
        let mut stream = queue.try_attach().unwrap();
        assert!(matches!(stream.try_next(), TryNext::Pending));
        queue.push(vec![node("A")]);
        assert!(matches!(stream.try_next(), TryNext::Ready(n) if n.node_name == "A"));
        queue.fail(error::transport("boom"));
        assert!(matches!(stream.try_next(), TryNext::Failed(e) if e.is_transport()));
        assert!(matches!(stream.try_next(), TryNext::Done));
    }

    #[tokio::test]
    async fn test_next_wakes_on_push_and_completion() {
        let queue = DispatchQueue::new(CacheKey::from_normalized("k"), 4);
        let mut stream = queue.try_attach().unwrap();
        let producer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                queue.push(vec![node("A")]);
                tokio::time::sleep(Duration::from_millis(10)).await;
                queue.push(vec![node("B")]);
                queue.complete(MindMapDocument::new("k", vec![node("A"), node("B")]));
            })
        };
        assert_eq!(stream.next().await.unwrap().unwrap().node_name, "A");
        assert_eq!(stream.next().await.unwrap().unwrap().node_name, "B");
        assert!(stream.next().await.unwrap().is_none());
        producer.await.unwrap();
    }

    #[test]
    fn test_pending_next_is_woken_by_push() {
        let queue = DispatchQueue::new(CacheKey::from_normalized("k"), 4);
        let mut stream = queue.try_attach().unwrap();
        let mut next = tokio_test::task::spawn(stream.next());
        tokio_test::assert_pending!(next.poll());

        queue.push(vec![node("A")]);
        assert!(next.is_woken());
        let node = tokio_test::assert_ready_ok!(next.poll());
        assert_eq!(node.unwrap().node_name, "A");
    }

    #[tokio::test]
    async fn test_every_consumer_sees_every_record() {
        let queue = DispatchQueue::new(CacheKey::from_normalized("k"), 4);
        let first = queue.try_attach().unwrap();
        queue.push(vec![node("A")]);
        let second = queue.try_attach().unwrap();
        queue.push(vec![node("B")]);
        queue.complete(MindMapDocument::new("k", vec![node("A"), node("B")]));

        for stream in [first, second] {
            let document = stream.outcome().await.unwrap();
            assert_eq!(document.nodes.len(), 2);
        }
    }

    #[tokio::test]
    async fn test_from_document_replays_without_waiting() {
        let document = MindMapDocument::new("k", vec![node("A"), node("B")]);
        let stream = NodeStream::from_document(CacheKey::from_normalized("k"), document.clone());
        let names: Vec<_> = stream
            .into_stream()
            .map(|n| n.unwrap().node_name)
            .collect()
            .await;
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_into_stream_ends_after_error() {
        let queue = DispatchQueue::new(CacheKey::from_normalized("k"), 4);
        let stream = queue.try_attach().unwrap();
        queue.push(vec![node("A")]);
        queue.fail(error::decode("bad"));
        let items: Vec<_> = stream.into_stream().collect().await;
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(items[1].as_ref().unwrap_err().is_decode());
    }
}
