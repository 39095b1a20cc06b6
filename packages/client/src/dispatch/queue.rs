//! Shared record log with terminal state and wakeups

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Notify, watch};

use super::stream::NodeStream;
use crate::{
    cache::CacheKey,
    error::Error,
    record::{MapNode, MindMapDocument},
};

/// How a session ended
#[derive(Debug, Clone)]
pub enum Terminal {
    Completed(MindMapDocument),
    Failed(Error),
    Cancelled,
}

#[derive(Debug)]
pub(super) struct State {
    /// Every record emitted so far, in emission order
    pub(super) records: Vec<MapNode>,
    pub(super) terminal: Option<Terminal>,
    consumers: usize,
    cancel_requested: bool,
}

/// Ordered buffer of one session's records
///
/// Records are never removed, so a consumer attaching late still observes
/// the full sequence from the first record.
#[derive(Debug)]
pub struct DispatchQueue {
    key: CacheKey,
    state: Mutex<State>,
    /// Bumped after every state change; consumers wait on it
    version: watch::Sender<u64>,
    cancel: Notify,
}

impl DispatchQueue {
    /// Empty queue for a live session
    #[must_use]
    pub fn new(key: CacheKey, capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            key,
            state: Mutex::new(State {
                records: Vec::with_capacity(capacity),
                terminal: None,
                consumers: 0,
                cancel_requested: false,
            }),
            version: watch::Sender::new(0),
            cancel: Notify::new(),
        })
    }

    /// Already completed queue replaying a cached document
    #[must_use]
    pub fn completed(key: CacheKey, document: MindMapDocument) -> Arc<Self> {
        let queue = Self::new(key, 0);
        {
            let mut state = queue.lock();
            state.records = document.nodes.clone();
            state.terminal = Some(Terminal::Completed(document));
        }
        queue
    }

    #[must_use]
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Attach a new consumer
    ///
    /// Returns `None` once cancellation has been requested; such a session
    /// is on its way out and must not gain new consumers.
    #[must_use]
    pub fn try_attach(self: &Arc<Self>) -> Option<NodeStream> {
        let mut state = self.lock();
        if state.cancel_requested {
            return None;
        }
        state.consumers += 1;
        drop(state);
        Some(NodeStream::new(Arc::clone(self), self.version.subscribe()))
    }

    /// Attach without the cancellation check
    ///
    /// Only for queues that cannot have a cancellation pending: freshly
    /// created or already terminal.
    pub(crate) fn attach(self: &Arc<Self>) -> NodeStream {
        self.lock().consumers += 1;
        NodeStream::new(Arc::clone(self), self.version.subscribe())
    }

    /// Append records; ignored after a terminal transition
    pub fn push(&self, records: Vec<MapNode>) -> bool {
        if records.is_empty() {
            return true;
        }
        {
            let mut state = self.lock();
            if state.terminal.is_some() {
                return false;
            }
            state.records.extend(records);
        }
        self.wake();
        true
    }

    pub fn complete(&self, document: MindMapDocument) -> bool {
        self.finish(Terminal::Completed(document))
    }

    pub fn fail(&self, error: Error) -> bool {
        self.finish(Terminal::Failed(error))
    }

    pub fn cancel(&self) -> bool {
        self.finish(Terminal::Cancelled)
    }

    /// Record the terminal state; the first transition wins
    fn finish(&self, terminal: Terminal) -> bool {
        {
            let mut state = self.lock();
            if state.terminal.is_some() {
                return false;
            }
            state.terminal = Some(terminal);
        }
        self.wake();
        true
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.lock().terminal.is_some()
    }

    #[must_use]
    pub fn is_cancel_requested(&self) -> bool {
        self.lock().cancel_requested
    }

    /// Attached consumers
    #[must_use]
    pub fn consumers(&self) -> usize {
        self.lock().consumers
    }

    /// Records emitted so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolves once every consumer has gone before the session finished
    pub async fn cancelled(&self) {
        loop {
            let requested = self.lock().cancel_requested;
            if requested {
                return;
            }
            self.cancel.notified().await;
        }
    }

    pub(super) fn detach(&self) {
        let cancel = {
            let mut state = self.lock();
            state.consumers = state.consumers.saturating_sub(1);
            let cancel =
                state.consumers == 0 && state.terminal.is_none() && !state.cancel_requested;
            if cancel {
                state.cancel_requested = true;
            }
            cancel
        };
        if cancel {
            tracing::debug!(target: "mindstream::dispatch", key = %self.key, "last consumer detached");
            self.cancel.notify_one();
        }
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wake(&self) {
        self.version.send_modify(|version| *version = version.wrapping_add(1));
    }
}

#[cfg(test)]
mod tests {
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
    fn test_first_terminal_transition_wins() {
        let queue = DispatchQueue::new(CacheKey::from_normalized("k"), 4);
        assert!(queue.push(vec![node("A")]));
        assert!(queue.complete(MindMapDocument::new("k", vec![node("A")])));
        assert!(!queue.fail(crate::error::transport("late")));
        assert!(!queue.push(vec![node("B")]));
        assert_eq!(queue.len(), 1);
        assert!(matches!(queue.lock().terminal, Some(Terminal::Completed(_))));
    }

    #[test]
    fn test_last_detach_requests_cancel() {
        let queue = DispatchQueue::new(CacheKey::from_normalized("k"), 4);
        let first = queue.try_attach().unwrap();
        let second = queue.try_attach().unwrap();
        assert_eq!(queue.consumers(), 2);
        drop(first);
        assert!(!queue.is_cancel_requested());
        drop(second);
        assert!(queue.is_cancel_requested());
        assert!(queue.try_attach().is_none());
    }

    #[test]
    fn test_detach_after_terminal_does_not_cancel() {
        let queue = DispatchQueue::new(CacheKey::from_normalized("k"), 4);
        let consumer = queue.try_attach().unwrap();
        queue.fail(crate::error::transport("boom"));
        drop(consumer);
        assert!(!queue.is_cancel_requested());
    }

    #[tokio::test]
    async fn test_cancelled_resolves_after_last_detach() {
        let queue = DispatchQueue::new(CacheKey::from_normalized("k"), 4);
        let consumer = queue.try_attach().unwrap();
        let waiter = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.cancelled().await })
        };
        drop(consumer);
        waiter.await.unwrap();
    }
}
