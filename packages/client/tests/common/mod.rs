//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use mindstream_client::cache::{DefaultKeyNormalizer, DocumentStore, MemoryStore};
use mindstream_client::config::CoordinatorConfig;
use mindstream_client::error::{self, Result};
use mindstream_client::transport::{
    BoxFuture, ChannelSender, ChannelSource, Connector, EventSource, StreamRequest, channel,
};
use mindstream_client::Coordinator;

pub const DOCUMENT: &str = r#"{"centerNode":"无聊","nodes":[{"nodeName":"A","connection":"c1","insight":"i1","explorationMethods":["m1"],"references":["r1"]},{"nodeName":"B","connection":"c2","insight":"i2","explorationMethods":["m2"],"references":["r2"]}]}"#;

/// Connector handing out pre-made channel sources in order
#[derive(Default)]
pub struct ScriptedConnector {
    sources: Mutex<VecDeque<ChannelSource>>,
    connects: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl ScriptedConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a source for the next `connect` and return its push side
    pub fn script(&self) -> ChannelSender {
        let (sender, source) = channel();
        self.sources.lock().unwrap().push_back(source);
        sender
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Connector for ScriptedConnector {
    fn connect(&self, request: &StreamRequest) -> BoxFuture<'static, Result<Box<dyn EventSource>>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.query.clone());
        let source = self.sources.lock().unwrap().pop_front();
        Box::pin(async move {
            match source {
                Some(source) => Ok(Box::new(source) as Box<dyn EventSource>),
                None => Err(error::transport("no scripted source")),
            }
        })
    }

    fn model(&self) -> Option<&str> {
        Some("scripted")
    }
}

pub fn coordinator(connector: &Arc<ScriptedConnector>) -> (Coordinator, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let coordinator = coordinator_with_store(connector, Arc::clone(&store) as Arc<dyn DocumentStore>);
    (coordinator, store)
}

pub fn coordinator_with_store(
    connector: &Arc<ScriptedConnector>,
    store: Arc<dyn DocumentStore>,
) -> Coordinator {
    Coordinator::new(
        CoordinatorConfig::default(),
        store,
        Arc::clone(connector) as Arc<dyn Connector>,
        Arc::new(DefaultKeyNormalizer::default()),
    )
    .unwrap()
}

/// Wait until the spawned session has connected
pub async fn until_connected(connector: &ScriptedConnector, count: usize) {
    for _ in 0..200 {
        if connector.connects() >= count {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("session never connected");
}

/// Wait until no session is in flight
pub async fn until_idle(coordinator: &Coordinator) {
    for _ in 0..500 {
        if coordinator.in_flight() == 0 {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    }
    panic!("session never finished");
}

/// Split `text` at the given char positions
pub fn split_at_chars(text: &str, cuts: &[usize]) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut cuts: Vec<usize> = cuts.iter().map(|c| c % (chars.len() + 1)).collect();
    cuts.sort_unstable();
    cuts.dedup();
    let mut pieces = Vec::new();
    let mut start = 0;
    for cut in cuts {
        pieces.push(chars[start..cut].iter().collect());
        start = cut;
    }
    pieces.push(chars[start..].iter().collect());
    pieces
}
