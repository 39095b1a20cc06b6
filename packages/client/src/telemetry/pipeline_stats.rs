//! Pipeline statistics with cache-padded atomic counters
//!
//! Counters are updated from the session tasks and read through
//! [`PipelineStats::snapshot`] without locking.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

/// Thread-safe counters for the streaming pipeline
///
/// Each counter is cache-padded to prevent false sharing between sessions
/// running on different worker threads.
#[derive(Debug, Default)]
pub struct PipelineStats {
    /// Text fragments received from transports
    pub fragments_received: CachePadded<AtomicU64>,
    /// Bytes of fragment text received
    pub bytes_received: CachePadded<AtomicU64>,
    /// Records delivered to dispatch queues
    pub records_emitted: CachePadded<AtomicU64>,
    /// Candidates discarded by the completeness predicate
    pub candidates_rejected: CachePadded<AtomicU64>,
    /// Transport sessions started
    pub sessions_started: CachePadded<AtomicU64>,
    /// `open` calls that joined an in-flight session
    pub sessions_attached: CachePadded<AtomicU64>,
    pub sessions_completed: CachePadded<AtomicU64>,
    pub sessions_failed: CachePadded<AtomicU64>,
    pub sessions_cancelled: CachePadded<AtomicU64>,
    pub cache_hits: CachePadded<AtomicU64>,
    pub cache_misses: CachePadded<AtomicU64>,
    /// Cached entries that failed to decode and were evicted
    pub cache_corruptions: CachePadded<AtomicU64>,
}

/// Immutable snapshot of pipeline statistics at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStatsSnapshot {
    pub fragments_received: u64,
    pub bytes_received: u64,
    pub records_emitted: u64,
    pub candidates_rejected: u64,
    pub sessions_started: u64,
    pub sessions_attached: u64,
    pub sessions_completed: u64,
    pub sessions_failed: u64,
    pub sessions_cancelled: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_corruptions: u64,
}

impl PipelineStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_fragment(&self, bytes: usize) {
        self.fragments_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received
            .fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_emitted(&self, count: usize) {
        self.records_emitted
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rejected(&self, count: u64) {
        self.candidates_rejected.fetch_add(count, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_session_started(&self) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_session_attached(&self) {
        self.sessions_attached.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_session_completed(&self) {
        self.sessions_completed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_session_failed(&self) {
        self.sessions_failed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_session_cancelled(&self) {
        self.sessions_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_cache_corruption(&self) {
        self.cache_corruptions.fetch_add(1, Ordering::Relaxed);
    }

    /// Read every counter with relaxed ordering
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> PipelineStatsSnapshot {
        PipelineStatsSnapshot {
            fragments_received: self.fragments_received.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            records_emitted: self.records_emitted.load(Ordering::Relaxed),
            candidates_rejected: self.candidates_rejected.load(Ordering::Relaxed),
            sessions_started: self.sessions_started.load(Ordering::Relaxed),
            sessions_attached: self.sessions_attached.load(Ordering::Relaxed),
            sessions_completed: self.sessions_completed.load(Ordering::Relaxed),
            sessions_failed: self.sessions_failed.load(Ordering::Relaxed),
            sessions_cancelled: self.sessions_cancelled.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            cache_corruptions: self.cache_corruptions.load(Ordering::Relaxed),
        }
    }
}
