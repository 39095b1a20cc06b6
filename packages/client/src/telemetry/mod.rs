//! Telemetry for the streaming pipeline and the document cache

pub mod cache_stats;
pub mod pipeline_stats;

pub use cache_stats::{CacheStats, CacheStatsSnapshot};
pub use pipeline_stats::{PipelineStats, PipelineStatsSnapshot};
