//! Paths into the streamed document
//!
//! - `types`: concrete path segments as produced by the path tracker, and the
//!   canonical bracket rendering used in logs
//! - `parser`: the small target-pattern syntax (`$.nodes[*]`)
//! - `operations`: matching concrete paths against a pattern

pub mod operations;
pub mod parser;
pub mod types;

pub use types::{NormalizedPath, PathSegment, PatternSegment, PathPattern};
