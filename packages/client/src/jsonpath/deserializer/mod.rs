//! Streaming record extraction on top of the tokenizer and path tracker
//!
//! - `assembly`: materializes the value under a matched path
//! - `streaming`: the `RecordExtractor` pipeline

pub mod assembly;
pub mod streaming;

pub use assembly::ValueAssembler;
pub use streaming::{Extraction, RecordExtractor};
