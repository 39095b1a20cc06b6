//! Incremental JSON decoding and record extraction
//!
//! Text fragments of one large document arrive with no alignment to token
//! boundaries. This module turns them into typed records as soon as each
//! record's object closes, without holding the full document.
//!
//! # Layers
//!
//! - [`tokenizer`]: character-incremental JSON tokenizer emitting structural events
//! - [`state_machine`]: path tracker assigning a concrete path to each event
//! - [`normalized_paths`]: concrete paths and the `$.nodes[*]` pattern syntax
//! - [`deserializer`]: value assembly and the [`RecordExtractor`] pipeline
//!
//! # Examples
//!
//! ```rust
//! use mindstream_client::jsonpath::{PathPattern, RecordExtractor};
//! use mindstream_client::record::CompletenessPolicy;
//!
//! let mut extractor = RecordExtractor::new(
//!     PathPattern::parse("$.nodes[*]").unwrap(),
//!     PathPattern::parse("$.centerNode").unwrap(),
//!     CompletenessPolicy::default(),
//!     "query",
//! );
//! for fragment in [r#"{"centerNode":"x","nodes":[{"node"#, r#"Name":"A","connection":"c","insight":"i","references":["r"]}]}"#] {
//!     for node in extractor.feed(fragment).unwrap() {
//!         println!("{}", node.node_name);
//!     }
//! }
//! ```

pub mod deserializer;
pub mod error;
pub mod normalized_paths;
pub mod state_machine;
pub mod tokenizer;

pub use deserializer::{Extraction, RecordExtractor, ValueAssembler};
pub use error::{DecodeError, DecodeResult};
pub use normalized_paths::{NormalizedPath, PathPattern, PathSegment, PatternSegment};
pub use state_machine::PathTracker;
pub use tokenizer::{JsonEvent, Scalar, Tokenizer};
