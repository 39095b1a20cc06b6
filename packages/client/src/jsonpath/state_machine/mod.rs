//! Path tracking over the tokenizer's event stream
//!
//! # Architecture
//!
//! - `types`: frame stack entries
//! - `engine`: the `PathTracker` that turns enter/exit/key events into
//!   concrete document paths
//!
//! # Usage
//!
//! ```rust
//! use mindstream_client::jsonpath::{NormalizedPath, PathTracker, Tokenizer};
//!
//! let mut tokenizer = Tokenizer::new();
//! let mut tracker = PathTracker::new();
//! for event in tokenizer.feed(r#"{"nodes":[{},{}]}"#).unwrap() {
//!     let path = tracker.observe(&event);
//!     println!("{event:?} at {}", NormalizedPath(&path));
//! }
//! ```

mod engine;
mod types;

pub use engine::PathTracker;
