//! Incremental JSON tokenizer
//!
//! Accepts a document as an open-ended sequence of text fragments whose
//! boundaries may fall anywhere, including inside strings, numbers, escape
//! sequences and literals. Incomplete tails are held in the current lexeme
//! and resumed on the next `feed`.
//!
//! - `core`: the `Tokenizer` state machine and structural grammar
//! - `strings`: string lexeme with escape and surrogate pair handling
//! - `numbers`: number lexeme and JSON number grammar validation
//! - `literals`: `true` / `false` / `null`
//! - `types`: structural events emitted to the path tracker

mod core;
mod literals;
mod numbers;
mod strings;
mod types;

pub use self::core::Tokenizer;
pub use types::{JsonEvent, Scalar};
