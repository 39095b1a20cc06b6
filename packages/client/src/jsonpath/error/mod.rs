//! Decoder error types
//!
//! Failures raised while tokenizing a fragmented JSON document. A decode
//! error leaves the tokenizer in an unusable state; callers abort the session.

mod types;

pub use types::{DecodeError, DecodeResult};
