//! Per-key request coordination
//!
//! The [`Coordinator`] is the single entry point: it serves finished
//! documents from the cache, joins callers to an in-flight session for the
//! same key, and otherwise starts a new session on the current runtime.

mod core;
mod session;

pub use self::core::Coordinator;
