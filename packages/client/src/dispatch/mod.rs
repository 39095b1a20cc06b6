//! Push-to-pull bridge between a session and its consumers
//!
//! The producer appends records to a [`DispatchQueue`]; each consumer reads
//! through its own [`NodeStream`] cursor and suspends on a `watch` version
//! counter when it has caught up.

mod queue;
mod stream;

pub use queue::{DispatchQueue, Terminal};
pub use stream::{NodeStream, TryNext};
