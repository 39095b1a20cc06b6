//! Domain records extracted from the generated document
//!
//! `types` holds the wire shapes; `completion` decides whether a closed
//! candidate object is a usable record.

pub mod completion;
pub mod types;

pub use completion::{Completion, CompletenessPolicy, IncompleteReason, RecordFilter};
pub use types::{MapNode, MindMapDocument};
