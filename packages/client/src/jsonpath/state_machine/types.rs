//! Path tracker types

use crate::jsonpath::normalized_paths::PathSegment;

/// One open container on the tracker's stack
#[derive(Debug, Clone)]
pub(super) enum Frame {
    /// Object with the most recently read key, if any
    Object { key: Option<String> },
    /// Array with the index of the element currently being read
    Array { index: usize },
}

impl Frame {
    /// Path segment addressing the child currently being read
    pub(super) fn child_segment(&self) -> Option<PathSegment> {
        match self {
            Frame::Object { key } => key.clone().map(PathSegment::Member),
            Frame::Array { index } => Some(PathSegment::Index(*index)),
        }
    }
}
