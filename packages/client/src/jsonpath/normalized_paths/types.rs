//! Path segment and pattern types

use std::fmt;

/// One step of a concrete path: an object member or an array index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Member(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Member(name) => write!(f, "['{name}']"),
            PathSegment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Canonical rendering of a concrete path, e.g. `$['nodes'][3]`
#[derive(Debug, Clone, Copy)]
pub struct NormalizedPath<'a>(pub &'a [PathSegment]);

impl fmt::Display for NormalizedPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in self.0 {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// One step of a target pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    /// `.name` or `['name']`
    Member(String),
    /// `.*`
    AnyMember,
    /// `[N]`
    Index(usize),
    /// `[*]`
    AnyIndex,
}

/// Compiled target path pattern
///
/// Only root-anchored child steps are supported; there is no descendant
/// operator and no filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    pub(super) segments: Vec<PatternSegment>,
    pub(super) source: String,
}

impl PathPattern {
    #[must_use]
    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of steps below the root
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
