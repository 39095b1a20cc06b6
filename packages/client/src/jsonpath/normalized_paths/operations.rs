//! Pattern matching over concrete paths

use super::types::{PathPattern, PathSegment, PatternSegment};

impl PatternSegment {
    #[inline]
    #[must_use]
    pub fn matches(&self, segment: &PathSegment) -> bool {
        match (self, segment) {
            (PatternSegment::Member(expected), PathSegment::Member(actual)) => expected == actual,
            (PatternSegment::AnyMember, PathSegment::Member(_)) => true,
            (PatternSegment::Index(expected), PathSegment::Index(actual)) => expected == actual,
            (PatternSegment::AnyIndex, PathSegment::Index(_)) => true,
            _ => false,
        }
    }
}

impl PathPattern {
    /// Exact match: the path has as many segments as the pattern and each one matches
    #[must_use]
    pub fn matches(&self, path: &[PathSegment]) -> bool {
        path.len() == self.segments.len()
            && self
                .segments
                .iter()
                .zip(path)
                .all(|(pattern, segment)| pattern.matches(segment))
    }

    /// Whether `path` is an ancestor of (or equal to) some path the pattern matches
    #[must_use]
    pub fn is_prefix_of_match(&self, path: &[PathSegment]) -> bool {
        path.len() <= self.segments.len()
            && self
                .segments
                .iter()
                .zip(path)
                .all(|(pattern, segment)| pattern.matches(segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str) -> PathSegment {
        PathSegment::Member(name.to_string())
    }

    #[test]
    fn test_wildcard_index_matches_any_entry() {
        let pattern = PathPattern::parse("$.nodes[*]").unwrap();
        assert!(pattern.matches(&[member("nodes"), PathSegment::Index(0)]));
        assert!(pattern.matches(&[member("nodes"), PathSegment::Index(17)]));
        assert!(!pattern.matches(&[member("nodes")]));
        assert!(!pattern.matches(&[member("other"), PathSegment::Index(0)]));
        assert!(!pattern.matches(&[member("nodes"), PathSegment::Index(0), member("x")]));
    }

    #[test]
    fn test_prefix_matching() {
        let pattern = PathPattern::parse("$.nodes[*]").unwrap();
        assert!(pattern.is_prefix_of_match(&[]));
        assert!(pattern.is_prefix_of_match(&[member("nodes")]));
        assert!(!pattern.is_prefix_of_match(&[member("centerNode")]));
    }
}
