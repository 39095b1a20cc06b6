//! Path tracker engine
//!
//! Segments are pushed on container entry and on each key, popped on
//! container exit; an array's index advances each time one of its elements
//! completes.

use super::types::Frame;
use crate::jsonpath::{
    normalized_paths::{NormalizedPath, PathPattern, PathSegment},
    tokenizer::JsonEvent,
};

/// Maintains the position in the document tree as events arrive
#[derive(Debug, Default)]
pub struct PathTracker {
    frames: Vec<Frame>,
}

impl PathTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: Vec::with_capacity(16),
        }
    }

    /// Apply an event and return the path of the value it refers to
    ///
    /// For `Key` this is the path of the member the key introduces.
    pub fn observe(&mut self, event: &JsonEvent) -> Vec<PathSegment> {
        match event {
            JsonEvent::StartObject => {
                let path = self.current_path();
                self.frames.push(Frame::Object { key: None });
                path
            }
            JsonEvent::StartArray => {
                let path = self.current_path();
                self.frames.push(Frame::Array { index: 0 });
                path
            }
            JsonEvent::Key(name) => {
                if let Some(Frame::Object { key }) = self.frames.last_mut() {
                    *key = Some(name.clone());
                }
                self.current_path()
            }
            JsonEvent::Scalar(_) => {
                let path = self.current_path();
                self.advance_parent();
                path
            }
            JsonEvent::EndObject | JsonEvent::EndArray => {
                self.frames.pop();
                let path = self.current_path();
                self.advance_parent();
                path
            }
        }
    }

    /// Path of the value (or member) currently being read
    #[must_use]
    pub fn current_path(&self) -> Vec<PathSegment> {
        self.frames.iter().filter_map(Frame::child_segment).collect()
    }

    /// Whether the value currently being read sits at a path matching `pattern`
    ///
    /// Avoids building the path vector on the hot path.
    #[must_use]
    pub fn current_matches(&self, pattern: &PathPattern) -> bool {
        let segments = pattern.segments();
        if segments.len() != self.frames.len() {
            return false;
        }
        self.frames
            .iter()
            .zip(segments)
            .all(|(frame, expected)| match frame.child_segment() {
                Some(segment) => expected.matches(&segment),
                None => false,
            })
    }

    /// Open container depth
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Canonical rendering of the current path, for diagnostics
    #[must_use]
    pub fn describe(&self) -> String {
        NormalizedPath(&self.current_path()).to_string()
    }

    fn advance_parent(&mut self) {
        if let Some(Frame::Array { index }) = self.frames.last_mut() {
            *index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonpath::tokenizer::Tokenizer;

    fn member(name: &str) -> PathSegment {
        PathSegment::Member(name.to_string())
    }

    fn tracked(document: &str) -> Vec<(JsonEvent, Vec<PathSegment>)> {
        let mut tokenizer = Tokenizer::new();
        let mut tracker = PathTracker::new();
        tokenizer
            .feed(document)
            .unwrap()
            .into_iter()
            .map(|event| {
                let path = tracker.observe(&event);
                (event, path)
            })
            .collect()
    }

    #[test]
    fn test_array_indices_advance_per_sibling() {
        let events = tracked(r#"{"nodes":[{"a":1},{"a":2}]}"#);
        let closes: Vec<_> = events
            .iter()
            .filter(|(event, _)| *event == JsonEvent::EndObject)
            .map(|(_, path)| path.clone())
            .collect();
        assert_eq!(
            closes,
            vec![
                vec![member("nodes"), PathSegment::Index(0)],
                vec![member("nodes"), PathSegment::Index(1)],
                vec![],
            ]
        );
    }

    #[test]
    fn test_nested_arrays_inside_entries_do_not_disturb_outer_index() {
        let events = tracked(r#"{"nodes":[{"refs":["x","y"]},{"refs":[]}]}"#);
        let ref_paths: Vec<_> = events
            .iter()
            .filter(|(event, _)| matches!(event, JsonEvent::Scalar(_)))
            .map(|(_, path)| NormalizedPath(path).to_string())
            .collect();
        assert_eq!(
            ref_paths,
            vec!["$['nodes'][0]['refs'][0]", "$['nodes'][0]['refs'][1]"]
        );
        let last_entry = events
            .iter()
            .filter(|(event, _)| *event == JsonEvent::EndObject)
            .nth(1)
            .unwrap();
        assert_eq!(NormalizedPath(&last_entry.1).to_string(), "$['nodes'][1]");
    }

    #[test]
    fn test_key_event_carries_member_path() {
        let events = tracked(r#"{"centerNode":"x"}"#);
        assert_eq!(events[1].0, JsonEvent::Key("centerNode".into()));
        assert_eq!(events[1].1, vec![member("centerNode")]);
        assert_eq!(events[2].1, vec![member("centerNode")]);
    }

    #[test]
    fn test_current_matches_pattern() {
        let pattern = PathPattern::parse("$.nodes[*]").unwrap();
        let mut tokenizer = Tokenizer::new();
        let mut tracker = PathTracker::new();
        let mut hits = 0;
        for event in tokenizer.feed(r#"{"nodes":[{"a":"b"}]}"#).unwrap() {
            if event == JsonEvent::StartObject && tracker.current_matches(&pattern) {
                hits += 1;
            }
            tracker.observe(&event);
        }
        assert_eq!(hits, 1);
    }
}
