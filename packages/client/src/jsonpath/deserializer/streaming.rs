//! Streaming record extraction
//!
//! Composes the tokenizer, path tracker, value assembler and record filter
//! into one incremental pipeline: fragments go in, completed records come out
//! the moment their object closes.

use super::assembly::ValueAssembler;
use crate::{
    error::{self, Result},
    jsonpath::{
        normalized_paths::{NormalizedPath, PathPattern},
        state_machine::PathTracker,
        tokenizer::{JsonEvent, Scalar, Tokenizer},
    },
    record::{Completion, CompletenessPolicy, MapNode, MindMapDocument, RecordFilter},
};

/// Result of closing a [`RecordExtractor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub document: MindMapDocument,
    /// Input ended before the root value closed
    pub truncated: bool,
}

/// Incremental extractor for one generated document
///
/// ```rust
/// use mindstream_client::jsonpath::{PathPattern, RecordExtractor};
/// use mindstream_client::record::CompletenessPolicy;
///
/// let mut extractor = RecordExtractor::new(
///     PathPattern::parse("$.nodes[*]").unwrap(),
///     PathPattern::parse("$.centerNode").unwrap(),
///     CompletenessPolicy::default(),
///     "boredom",
/// );
/// let mut records = extractor.feed(r#"{"nodes":[{"nodeName":"A","connection":"c","#).unwrap();
/// records.extend(extractor.feed(r#""insight":"i","references":["r"]}]}"#).unwrap());
/// assert_eq!(records.len(), 1);
/// assert_eq!(extractor.finish().unwrap().center_node, "boredom");
/// ```
#[derive(Debug)]
pub struct RecordExtractor {
    tokenizer: Tokenizer,
    tracker: PathTracker,
    assembler: ValueAssembler,
    filter: RecordFilter,
    target: PathPattern,
    center_path: PathPattern,
    center_node: Option<String>,
    fallback_center: String,
    records: Vec<MapNode>,
    failed: bool,
}

impl RecordExtractor {
    /// Create an extractor emitting records found at `target`
    ///
    /// `fallback_center` is used as the document's center node when the
    /// stream never provides one at `center_path`.
    #[must_use]
    pub fn new(
        target: PathPattern,
        center_path: PathPattern,
        policy: CompletenessPolicy,
        fallback_center: impl Into<String>,
    ) -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            tracker: PathTracker::new(),
            assembler: ValueAssembler::new(),
            filter: RecordFilter::new(policy),
            target,
            center_path,
            center_node: None,
            fallback_center: fallback_center.into(),
            records: Vec::new(),
            failed: false,
        }
    }

    /// Feed the next fragment; returns the records it completed, in order
    ///
    /// # Errors
    ///
    /// Returns a decode error when the accumulated input is not valid JSON.
    /// The extractor is unusable afterwards.
    pub fn feed(&mut self, fragment: &str) -> Result<Vec<MapNode>> {
        let events = self.tokenizer.feed(fragment).map_err(|e| {
            self.failed = true;
            error::Error::from(e)
        })?;
        Ok(self.consume(events))
    }

    /// Close the input and assemble the finished document
    ///
    /// A document that ends before its root closes still yields the records
    /// completed so far; use [`close`](Self::close) to tell the two apart.
    ///
    /// # Errors
    ///
    /// Returns a decode error if an earlier fragment was rejected.
    pub fn finish(self) -> Result<MindMapDocument> {
        self.close().map(|extraction| extraction.document)
    }

    /// Close the input, reporting whether the root value ever closed
    ///
    /// # Errors
    ///
    /// Returns a decode error if an earlier fragment was rejected.
    pub fn close(mut self) -> Result<Extraction> {
        if self.failed {
            return Err(error::decode("extractor already failed"));
        }
        let truncated = match self.tokenizer.finish() {
            Ok(events) => {
                self.consume(events);
                false
            }
            Err(e) => {
                tracing::warn!(
                    target: "mindstream::extract",
                    error = %e,
                    records = self.records.len(),
                    "document ended before its root closed"
                );
                true
            }
        };

        let center_node = match self.center_node {
            Some(center) => center,
            None => {
                tracing::warn!(
                    target: "mindstream::extract",
                    path = %self.center_path,
                    "document has no center node, falling back to query"
                );
                self.fallback_center
            }
        };
        Ok(Extraction {
            document: MindMapDocument::new(center_node, self.records),
            truncated,
        })
    }

    /// Records emitted so far, in emission order
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[MapNode] {
        &self.records
    }

    /// Candidates discarded by the completeness predicate
    #[inline]
    #[must_use]
    pub fn rejected(&self) -> u64 {
        self.filter.rejected()
    }

    /// Characters consumed so far
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.tokenizer.offset()
    }

    fn consume(&mut self, events: Vec<JsonEvent>) -> Vec<MapNode> {
        let mut emitted = Vec::new();
        for event in events {
            let path = self.tracker.observe(&event);

            if self.assembler.is_active() {
                if let Some(candidate) = self.assembler.push(event) {
                    if let Completion::Complete(node) = self.filter.evaluate(&path, candidate) {
                        log::trace!("record completed at {}", NormalizedPath(&path));
                        self.records.push(node.clone());
                        emitted.push(node);
                    }
                }
                continue;
            }

            match event {
                JsonEvent::StartObject if self.target.matches(&path) => {
                    self.assembler.push(JsonEvent::StartObject);
                }
                JsonEvent::Scalar(Scalar::String(text))
                    if self.center_node.is_none() && self.center_path.matches(&path) =>
                {
                    self.center_node = Some(text);
                }
                _ => {}
            }
        }
        emitted
    }
}
