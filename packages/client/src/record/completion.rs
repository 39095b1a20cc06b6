//! Record completeness predicate and per-session emission guard

use std::fmt;

use hashbrown::HashSet;
use serde_json::{Map, Value};

use super::types::MapNode;
use crate::jsonpath::PathSegment;

const NODE_NAME: &str = "nodeName";
const CONNECTION: &str = "connection";
const INSIGHT: &str = "insight";
const EXPLORATION_METHODS: &str = "explorationMethods";
const REFERENCES: &str = "references";

/// Why a candidate was not accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncompleteReason {
    /// The closed value at the target path was not an object
    NotAnObject,
    MissingField(&'static str),
    EmptyField(&'static str),
    /// Fields are present but do not fit the record shape (e.g. reference objects)
    Malformed(String),
    /// A record was already emitted for this path in the current session
    AlreadyEmitted,
}

impl fmt::Display for IncompleteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncompleteReason::NotAnObject => f.write_str("candidate is not an object"),
            IncompleteReason::MissingField(field) => write!(f, "missing field `{field}`"),
            IncompleteReason::EmptyField(field) => write!(f, "empty field `{field}`"),
            IncompleteReason::Malformed(message) => write!(f, "malformed record: {message}"),
            IncompleteReason::AlreadyEmitted => f.write_str("record already emitted"),
        }
    }
}

/// Outcome of checking one closed candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Incomplete(IncompleteReason),
    Complete(MapNode),
}

impl Completion {
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Completion::Complete(_))
    }

    /// The accepted record, if any
    #[must_use]
    pub fn into_record(self) -> Option<MapNode> {
        match self {
            Completion::Complete(node) => Some(node),
            Completion::Incomplete(_) => None,
        }
    }
}

/// Which schema variant a record must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletenessPolicy {
    /// Reject records that lack a non-empty `explorationMethods` list
    pub require_exploration_methods: bool,
}

impl CompletenessPolicy {
    /// Policy for generators that always emit `explorationMethods`
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            require_exploration_methods: true,
        }
    }

    /// Apply the predicate to a candidate value
    #[must_use]
    pub fn check(&self, candidate: Value) -> Completion {
        let Value::Object(fields) = candidate else {
            return Completion::Incomplete(IncompleteReason::NotAnObject);
        };

        for field in [NODE_NAME, CONNECTION, INSIGHT] {
            if let Err(reason) = require_text(&fields, field) {
                return Completion::Incomplete(reason);
            }
        }
        if let Err(reason) = require_list(&fields, REFERENCES) {
            return Completion::Incomplete(reason);
        }
        if self.require_exploration_methods {
            if let Err(reason) = require_list(&fields, EXPLORATION_METHODS) {
                return Completion::Incomplete(reason);
            }
        }

        match serde_json::from_value::<MapNode>(Value::Object(fields)) {
            Ok(node) => Completion::Complete(node),
            Err(e) => Completion::Incomplete(IncompleteReason::Malformed(e.to_string())),
        }
    }
}

fn require_text(fields: &Map<String, Value>, field: &'static str) -> Result<(), IncompleteReason> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(IncompleteReason::MissingField(field)),
        Some(Value::String(text)) if text.is_empty() => Err(IncompleteReason::EmptyField(field)),
        Some(_) => Ok(()),
    }
}

fn require_list(fields: &Map<String, Value>, field: &'static str) -> Result<(), IncompleteReason> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(IncompleteReason::MissingField(field)),
        Some(Value::Array(items)) if items.is_empty() => Err(IncompleteReason::EmptyField(field)),
        Some(_) => Ok(()),
    }
}

/// Runs the completeness predicate once per closed candidate
///
/// Remembers the paths it has accepted so a record can never be emitted
/// twice within one session.
#[derive(Debug, Default)]
pub struct RecordFilter {
    policy: CompletenessPolicy,
    emitted: HashSet<Vec<PathSegment>>,
    rejected: u64,
}

impl RecordFilter {
    #[must_use]
    pub fn new(policy: CompletenessPolicy) -> Self {
        Self {
            policy,
            emitted: HashSet::new(),
            rejected: 0,
        }
    }

    /// Evaluate the candidate that closed at `path`
    pub fn evaluate(&mut self, path: &[PathSegment], candidate: Value) -> Completion {
        if self.emitted.contains(path) {
            self.rejected += 1;
            return Completion::Incomplete(IncompleteReason::AlreadyEmitted);
        }
        let completion = self.policy.check(candidate);
        match &completion {
            Completion::Complete(_) => {
                self.emitted.insert(path.to_vec());
            }
            Completion::Incomplete(reason) => {
                self.rejected += 1;
                log::debug!("discarding candidate: {reason}");
            }
        }
        completion
    }

    #[inline]
    #[must_use]
    pub fn emitted(&self) -> usize {
        self.emitted.len()
    }

    #[inline]
    #[must_use]
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    #[inline]
    #[must_use]
    pub fn policy(&self) -> CompletenessPolicy {
        self.policy
    }
}
