//! Value assembly for the subtree under a target path
//!
//! Only the events of a captured value are materialized; the rest of the
//! document streams past without allocation.

use serde_json::{Map, Value};

use crate::jsonpath::tokenizer::JsonEvent;

#[derive(Debug)]
enum Partial {
    Object {
        fields: Map<String, Value>,
        key: Option<String>,
    },
    Array(Vec<Value>),
}

/// Builds one `serde_json::Value` from the events of a single JSON value
///
/// Start capture by pushing the value's first event; every following event
/// must be pushed until [`push`](Self::push) returns the finished value.
#[derive(Debug, Default)]
pub struct ValueAssembler {
    stack: Vec<Partial>,
}

impl ValueAssembler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: Vec::with_capacity(8),
        }
    }

    /// Whether a value is currently being captured
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Push the next event; returns the captured value once it closes
    pub fn push(&mut self, event: JsonEvent) -> Option<Value> {
        let completed = match event {
            JsonEvent::StartObject => {
                self.stack.push(Partial::Object {
                    fields: Map::new(),
                    key: None,
                });
                return None;
            }
            JsonEvent::StartArray => {
                self.stack.push(Partial::Array(Vec::new()));
                return None;
            }
            JsonEvent::Key(name) => {
                if let Some(Partial::Object { key, .. }) = self.stack.last_mut() {
                    *key = Some(name);
                }
                return None;
            }
            JsonEvent::Scalar(scalar) => Value::from(scalar),
            JsonEvent::EndObject | JsonEvent::EndArray => match self.stack.pop()? {
                Partial::Object { fields, .. } => Value::Object(fields),
                Partial::Array(items) => Value::Array(items),
            },
        };
        self.attach(completed)
    }

    /// Drop any partially captured value
    pub fn reset(&mut self) {
        self.stack.clear();
    }

    fn attach(&mut self, value: Value) -> Option<Value> {
        match self.stack.last_mut() {
            None => Some(value),
            Some(Partial::Array(items)) => {
                items.push(value);
                None
            }
            Some(Partial::Object { fields, key }) => {
                if let Some(key) = key.take() {
                    fields.insert(key, value);
                }
                None
            }
        }
    }
}
