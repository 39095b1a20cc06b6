use serde_json::{Number, Value};

/// Complete scalar value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Number(n) => Value::Number(n),
            Scalar::String(s) => Value::String(s),
        }
    }
}

/// Structural event produced by the tokenizer
///
/// Strings, keys and numbers are only emitted once fully read, so an event
/// never carries a partial token.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonEvent {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    Key(String),
    Scalar(Scalar),
}

impl JsonEvent {
    /// Whether this event finishes a value (scalar or closing bracket)
    #[inline]
    #[must_use]
    pub fn completes_value(&self) -> bool {
        matches!(
            self,
            JsonEvent::EndObject | JsonEvent::EndArray | JsonEvent::Scalar(_)
        )
    }
}
