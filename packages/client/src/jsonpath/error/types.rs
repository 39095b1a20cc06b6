use thiserror::Error;

/// Result type for tokenizer operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Invalid JSON syntax found in the fragment sequence
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at character {offset}")]
pub struct DecodeError {
    /// Human readable description of the syntax violation
    pub message: String,
    /// Character offset into the overall document
    pub offset: usize,
}

impl DecodeError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }

    #[must_use]
    pub fn unexpected_char(ch: char, offset: usize) -> Self {
        Self::new(format!("unexpected character {ch:?}"), offset)
    }

    #[must_use]
    pub fn unexpected_end(offset: usize) -> Self {
        Self::new("unexpected end of input", offset)
    }

    #[must_use]
    pub fn invalid_number(text: &str, offset: usize) -> Self {
        Self::new(format!("invalid number {text:?}"), offset)
    }

    #[must_use]
    pub fn invalid_escape(ch: char, offset: usize) -> Self {
        Self::new(format!("invalid escape sequence '\\{ch}'"), offset)
    }

    #[must_use]
    pub fn invalid_unicode(offset: usize) -> Self {
        Self::new("invalid unicode escape", offset)
    }

    #[must_use]
    pub fn control_character(offset: usize) -> Self {
        Self::new("unescaped control character in string", offset)
    }

    #[must_use]
    pub fn trailing_content(ch: char, offset: usize) -> Self {
        Self::new(format!("trailing character {ch:?} after document"), offset)
    }
}
