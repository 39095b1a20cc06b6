//! Number lexeme
//!
//! A number has no terminator of its own, so it stays pending until a
//! character outside the number alphabet arrives (or the stream finishes).

use serde_json::Number;

use crate::jsonpath::error::{DecodeError, DecodeResult};

#[derive(Debug)]
pub(super) struct NumberLexeme {
    text: String,
    start: usize,
}

impl NumberLexeme {
    pub(super) fn start(first: char, offset: usize) -> Self {
        let mut text = String::with_capacity(16);
        text.push(first);
        Self {
            text,
            start: offset,
        }
    }

    #[inline]
    pub(super) fn accepts(ch: char) -> bool {
        ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.' | 'e' | 'E')
    }

    #[inline]
    pub(super) fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    /// Validate the collected text against the JSON number grammar
    pub(super) fn finish(self) -> DecodeResult<Number> {
        if !is_json_number(&self.text) {
            return Err(DecodeError::invalid_number(&self.text, self.start));
        }
        self.text
            .parse::<Number>()
            .map_err(|_| DecodeError::invalid_number(&self.text, self.start))
    }
}

/// `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
fn is_json_number(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    if bytes.get(i) == Some(&b'-') {
        i += 1;
    }
    match bytes.get(i) {
        Some(b'0') => i += 1,
        Some(b) if b.is_ascii_digit() => i = digits_from(i),
        _ => return false,
    }
    if bytes.get(i) == Some(&b'.') {
        let end = digits_from(i + 1);
        if end == i + 1 {
            return false;
        }
        i = end;
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let end = digits_from(i);
        if end == i {
            return false;
        }
        i = end;
    }
    i == bytes.len()
}
