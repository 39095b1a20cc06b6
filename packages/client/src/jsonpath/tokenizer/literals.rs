//! `true`, `false` and `null` literals

use super::types::Scalar;
use crate::jsonpath::error::{DecodeError, DecodeResult};

#[derive(Debug)]
pub(super) struct LiteralLexeme {
    expected: &'static str,
    matched: usize,
    value: Scalar,
}

impl LiteralLexeme {
    /// Start a literal from its first character, which must be `t`, `f` or `n`
    pub(super) fn start(first: char) -> Option<Self> {
        let (expected, value) = match first {
            't' => ("true", Scalar::Bool(true)),
            'f' => ("false", Scalar::Bool(false)),
            'n' => ("null", Scalar::Null),
            _ => return None,
        };
        Some(Self {
            expected,
            matched: 1,
            value,
        })
    }

    /// Consume the next character; returns the scalar once the literal is spelled out
    pub(super) fn push(&mut self, ch: char, offset: usize) -> DecodeResult<Option<Scalar>> {
        match self.expected[self.matched..].chars().next() {
            Some(next) if next == ch => {
                self.matched += 1;
                if self.matched == self.expected.len() {
                    Ok(Some(self.value.clone()))
                } else {
                    Ok(None)
                }
            }
            _ => Err(DecodeError::unexpected_char(ch, offset)),
        }
    }
}
