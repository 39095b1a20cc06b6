//! String lexeme with escape sequence handling
//!
//! Escapes may be split across fragments at any character, including in the
//! middle of a `\uXXXX` sequence or between the halves of a surrogate pair.

use crate::jsonpath::error::{DecodeError, DecodeResult};

#[derive(Debug, Clone, Copy)]
enum EscapeState {
    None,
    Backslash,
    Unicode { value: u32, digits: u8 },
}

#[derive(Debug)]
pub(super) struct StringLexeme {
    /// Object key rather than a string value
    pub(super) is_key: bool,
    buf: String,
    escape: EscapeState,
    high_surrogate: Option<u32>,
}

impl StringLexeme {
    pub(super) fn new(is_key: bool) -> Self {
        Self {
            is_key,
            buf: String::new(),
            escape: EscapeState::None,
            high_surrogate: None,
        }
    }

    /// Consume one character; returns the decoded text on the closing quote
    pub(super) fn push(&mut self, ch: char, offset: usize) -> DecodeResult<Option<String>> {
        match self.escape {
            EscapeState::Backslash => {
                if ch == 'u' {
                    self.escape = EscapeState::Unicode {
                        value: 0,
                        digits: 0,
                    };
                    return Ok(None);
                }
                if self.high_surrogate.is_some() {
                    return Err(DecodeError::invalid_unicode(offset));
                }
                let decoded = match ch {
                    '"' => '"',
                    '\\' => '\\',
                    '/' => '/',
                    'b' => '\u{0008}',
                    'f' => '\u{000C}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    _ => return Err(DecodeError::invalid_escape(ch, offset)),
                };
                self.buf.push(decoded);
                self.escape = EscapeState::None;
                Ok(None)
            }
            EscapeState::Unicode { value, digits } => {
                let digit = ch
                    .to_digit(16)
                    .ok_or_else(|| DecodeError::invalid_unicode(offset))?;
                let value = value * 16 + digit;
                if digits < 3 {
                    self.escape = EscapeState::Unicode {
                        value,
                        digits: digits + 1,
                    };
                    return Ok(None);
                }
                self.escape = EscapeState::None;
                self.push_code_unit(value, offset)?;
                Ok(None)
            }
            EscapeState::None => {
                // a high surrogate must be followed directly by its low half
                if self.high_surrogate.is_some() && ch != '\\' {
                    return Err(DecodeError::invalid_unicode(offset));
                }
                match ch {
                    '"' => Ok(Some(std::mem::take(&mut self.buf))),
                    '\\' => {
                        self.escape = EscapeState::Backslash;
                        Ok(None)
                    }
                    c if u32::from(c) < 0x20 => Err(DecodeError::control_character(offset)),
                    c => {
                        self.buf.push(c);
                        Ok(None)
                    }
                }
            }
        }
    }

    fn push_code_unit(&mut self, unit: u32, offset: usize) -> DecodeResult<()> {
        let code_point = match (self.high_surrogate.take(), unit) {
            (None, 0xD800..=0xDBFF) => {
                self.high_surrogate = Some(unit);
                return Ok(());
            }
            (None, 0xDC00..=0xDFFF) => return Err(DecodeError::invalid_unicode(offset)),
            (None, _) => unit,
            (Some(high), low @ 0xDC00..=0xDFFF) => 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00),
            (Some(_), _) => return Err(DecodeError::invalid_unicode(offset)),
        };
        let ch = char::from_u32(code_point).ok_or_else(|| DecodeError::invalid_unicode(offset))?;
        self.buf.push(ch);
        Ok(())
    }
}
