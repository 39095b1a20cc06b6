//! Tokenizer state machine
//!
//! Tracks the structural grammar (what may legally come next) separately from
//! the lexeme currently being read, so a fragment boundary can land between
//! any two characters of the document.

use super::{
    literals::LiteralLexeme,
    numbers::NumberLexeme,
    strings::StringLexeme,
    types::{JsonEvent, Scalar},
};
use crate::jsonpath::error::{DecodeError, DecodeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

/// What the grammar accepts next once the current lexeme (if any) is done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// Root value, a value after `:`, or an array element after `,`
    Value,
    /// First array element or `]`
    ValueOrClose,
    /// First object key or `}`
    KeyOrClose,
    /// Object key after `,`
    Key,
    Colon,
    /// `,` or the closing bracket of the innermost container
    CommaOrClose,
    /// Root value closed; only whitespace may follow
    Finished,
}

#[derive(Debug)]
enum Lexeme {
    Idle,
    String(StringLexeme),
    Number(NumberLexeme),
    Literal(LiteralLexeme),
}

/// Incremental JSON tokenizer
///
/// ```rust
/// use mindstream_client::jsonpath::{JsonEvent, Tokenizer};
///
/// let mut tokenizer = Tokenizer::new();
/// let mut events = tokenizer.feed(r#"{"center"#).unwrap();
/// events.extend(tokenizer.feed(r#"Node":"x"}"#).unwrap());
/// assert_eq!(events[1], JsonEvent::Key("centerNode".into()));
/// assert!(tokenizer.is_complete());
/// ```
#[derive(Debug)]
pub struct Tokenizer {
    stack: Vec<Container>,
    expect: Expect,
    lexeme: Lexeme,
    /// Characters consumed so far
    offset: usize,
    /// Sticky failure; the tokenizer refuses further input after an error
    failed: Option<DecodeError>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: Vec::with_capacity(16),
            expect: Expect::Value,
            lexeme: Lexeme::Idle,
            offset: 0,
            failed: None,
        }
    }

    /// Feed the next fragment and return the events it completed
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` when the fragment, combined with the buffered
    /// state, is not valid JSON. Every later call returns the same error.
    pub fn feed(&mut self, fragment: &str) -> DecodeResult<Vec<JsonEvent>> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }

        let mut events = Vec::new();
        for ch in fragment.chars() {
            if let Err(err) = self.process_char(ch, &mut events) {
                log::debug!("tokenizer rejected input: {err}");
                self.failed = Some(err.clone());
                return Err(err);
            }
            self.offset += 1;
        }
        Ok(events)
    }

    /// Signal end of input, flushing a trailing number
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the root value is unterminated.
    pub fn finish(&mut self) -> DecodeResult<Vec<JsonEvent>> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }

        let mut events = Vec::new();
        match std::mem::replace(&mut self.lexeme, Lexeme::Idle) {
            Lexeme::Idle => {}
            Lexeme::Number(number) => {
                let number = number.finish()?;
                self.emit_scalar(Scalar::Number(number), &mut events);
            }
            Lexeme::String(_) | Lexeme::Literal(_) => {
                return Err(DecodeError::unexpected_end(self.offset));
            }
        }

        if self.expect != Expect::Finished {
            return Err(DecodeError::unexpected_end(self.offset));
        }
        Ok(events)
    }

    /// Whether the root value has been fully read
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.expect == Expect::Finished && matches!(self.lexeme, Lexeme::Idle)
    }

    /// Current container nesting depth
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Characters consumed so far
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn process_char(&mut self, ch: char, events: &mut Vec<JsonEvent>) -> DecodeResult<()> {
        match &mut self.lexeme {
            Lexeme::Idle => {}
            Lexeme::String(string) => {
                let is_key = string.is_key;
                if let Some(text) = string.push(ch, self.offset)? {
                    self.lexeme = Lexeme::Idle;
                    if is_key {
                        events.push(JsonEvent::Key(text));
                        self.expect = Expect::Colon;
                    } else {
                        self.emit_scalar(Scalar::String(text), events);
                    }
                }
                return Ok(());
            }
            Lexeme::Literal(literal) => {
                if let Some(scalar) = literal.push(ch, self.offset)? {
                    self.lexeme = Lexeme::Idle;
                    self.emit_scalar(scalar, events);
                }
                return Ok(());
            }
            Lexeme::Number(number) => {
                if NumberLexeme::accepts(ch) {
                    number.push(ch);
                    return Ok(());
                }
                // the terminating character still needs structural handling below
                if let Lexeme::Number(number) = std::mem::replace(&mut self.lexeme, Lexeme::Idle) {
                    let number = number.finish()?;
                    self.emit_scalar(Scalar::Number(number), events);
                }
            }
        }

        self.process_structural(ch, events)
    }

    fn process_structural(&mut self, ch: char, events: &mut Vec<JsonEvent>) -> DecodeResult<()> {
        if matches!(ch, ' ' | '\t' | '\n' | '\r') {
            return Ok(());
        }

        match self.expect {
            Expect::Finished => Err(DecodeError::trailing_content(ch, self.offset)),
            Expect::ValueOrClose if ch == ']' => self.close(Container::Array, events),
            Expect::Value | Expect::ValueOrClose => self.begin_value(ch, events),
            Expect::KeyOrClose if ch == '}' => self.close(Container::Object, events),
            Expect::KeyOrClose | Expect::Key => {
                if ch == '"' {
                    self.lexeme = Lexeme::String(StringLexeme::new(true));
                    Ok(())
                } else {
                    Err(DecodeError::unexpected_char(ch, self.offset))
                }
            }
            Expect::Colon => {
                if ch == ':' {
                    self.expect = Expect::Value;
                    Ok(())
                } else {
                    Err(DecodeError::unexpected_char(ch, self.offset))
                }
            }
            Expect::CommaOrClose => match (ch, self.stack.last()) {
                (',', Some(Container::Object)) => {
                    self.expect = Expect::Key;
                    Ok(())
                }
                (',', Some(Container::Array)) => {
                    self.expect = Expect::Value;
                    Ok(())
                }
                ('}', Some(Container::Object)) => self.close(Container::Object, events),
                (']', Some(Container::Array)) => self.close(Container::Array, events),
                _ => Err(DecodeError::unexpected_char(ch, self.offset)),
            },
        }
    }

    fn begin_value(&mut self, ch: char, events: &mut Vec<JsonEvent>) -> DecodeResult<()> {
        match ch {
            '{' => {
                events.push(JsonEvent::StartObject);
                self.stack.push(Container::Object);
                self.expect = Expect::KeyOrClose;
            }
            '[' => {
                events.push(JsonEvent::StartArray);
                self.stack.push(Container::Array);
                self.expect = Expect::ValueOrClose;
            }
            '"' => self.lexeme = Lexeme::String(StringLexeme::new(false)),
            '-' | '0'..='9' => self.lexeme = Lexeme::Number(NumberLexeme::start(ch, self.offset)),
            _ => match LiteralLexeme::start(ch) {
                Some(literal) => self.lexeme = Lexeme::Literal(literal),
                None => return Err(DecodeError::unexpected_char(ch, self.offset)),
            },
        }
        Ok(())
    }

    fn close(&mut self, container: Container, events: &mut Vec<JsonEvent>) -> DecodeResult<()> {
        match self.stack.pop() {
            Some(open) if open == container => {}
            _ => {
                let ch = if container == Container::Object { '}' } else { ']' };
                return Err(DecodeError::unexpected_char(ch, self.offset));
            }
        }
        events.push(match container {
            Container::Object => JsonEvent::EndObject,
            Container::Array => JsonEvent::EndArray,
        });
        self.value_completed();
        Ok(())
    }

    fn emit_scalar(&mut self, scalar: Scalar, events: &mut Vec<JsonEvent>) {
        events.push(JsonEvent::Scalar(scalar));
        self.value_completed();
    }

    #[inline]
    fn value_completed(&mut self) {
        self.expect = if self.stack.is_empty() {
            Expect::Finished
        } else {
            Expect::CommaOrClose
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(parts: &[&str]) -> DecodeResult<Vec<JsonEvent>> {
        let mut tokenizer = Tokenizer::new();
        let mut events = Vec::new();
        for part in parts {
            events.extend(tokenizer.feed(part)?);
        }
        events.extend(tokenizer.finish()?);
        Ok(events)
    }

    fn string(s: &str) -> JsonEvent {
        JsonEvent::Scalar(Scalar::String(s.to_string()))
    }

    #[test]
    fn test_simple_object_events() {
        let events = feed_all(&[r#"{"a": [1, true, null], "b": "x"}"#]).unwrap();
        assert_eq!(
            events,
            vec![
                JsonEvent::StartObject,
                JsonEvent::Key("a".into()),
                JsonEvent::StartArray,
                JsonEvent::Scalar(Scalar::Number(1.into())),
                JsonEvent::Scalar(Scalar::Bool(true)),
                JsonEvent::Scalar(Scalar::Null),
                JsonEvent::EndArray,
                JsonEvent::Key("b".into()),
                string("x"),
                JsonEvent::EndObject,
            ]
        );
    }

    #[test]
    fn test_split_inside_every_token_kind() {
        let whole = feed_all(&[r#"{"key":"va\"lue","n":-12.5e3,"t":true,"u":"é"}"#]).unwrap();
        let split = feed_all(&[
            r#"{"ke"#, r#"y":"va\"#, r#""lue","n":-1"#, r#"2.5e"#, r#"3,"t":tr"#, r#"ue,"u":"\u0"#,
            r#"0e9"}"#,
        ])
        .unwrap();
        assert_eq!(whole, split);
        assert_eq!(split[8], string("\u{e9}"));
    }

    #[test]
    fn test_number_pending_across_fragment_boundary() {
        let mut tokenizer = Tokenizer::new();
        let events = tokenizer.feed(r#"[12"#).unwrap();
        assert_eq!(events, vec![JsonEvent::StartArray]);
        let events = tokenizer.feed(r#"34]"#).unwrap();
        assert_eq!(
            events,
            vec![JsonEvent::Scalar(Scalar::Number(1234.into())), JsonEvent::EndArray]
        );
    }

    #[test]
    fn test_root_number_flushed_on_finish() {
        let mut tokenizer = Tokenizer::new();
        assert!(tokenizer.feed("42").unwrap().is_empty());
        assert!(!tokenizer.is_complete());
        let events = tokenizer.finish().unwrap();
        assert_eq!(events, vec![JsonEvent::Scalar(Scalar::Number(42.into()))]);
    }

    #[test]
    fn test_surrogate_pair_split_between_halves() {
        let events = feed_all(&[r#"["\ud83d"#, r#"\ude00"]"#]).unwrap();
        assert_eq!(events[1], string("\u{1F600}"));
    }

    #[test]
    fn test_multibyte_text_passes_through() {
        let events = feed_all(&[r#"{"centerNode":"无"#, r#"聊"}"#]).unwrap();
        assert_eq!(events[2], string("无聊"));
    }

    #[test]
    fn test_invalid_syntax_is_rejected() {
        for bad in [
            r#"{"a" 1}"#,
            r#"{"a":1,}"#,
            r#"[1 2]"#,
            r#"{"a":tru}"#,
            r#"{"a":01}"#,
            r#"[1]]"#,
            r#"{]"#,
            r#"{"a":"\x"}"#,
            "[\"line\nbreak\"]",
            r#"{} {}"#,
            r#"["\udc00"]"#,
        ] {
            assert!(feed_all(&[bad]).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_error_is_sticky() {
        let mut tokenizer = Tokenizer::new();
        let err = tokenizer.feed("{,").unwrap_err();
        assert_eq!(err.offset, 1);
        assert_eq!(tokenizer.feed("}").unwrap_err(), err);
    }

    #[test]
    fn test_finish_on_truncated_document_fails() {
        let mut tokenizer = Tokenizer::new();
        tokenizer.feed(r#"{"nodes":[{"a":"b"}"#).unwrap();
        assert!(tokenizer.finish().is_err());
    }

    #[test]
    fn test_empty_fragments_are_noops() {
        let events = feed_all(&["", "[", "", "]", ""]).unwrap();
        assert_eq!(events, vec![JsonEvent::StartArray, JsonEvent::EndArray]);
    }
}
