//! Target pattern parser
//!
//! Grammar: `$` followed by any number of `.name`, `.*`, `['name']`,
//! `["name"]`, `[N]` or `[*]` steps.

use std::str::FromStr;

use super::types::{PathPattern, PatternSegment};
use crate::error::{self, Error};

impl PathPattern {
    /// Parse a target pattern such as `$.nodes[*]`
    ///
    /// # Errors
    ///
    /// Returns an `InvalidPath` error describing the first offending position.
    pub fn parse(pattern: &str) -> Result<Self, Error> {
        let chars: Vec<char> = pattern.trim().chars().collect();
        if chars.first() != Some(&'$') {
            return Err(error::invalid_path(format!(
                "pattern {pattern:?} must start with '$'"
            )));
        }

        let mut segments = Vec::new();
        let mut i = 1;
        while i < chars.len() {
            match chars[i] {
                '.' => {
                    i += 1;
                    if chars.get(i) == Some(&'*') {
                        segments.push(PatternSegment::AnyMember);
                        i += 1;
                        continue;
                    }
                    let start = i;
                    while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                        i += 1;
                    }
                    if start == i {
                        return Err(position_error(pattern, "expected member name", start));
                    }
                    segments.push(PatternSegment::Member(chars[start..i].iter().collect()));
                }
                '[' => {
                    let close = chars[i..]
                        .iter()
                        .position(|&c| c == ']')
                        .map(|offset| i + offset)
                        .ok_or_else(|| position_error(pattern, "unterminated '['", i))?;
                    let inner: String = chars[i + 1..close].iter().collect();
                    segments.push(parse_bracket(&inner).ok_or_else(|| {
                        position_error(pattern, "invalid bracket selector", i)
                    })?);
                    i = close + 1;
                }
                _ => return Err(position_error(pattern, "unexpected character", i)),
            }
        }

        Ok(Self {
            segments,
            source: pattern.trim().to_string(),
        })
    }
}

fn parse_bracket(inner: &str) -> Option<PatternSegment> {
    let inner = inner.trim();
    if inner == "*" {
        return Some(PatternSegment::AnyIndex);
    }
    for quote in ['\'', '"'] {
        if inner.len() >= 2 && inner.starts_with(quote) && inner.ends_with(quote) {
            return Some(PatternSegment::Member(inner[1..inner.len() - 1].to_string()));
        }
    }
    if inner.len() > 1 && inner.starts_with('0') {
        return None;
    }
    inner.parse::<usize>().ok().map(PatternSegment::Index)
}

fn position_error(pattern: &str, message: &str, position: usize) -> Error {
    error::invalid_path(format!("{message} at position {position} in {pattern:?}"))
}

impl FromStr for PathPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dot_and_bracket_forms() {
        let pattern = PathPattern::parse("$.nodes[*]").unwrap();
        assert_eq!(
            pattern.segments(),
            &[PatternSegment::Member("nodes".into()), PatternSegment::AnyIndex]
        );

        let pattern = PathPattern::parse("$['data'].items[2].*").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                PatternSegment::Member("data".into()),
                PatternSegment::Member("items".into()),
                PatternSegment::Index(2),
                PatternSegment::AnyMember,
            ]
        );

        assert!(PathPattern::parse("$").unwrap().segments().is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_patterns() {
        for bad in ["nodes[*]", "$.", "$[", "$[01]", "$[abc]", "$..nodes", "$.a b"] {
            let err = PathPattern::parse(bad).unwrap_err();
            assert_eq!(err.kind(), &crate::error::Kind::InvalidPath, "{bad}");
        }
    }
}
