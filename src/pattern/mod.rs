//! Regex-literal parsing
//!
//! Key matchers and string patterns travel inside descriptions as
//! `/pattern/flags` literals. Parsing recovers a compiled matcher while
//! keeping the literal text, so introspection can emit it back unchanged.

use std::fmt;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Result type for pattern parsing
pub type PatternResult<T> = Result<T, PatternError>;

/// Regex-literal parse failures
#[derive(Debug, Error)]
pub enum PatternError {
    /// The text has no `/pattern/` delimiter pair
    #[error("malformed regex literal '{0}': missing '/' separators")]
    MissingSeparator(String),

    /// A flag character outside the supported set
    #[error("unsupported regex flag '{flag}' in literal '{literal}'")]
    UnsupportedFlag { literal: String, flag: char },

    /// The pattern body failed to compile
    #[error("invalid regex pattern: {0}")]
    Compile(#[from] regex::Error),
}

/// A compiled pattern that remembers its source literal.
///
/// Equality is by literal text: two patterns parsed from the same literal
/// are interchangeable.
#[derive(Debug, Clone)]
pub struct Pattern {
    literal: String,
    regex: Regex,
}

impl Pattern {
    /// Parses a `/pattern/flags` literal.
    ///
    /// The pattern body is everything strictly between the first and last
    /// `/`; the flag segment is the suffix after the last `/`. Supported
    /// flags: `i` (case-insensitive), `m` (multi-line), `s` (dot matches
    /// newline), `x` (ignore whitespace), `u` (accepted, no effect since
    /// patterns are always Unicode).
    pub fn parse(literal: &str) -> PatternResult<Self> {
        let (open, close) = match (literal.find('/'), literal.rfind('/')) {
            (Some(open), Some(close)) if open < close => (open, close),
            _ => return Err(PatternError::MissingSeparator(literal.to_string())),
        };

        let mut builder = RegexBuilder::new(&literal[open + 1..close]);
        for flag in literal[close + 1..].chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'x' => {
                    builder.ignore_whitespace(true);
                }
                'u' => {}
                other => {
                    return Err(PatternError::UnsupportedFlag {
                        literal: literal.to_string(),
                        flag: other,
                    })
                }
            }
        }

        Ok(Self {
            literal: literal.to_string(),
            regex: builder.build()?,
        })
    }

    /// The original literal text.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// The compiled matcher.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Whether the pattern matches the given text.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.literal == other.literal
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_literal() {
        let pattern = Pattern::parse("/ab+c/").unwrap();
        assert!(pattern.is_match("abbbc"));
        assert!(!pattern.is_match("ac"));
        assert_eq!(pattern.literal(), "/ab+c/");
    }

    #[test]
    fn test_case_insensitive_flag() {
        let pattern = Pattern::parse("/ab+c/i").unwrap();
        assert!(pattern.is_match("ABC"));
        assert!(pattern.is_match("xABBC"));
        assert!(pattern.is_match("abc"));
        assert!(!pattern.is_match("AC"));
    }

    #[test]
    fn test_no_separator_fails() {
        let err = Pattern::parse("no-slashes").unwrap_err();
        assert!(matches!(err, PatternError::MissingSeparator(_)));
    }

    #[test]
    fn test_single_slash_fails() {
        let err = Pattern::parse("/half-open").unwrap_err();
        assert!(matches!(err, PatternError::MissingSeparator(_)));
    }

    #[test]
    fn test_unknown_flag_fails() {
        let err = Pattern::parse("/abc/g").unwrap_err();
        assert!(matches!(err, PatternError::UnsupportedFlag { flag: 'g', .. }));
    }

    #[test]
    fn test_bad_body_fails() {
        let err = Pattern::parse("/a(/").unwrap_err();
        assert!(matches!(err, PatternError::Compile(_)));
    }

    #[test]
    fn test_multiline_flag() {
        let pattern = Pattern::parse("/^b$/m").unwrap();
        assert!(pattern.is_match("a\nb"));
    }

    #[test]
    fn test_equality_is_by_literal() {
        let a = Pattern::parse("/x+/i").unwrap();
        let b = Pattern::parse("/x+/i").unwrap();
        let c = Pattern::parse("/x+/").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
