//! Per-person pattern matching against scan lines
//!
//! Patterns are regular expressions searched anywhere in the line, so an
//! operator may supply a partial address. Overlapping patterns are allowed:
//! one line can match several people.

use crate::error::PatternError;
use crate::models::PersonRecord;
use regex::Regex;

/// Compiled pattern for one person
#[derive(Debug, Clone)]
pub struct MacMatcher {
    compiled: Result<Regex, PatternError>,
}

impl MacMatcher {
    /// Compile a person's pattern; an invalid pattern yields a matcher that never matches
    pub fn compile(person: &PersonRecord) -> Self {
        let compiled = Regex::new(&person.mac_pattern).map_err(|e| PatternError {
            person: person.name.clone(),
            pattern: person.mac_pattern.clone(),
            message: e.to_string(),
        });
        Self { compiled }
    }

    pub fn is_match(&self, line: &str) -> bool {
        match &self.compiled {
            Ok(regex) => regex.is_match(line),
            Err(_) => false,
        }
    }

    /// Compile error, if the pattern was invalid
    pub fn error(&self) -> Option<&PatternError> {
        self.compiled.as_ref().err()
    }
}

/// Indices of every matcher that hits `line`
pub fn matching_indices<'a>(
    matchers: &'a [MacMatcher],
    line: &'a str,
) -> impl Iterator<Item = usize> + 'a {
    matchers
        .iter()
        .enumerate()
        .filter(move |(_, m)| m.is_match(line))
        .map(|(i, _)| i)
}
