// Name Validation
//
// Pure checks for a single bare name. Rules run in a fixed order and the
// first failing rule decides the outcome, so diagnostics are deterministic.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::EnumIter;

use super::{is_name_whitespace, is_reserved_separator};
use crate::config::NameRulesConfig;
use crate::error::{ParseError, Stderr};

/// Result of validating one bare name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum ValidationOutcome {
    Valid,
    Empty,
    TooLong,
    Repetition,
    InvalidCharacter,
    ReservedCharacter,
    Whitespace,
}

impl ValidationOutcome {
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }

    /// The ledger error kind reported for the same violation
    pub fn stderr(self) -> Option<Stderr> {
        match self {
            Self::Valid => None,
            Self::Empty => Some(Stderr::Empty),
            Self::TooLong => Some(Stderr::TooLong),
            Self::Repetition => Some(Stderr::Repetition),
            Self::InvalidCharacter => Some(Stderr::InvalidCharacter),
            Self::ReservedCharacter => Some(Stderr::ReservedCharacter),
            Self::Whitespace => Some(Stderr::Whitespace),
        }
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stderr() {
            Some(kind) => f.write_str(kind.message()),
            None => f.write_str("Valid"),
        }
    }
}

/// Validate `candidate` with the default alphabet and a custom length limit
pub fn validate(candidate: &str, max_length: usize) -> ValidationOutcome {
    validate_with(candidate, &NameRulesConfig::with_max_length(max_length))
}

/// Validate `candidate` against the configured rules
///
/// Order:
/// 1. Empty
/// 2. Longer than `max_length` characters
/// 3. Contains `@`, `#` or `$`
/// 4. Contains whitespace
/// 5. Contains a character outside the alphabet
/// 6. Repeats one character more than `max_repeated_run` times in a row
pub fn validate_with(candidate: &str, config: &NameRulesConfig) -> ValidationOutcome {
    if candidate.is_empty() {
        return ValidationOutcome::Empty;
    }

    if candidate.chars().count() > config.max_length {
        return ValidationOutcome::TooLong;
    }

    if candidate.chars().any(is_reserved_separator) {
        return ValidationOutcome::ReservedCharacter;
    }

    if candidate.chars().any(is_name_whitespace) {
        return ValidationOutcome::Whitespace;
    }

    if !candidate.chars().all(|c| config.accepts(c)) {
        return ValidationOutcome::InvalidCharacter;
    }

    if let Some(limit) = config.max_repeated_run {
        if longest_run(candidate) > limit {
            return ValidationOutcome::Repetition;
        }
    }

    ValidationOutcome::Valid
}

/// Validate one named part of a larger construct, as a `ParseError`
pub fn require_valid(
    value: &str,
    part: &'static str,
    construct: &'static str,
    config: &NameRulesConfig,
) -> Result<(), ParseError> {
    match validate_with(value, config) {
        ValidationOutcome::Valid => Ok(()),
        outcome => Err(ParseError::InvalidPart {
            part,
            construct,
            outcome,
        }),
    }
}

fn longest_run(candidate: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut prev = None;
    for c in candidate.chars() {
        if prev == Some(c) {
            current += 1;
        } else {
            current = 1;
            prev = Some(c);
        }
        longest = longest.max(current);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert_eq!(validate("alice", 128), ValidationOutcome::Valid);
        assert_eq!(validate("wonderland", 128), ValidationOutcome::Valid);
        assert_eq!(validate("cute_cat", 128), ValidationOutcome::Valid);
        assert_eq!(validate("rose-2.0", 128), ValidationOutcome::Valid);
        assert_eq!(validate("Кот", 128), ValidationOutcome::Valid);
    }

    #[test]
    fn test_empty() {
        assert_eq!(validate("", 128), ValidationOutcome::Empty);
        assert_eq!(validate("", 0), ValidationOutcome::Empty);
    }

    #[test]
    fn test_length_counts_characters() {
        assert_eq!(validate("abc", 3), ValidationOutcome::Valid);
        assert_eq!(validate("abcd", 3), ValidationOutcome::TooLong);
        // Three characters, six bytes
        assert_eq!(validate("жжж", 3), ValidationOutcome::Valid);
    }

    #[test]
    fn test_reserved_characters() {
        assert_eq!(validate("bad@name", 128), ValidationOutcome::ReservedCharacter);
        assert_eq!(validate("bad#name", 128), ValidationOutcome::ReservedCharacter);
        assert_eq!(validate("bad$name", 128), ValidationOutcome::ReservedCharacter);
    }

    #[test]
    fn test_whitespace() {
        assert_eq!(validate("bad name", 128), ValidationOutcome::Whitespace);
        assert_eq!(validate("bad\tname", 128), ValidationOutcome::Whitespace);
        assert_eq!(validate("bad\nname", 128), ValidationOutcome::Whitespace);
        assert_eq!(validate(" ", 128), ValidationOutcome::Whitespace);
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(validate("al!ce", 128), ValidationOutcome::InvalidCharacter);
        assert_eq!(validate("bell\u{0007}", 128), ValidationOutcome::InvalidCharacter);
        assert_eq!(validate("cat😀", 128), ValidationOutcome::InvalidCharacter);
    }

    #[test]
    fn test_repetition() {
        let config = NameRulesConfig {
            max_repeated_run: Some(3),
            ..NameRulesConfig::default()
        };
        assert_eq!(validate_with("baaab", &config), ValidationOutcome::Valid);
        assert_eq!(validate_with("baaaab", &config), ValidationOutcome::Repetition);

        let disabled = NameRulesConfig {
            max_repeated_run: None,
            ..NameRulesConfig::default()
        };
        assert_eq!(validate_with(&"a".repeat(100), &disabled), ValidationOutcome::Valid);
    }

    #[test]
    fn test_rule_precedence() {
        // Length is checked before whitespace and reserved characters
        assert_eq!(validate("a b c d", 3), ValidationOutcome::TooLong);
        assert_eq!(validate("a@b@c", 3), ValidationOutcome::TooLong);
        // Reserved characters win over whitespace
        assert_eq!(validate("a@ b", 128), ValidationOutcome::ReservedCharacter);
        // Whitespace wins over invalid characters
        assert_eq!(validate("a! b", 128), ValidationOutcome::Whitespace);
        // Invalid characters win over repetition
        let config = NameRulesConfig {
            max_repeated_run: Some(2),
            ..NameRulesConfig::default()
        };
        assert_eq!(validate_with("aaa!", &config), ValidationOutcome::InvalidCharacter);
    }

    #[test]
    fn test_display_uses_ledger_wording() {
        assert_eq!(ValidationOutcome::TooLong.to_string(), "Name length violation");
        assert_eq!(ValidationOutcome::Whitespace.to_string(), "White space not allowed");
        assert_eq!(ValidationOutcome::Valid.to_string(), "Valid");
    }
}
