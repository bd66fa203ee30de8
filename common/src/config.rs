// Name Rules Configuration
//
// Limits the ledger applies to names. Values default to the ledger's stock
// configuration and can be overridden from the harness config file.

use serde::{Deserialize, Serialize};

use crate::names::{DEFAULT_EXTRA_PUNCTUATION, DEFAULT_MAX_NAME_LENGTH, DEFAULT_MAX_REPEATED_RUN};

/// Tunable parts of the name rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameRulesConfig {
    /// Maximum name length in characters
    pub max_length: usize,
    /// Longest run of one repeated character, `None` disables the check
    pub max_repeated_run: Option<usize>,
    /// Punctuation accepted besides alphanumerics
    pub extra_punctuation: String,
    /// Restrict alphanumerics to ASCII
    pub ascii_only: bool,
}

impl NameRulesConfig {
    /// Default rules with a different length limit
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length,
            ..Self::default()
        }
    }

    /// Whether `c` belongs to the accepted alphabet
    pub fn accepts(&self, c: char) -> bool {
        let alphanumeric = if self.ascii_only {
            c.is_ascii_alphanumeric()
        } else {
            c.is_alphanumeric()
        };
        alphanumeric || self.extra_punctuation.contains(c)
    }
}

impl Default for NameRulesConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_NAME_LENGTH,
            max_repeated_run: Some(DEFAULT_MAX_REPEATED_RUN),
            extra_punctuation: DEFAULT_EXTRA_PUNCTUATION.to_string(),
            ascii_only: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alphabet() {
        let config = NameRulesConfig::default();
        assert!(config.accepts('a'));
        assert!(config.accepts('Z'));
        assert!(config.accepts('7'));
        assert!(config.accepts('_'));
        assert!(config.accepts('-'));
        assert!(config.accepts('.'));
        assert!(config.accepts('ж'));
        assert!(!config.accepts('!'));
        assert!(!config.accepts('\u{0007}'));
    }

    #[test]
    fn test_ascii_only() {
        let config = NameRulesConfig {
            ascii_only: true,
            ..NameRulesConfig::default()
        };
        assert!(config.accepts('a'));
        assert!(!config.accepts('ж'));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: NameRulesConfig = serde_yaml::from_str("max_length: 32").unwrap();
        assert_eq!(config.max_length, 32);
        assert_eq!(config.max_repeated_run, Some(DEFAULT_MAX_REPEATED_RUN));
        assert_eq!(config.extra_punctuation, DEFAULT_EXTRA_PUNCTUATION);
    }
}
