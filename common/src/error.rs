// Error Taxonomy
//
// `Stderr` is the closed set of error kinds the ledger reports for rejected
// instructions. Raw ledger messages are classified here and nowhere else, so
// a change in the ledger's wording is a one-line edit to the table below.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use thiserror::Error;

use crate::names::ValidationOutcome;

/// Ledger-reported error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Stderr {
    Empty,
    Repetition,
    TooLong,
    FailedToFindDomain,
    FailedToFindAccount,
    InvalidCharacter,
    InvalidType,
    ReservedCharacter,
    Whitespace,
    InsufficientFunds,
    NotPermitted,
    UnknownPermission,
}

// ========================================
// Classification table
// ========================================

/// Kinds in the order raw messages are matched against them
///
/// Specific wordings come first. `InvalidCharacter` matches the generic
/// "Failed to parse" prefix that most of the other messages are wrapped in,
/// so it must stay last.
const CLASSIFICATION_ORDER: [Stderr; 12] = [
    Stderr::ReservedCharacter,
    Stderr::Whitespace,
    Stderr::TooLong,
    Stderr::InvalidType,
    Stderr::InsufficientFunds,
    Stderr::NotPermitted,
    Stderr::UnknownPermission,
    Stderr::FailedToFindDomain,
    Stderr::FailedToFindAccount,
    Stderr::Repetition,
    Stderr::Empty,
    Stderr::InvalidCharacter,
];

impl Stderr {
    /// Canonical ledger wording for this kind
    pub const fn message(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Repetition => "Repetition",
            Self::TooLong => "Name length violation",
            Self::FailedToFindDomain => "Failed to find domain",
            Self::FailedToFindAccount => "Failed to find account",
            Self::InvalidCharacter => "Failed to parse",
            Self::InvalidType => "should be either `Store` or `Numeric`",
            Self::ReservedCharacter => {
                "The `@` character is reserved for `account@domain` constructs, \
                 `#` for `asset#domain`, and `$` — for `nft$domain`."
            }
            Self::Whitespace => "White space not allowed",
            Self::InsufficientFunds => "Not enough quantity to transfer/burn",
            Self::NotPermitted => {
                "Operation is not permitted: This operation is only allowed inside the genesis block"
            }
            Self::UnknownPermission => "Unknown permission",
        }
    }

    /// Map a raw ledger error message onto a kind
    ///
    /// Returns `None` when the message matches no known wording.
    ///
    /// Backtick-quoted segments are identifiers the ledger echoes back and
    /// are ignored on both sides, so a name like `Empty_box` never matches.
    pub fn classify(raw: &str) -> Option<Self> {
        let text = unquoted(raw);
        let kind = CLASSIFICATION_ORDER
            .iter()
            .copied()
            .find(|kind| text.contains(&unquoted(kind.message())));
        if kind.is_none() && log::log_enabled!(log::Level::Debug) {
            log::debug!("Unclassified ledger message: {}", raw);
        }
        kind
    }
}

/// `raw` with every `` `...` `` segment removed, backticks included
fn unquoted(raw: &str) -> String {
    let mut quoted = false;
    raw.chars()
        .filter(|&c| {
            if c == '`' {
                quoted = !quoted;
                return false;
            }
            !quoted
        })
        .collect()
}

// ========================================
// Parse errors
// ========================================

/// Failure to read an identifier or an enumerated attribute
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("`{construct}` should contain exactly one `{separator}`, found {found}")]
    SeparatorCount {
        separator: char,
        construct: &'static str,
        found: usize,
    },

    #[error("Failed to parse `{part}` part in `{construct}`: {outcome}")]
    InvalidPart {
        part: &'static str,
        construct: &'static str,
        outcome: ValidationOutcome,
    },

    #[error("Unknown separator `{0}`")]
    UnknownSeparator(char),

    #[error("Failed to parse value type `{0}`: value type should be either `Store` or `Numeric`")]
    InvalidValueType(String),

    #[error("Asset id should have format `asset#domain#account@domain`, got `{0}`")]
    AssetIdFormat(String),
}

impl ParseError {
    /// The ledger error kind the same text would be classified as
    pub fn stderr(&self) -> Option<Stderr> {
        Stderr::classify(&self.to_string())
    }
}
