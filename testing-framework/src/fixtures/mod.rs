// File: testing-framework/src/fixtures/mod.rs
//
// Random Name Fixtures
//
// Tests draw names from a `NameSource` instead of hard-coding them, so a run
// never collides with state left by an earlier one. Edge cases produce names
// that break exactly one rule.

use std::sync::Arc;

use ledger_common::names::ReservedChars;
use ledger_common::{validate_with, NameRulesConfig, ValidationOutcome};
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::orchestrator::TestRng;

/// A name built to break one specific rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum EdgeCase {
    Empty,
    TooLong,
    ReservedCharacter,
    Whitespace,
    InvalidCharacter,
    Repetition,
}

impl EdgeCase {
    /// The validation outcome a name of this case produces
    pub fn expected_outcome(self) -> ValidationOutcome {
        match self {
            Self::Empty => ValidationOutcome::Empty,
            Self::TooLong => ValidationOutcome::TooLong,
            Self::ReservedCharacter => ValidationOutcome::ReservedCharacter,
            Self::Whitespace => ValidationOutcome::Whitespace,
            Self::InvalidCharacter => ValidationOutcome::InvalidCharacter,
            Self::Repetition => ValidationOutcome::Repetition,
        }
    }
}

/// Provider of names for test entities
pub trait NameSource {
    /// A valid bare name
    fn name(&mut self) -> String;

    /// A valid name suited to a domain
    fn domain(&mut self) -> String {
        self.name()
    }

    /// A name that fails validation with `case`
    ///
    /// Returns `None` when the configured rules make the case impossible,
    /// such as `Repetition` with the run check disabled.
    fn edge_case(&mut self, case: EdgeCase) -> Option<String>;
}

const WORDS: &[&str] = &[
    "amber", "birch", "cedar", "delta", "ember", "fjord", "gale", "heron", "iris", "juniper",
    "kelp", "lotus", "maple", "nectar", "opal", "prism", "quartz", "raven", "sable", "thorn",
    "umber", "violet", "willow", "yarrow", "zephyr",
];

const WHITESPACE: &[char] = &[' ', '\t', '\n', '\u{a0}', '\u{3000}'];
const INVALID: &[char] = &['!', '%', '&', '*', '/', '?', '\u{7}', '😀'];

/// Draws before `FakeNames::name` gives up on random candidates
const MAX_NAME_ATTEMPTS: usize = 32;

/// Seeded random names
///
/// Valid names are a word plus a numeric suffix, such as `heron_4821`.
pub struct FakeNames {
    rng: Arc<TestRng>,
    rules: NameRulesConfig,
}

impl FakeNames {
    pub fn new(rng: Arc<TestRng>, rules: NameRulesConfig) -> Self {
        Self { rng, rules }
    }

    pub fn rules(&self) -> &NameRulesConfig {
        &self.rules
    }

    fn word(&self) -> &'static str {
        self.rng.choose(WORDS).copied().unwrap_or("name")
    }

    fn pick(&self, chars: &[char]) -> char {
        self.rng.choose(chars).copied().unwrap_or('!')
    }

    /// Insert `c` somewhere inside a valid name
    fn with_inserted(&mut self, c: char) -> String {
        let mut chars: Vec<char> = self.name().chars().collect();
        let at = self.rng.gen_range(0..=chars.len());
        chars.insert(at, c);
        let candidate: String = chars.into_iter().collect();
        // Inserting must not push the name over the length limit first
        if candidate.chars().count() > self.rules.max_length {
            c.to_string()
        } else {
            candidate
        }
    }

    fn too_long(&mut self) -> String {
        let mut out = String::new();
        while out.chars().count() <= self.rules.max_length {
            out.push_str(self.word());
        }
        out
    }

    fn candidate(&self) -> String {
        let suffix: u16 = self.rng.gen_range(0..10_000);
        let candidate = format!("{}_{}", self.word(), suffix);
        if candidate.chars().count() <= self.rules.max_length {
            candidate
        } else {
            // Tight limits: fall back to a prefix that still starts with a letter
            candidate.chars().take(self.rules.max_length.max(1)).collect()
        }
    }

    /// Distinct letters in a row, valid under any run limit of one or more
    fn distinct_letters(&self) -> String {
        let offset = self.rng.gen_range(0..26u8);
        (0..self.rules.max_length.clamp(1, 8))
            .map(|i| char::from(b'a' + (offset + i as u8) % 26))
            .collect()
    }

    fn repetition(&mut self) -> Option<String> {
        let run = self.rules.max_repeated_run? + 1;
        let word = self.word();
        let c = word.chars().next().unwrap_or('a');
        let candidate = format!("{word}{}", c.to_string().repeat(run));
        (candidate.chars().count() <= self.rules.max_length)
            .then_some(candidate)
            .or_else(|| {
                let bare = c.to_string().repeat(run);
                (bare.chars().count() <= self.rules.max_length).then_some(bare)
            })
    }
}

impl NameSource for FakeNames {
    fn name(&mut self) -> String {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let candidate = self.candidate();
            if validate_with(&candidate, &self.rules) == ValidationOutcome::Valid {
                return candidate;
            }
        }
        let fallback = self.distinct_letters();
        log::debug!(
            "No valid random name in {} draws, using {:?}",
            MAX_NAME_ATTEMPTS,
            fallback
        );
        fallback
    }

    fn edge_case(&mut self, case: EdgeCase) -> Option<String> {
        let candidate = match case {
            EdgeCase::Empty => String::new(),
            EdgeCase::TooLong => self.too_long(),
            EdgeCase::ReservedCharacter => {
                let reserved: Vec<char> = ReservedChars::SPECIAL.chars().collect();
                let c = self.pick(&reserved);
                self.with_inserted(c)
            }
            EdgeCase::Whitespace => {
                let c = self.pick(WHITESPACE);
                self.with_inserted(c)
            }
            EdgeCase::InvalidCharacter => {
                let c = self.pick(INVALID);
                self.with_inserted(c)
            }
            EdgeCase::Repetition => self.repetition()?,
        };

        // Only hand out names that really trip the intended rule
        (validate_with(&candidate, &self.rules) == case.expected_outcome()).then_some(candidate)
    }
}
