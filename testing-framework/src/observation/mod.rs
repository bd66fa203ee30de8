// File: testing-framework/src/observation/mod.rs
//
// Observation
//
// Predicates over ledger state and over the outcome of the last action,
// and the three-valued result of checking one.

/// Predicate evaluation against a live client
pub mod engine;

pub use engine::Observer;

use std::fmt;

use ledger_common::{EntityKind, Identifiable, Stderr};
use thiserror::Error;

use crate::client::InfrastructureError;

/// Something a test expects to be true
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// An entity with this identity exists
    Present { kind: EntityKind, identity: String },
    /// No entity with this identity exists
    Absent { kind: EntityKind, identity: String },
    /// The last submitted action failed with this kind
    FailedWith(Stderr),
    /// The last submitted action succeeded
    Succeeded,
    /// Every inner predicate holds
    All(Vec<Predicate>),
}

impl Predicate {
    /// Logical AND, flattening nested conjunctions
    pub fn and(self, other: Predicate) -> Predicate {
        let mut parts = match self {
            Predicate::All(parts) => parts,
            single => vec![single],
        };
        match other {
            Predicate::All(more) => parts.extend(more),
            single => parts.push(single),
        }
        Predicate::All(parts)
    }

    /// Leaf predicates in evaluation order
    pub fn leaves(&self) -> Vec<&Predicate> {
        match self {
            Predicate::All(parts) => parts.iter().flat_map(Predicate::leaves).collect(),
            leaf => vec![leaf],
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present { kind, identity } => write!(f, "have {kind} `{identity}`"),
            Self::Absent { kind, identity } => write!(f, "have no {kind} `{identity}`"),
            Self::FailedWith(kind) => write!(f, "have failed with {kind}"),
            Self::Succeeded => f.write_str("have succeeded"),
            Self::All(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" and ")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
        }
    }
}

/// Predicate constructors, read as `scope.should(&have::nft("cat$wonderland"))`
pub mod have {
    use super::*;

    fn present(kind: EntityKind, identity: impl Into<String>) -> Predicate {
        Predicate::Present {
            kind,
            identity: identity.into(),
        }
    }

    pub fn domain(identity: impl Into<String>) -> Predicate {
        present(EntityKind::Domain, identity)
    }

    pub fn account(identity: impl Into<String>) -> Predicate {
        present(EntityKind::Account, identity)
    }

    pub fn asset_definition(identity: impl Into<String>) -> Predicate {
        present(EntityKind::AssetDefinition, identity)
    }

    /// Full (`rose#wonderland#alice@wonderland`) or short (`rose##alice@wonderland`) form
    pub fn asset(identity: impl Into<String>) -> Predicate {
        present(EntityKind::Asset, identity)
    }

    pub fn nft(identity: impl Into<String>) -> Predicate {
        present(EntityKind::Nft, identity)
    }

    /// Presence of an entity built with the entity model
    pub fn entity<T: Identifiable>(entity: &T) -> Predicate {
        present(T::KIND, entity.identity().to_string())
    }

    /// Absence of `identity`
    pub fn no(kind: EntityKind, identity: impl Into<String>) -> Predicate {
        Predicate::Absent {
            kind,
            identity: identity.into(),
        }
    }

    pub fn no_entity<T: Identifiable>(entity: &T) -> Predicate {
        no(T::KIND, entity.identity().to_string())
    }

    pub fn failed_with(kind: Stderr) -> Predicate {
        Predicate::FailedWith(kind)
    }

    pub fn succeeded() -> Predicate {
        Predicate::Succeeded
    }
}

/// Observed state contradicts a predicate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {predicate}: wanted {expected}, observed {observed}")]
pub struct AssertionMismatch {
    pub predicate: String,
    pub expected: String,
    pub observed: String,
}

/// Error form of a non-passing [`AssertionResult`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssertionError {
    #[error("Assertion failed: {0}")]
    Mismatch(#[from] AssertionMismatch),

    #[error("Assertion inconclusive: {0}")]
    Inconclusive(#[from] InfrastructureError),
}

/// Result of checking one predicate
///
/// `Mismatch` is a statement about the ledger. `Inconclusive` means the
/// ledger could not be asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Mismatch(AssertionMismatch),
    Inconclusive(InfrastructureError),
}

impl AssertionResult {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch(_))
    }

    pub fn is_inconclusive(&self) -> bool {
        matches!(self, Self::Inconclusive(_))
    }

    pub fn into_result(self) -> Result<(), AssertionError> {
        match self {
            Self::Passed => Ok(()),
            Self::Mismatch(mismatch) => Err(AssertionError::Mismatch(mismatch)),
            Self::Inconclusive(err) => Err(AssertionError::Inconclusive(err)),
        }
    }
}

impl fmt::Display for AssertionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => f.write_str("passed"),
            Self::Mismatch(m) => write!(f, "mismatch: wanted {}, observed {}", m.expected, m.observed),
            Self::Inconclusive(err) => write!(f, "inconclusive: {err}"),
        }
    }
}
