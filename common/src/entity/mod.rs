// Entity Model
//
// Immutable snapshots of ledger entities as a test author describes them.
// Constructors never validate so that deliberately broken entities can be
// sent to the ledger; validation is an explicit, separate step.

/// Derive `PartialEq`, `Eq`, `Hash` and `Display` from `Identifiable::identity`
macro_rules! impl_identity_traits {
    ($ty:ty) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $crate::entity::Identifiable::identity(self)
                    == $crate::entity::Identifiable::identity(other)
            }
        }

        impl Eq for $ty {}

        impl std::hash::Hash for $ty {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                std::hash::Hash::hash(&$crate::entity::Identifiable::identity(self), state)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", $crate::entity::Identifiable::identity(self))
            }
        }
    };
}

mod account;
mod asset;
mod domain;
mod nft;

pub use account::*;
pub use asset::*;
pub use domain::*;
pub use nft::*;

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Kind of ledger entity, used to address queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Domain,
    Account,
    AssetDefinition,
    Asset,
    Nft,
}

impl EntityKind {
    /// Canonical text of an identity of this kind
    ///
    /// Parses `raw` and renders it back, so equivalent spellings (such as the
    /// short `rose##alice@wonderland` asset form) compare equal. Unparseable
    /// input is returned unchanged.
    pub fn canonicalize(self, raw: &str) -> String {
        match self {
            Self::Asset => raw
                .parse::<AssetId>()
                .map(|id| id.to_string())
                .unwrap_or_else(|_| raw.to_string()),
            _ => raw.to_string(),
        }
    }
}

/// Anything with a ledger identity
///
/// Equality and hashing of entities go through the identity, never through
/// the remaining attributes.
pub trait Identifiable {
    type Id: fmt::Display + Clone + Eq + std::hash::Hash;

    const KIND: EntityKind;

    fn identity(&self) -> Self::Id;
}
