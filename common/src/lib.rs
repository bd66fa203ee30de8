// Allow some clippy lints shared with the rest of the workspace
#![allow(clippy::module_inception)]
#![allow(clippy::upper_case_acronyms)]

pub mod config;
pub mod entity;
pub mod error;
pub mod names;

pub use config::NameRulesConfig;
pub use entity::{
    Account, Asset, AssetDefinition, AssetId, AssetValueType, Domain, EntityKind, Identifiable,
    Nft,
};
pub use error::{ParseError, Stderr};
pub use names::{parse_composite, validate, validate_with, CompositeId, Separator, ValidationOutcome};
