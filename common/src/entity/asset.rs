// Asset definitions and assets

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Account, EntityKind, Identifiable};
use crate::config::NameRulesConfig;
use crate::error::ParseError;
use crate::names::{parse_composite_with, CompositeId, Separator};

/// What kind of value an asset definition holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetValueType {
    /// Key/value store
    Store,
    /// Quantity that can be minted, burned and transferred
    Numeric,
}

impl FromStr for AssetValueType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Store" => Ok(Self::Store),
            "Numeric" => Ok(Self::Numeric),
            other => Err(ParseError::InvalidValueType(other.to_string())),
        }
    }
}

impl fmt::Display for AssetValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store => f.write_str("Store"),
            Self::Numeric => f.write_str("Numeric"),
        }
    }
}

/// Definition of an asset, identified as `name#domain`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDefinition {
    pub name: String,
    pub domain: String,
    pub value_type: AssetValueType,
}

impl AssetDefinition {
    pub fn new(
        name: impl Into<String>,
        domain: impl Into<String>,
        value_type: AssetValueType,
    ) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            value_type,
        }
    }

    pub fn validate(&self, config: &NameRulesConfig) -> Result<(), ParseError> {
        self.identity().validate(config)
    }
}

impl Identifiable for AssetDefinition {
    type Id = CompositeId;

    const KIND: EntityKind = EntityKind::AssetDefinition;

    fn identity(&self) -> CompositeId {
        CompositeId::new(&self.name, &self.domain, Separator::Asset)
    }
}

impl_identity_traits!(AssetDefinition);

/// Identity of an asset: its definition held by an account
///
/// Rendered in the full form `rose#wonderland#alice@wonderland`. Parsing also
/// accepts the short form `rose##alice@wonderland`, where the definition
/// shares the owner's domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId {
    pub definition: CompositeId,
    pub owner: CompositeId,
}

impl AssetId {
    pub fn new(definition: CompositeId, owner: CompositeId) -> Self {
        Self { definition, owner }
    }

    pub fn validate(&self, config: &NameRulesConfig) -> Result<(), ParseError> {
        self.definition.validate(config)?;
        self.owner.validate(config)
    }

    /// Parse with custom name rules
    pub fn parse_with(raw: &str, config: &NameRulesConfig) -> Result<Self, ParseError> {
        let format_error = || ParseError::AssetIdFormat(raw.to_string());
        let (name, rest) = raw.split_once('#').ok_or_else(format_error)?;
        let (definition_domain, owner) = rest.split_once('#').ok_or_else(format_error)?;

        let owner = parse_composite_with(owner, Separator::Account, config)?;
        let definition_domain = if definition_domain.is_empty() {
            owner.domain()
        } else {
            definition_domain
        };
        let definition = CompositeId::new(name, definition_domain, Separator::Asset);
        definition.validate(config)?;

        Ok(Self::new(definition, owner))
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.definition, self.owner)
    }
}

impl FromStr for AssetId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, &NameRulesConfig::default())
    }
}

/// An asset definition instantiated under an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub definition: CompositeId,
    pub owner: CompositeId,
    /// Only meaningful for numeric definitions
    pub quantity: u64,
}

impl Asset {
    pub fn new(definition: &AssetDefinition, owner: &Account, quantity: u64) -> Self {
        Self {
            definition: definition.identity(),
            owner: owner.identity(),
            quantity,
        }
    }

    pub fn validate(&self, config: &NameRulesConfig) -> Result<(), ParseError> {
        self.identity().validate(config)
    }
}

impl Identifiable for Asset {
    type Id = AssetId;

    const KIND: EntityKind = EntityKind::Asset;

    fn identity(&self) -> AssetId {
        AssetId::new(self.definition.clone(), self.owner.clone())
    }
}

impl_identity_traits!(Asset);
