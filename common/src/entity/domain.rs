// Domain entity

use serde::{Deserialize, Serialize};

use super::{EntityKind, Identifiable};
use crate::config::NameRulesConfig;
use crate::error::ParseError;
use crate::names::require_valid;

/// A namespace grouping accounts, asset definitions and NFTs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
}

impl Domain {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Check the name against the rules
    pub fn validate(&self, config: &NameRulesConfig) -> Result<(), ParseError> {
        require_valid(&self.name, "domain", "domain", config)
    }
}

impl Identifiable for Domain {
    type Id = String;

    const KIND: EntityKind = EntityKind::Domain;

    fn identity(&self) -> String {
        self.name.clone()
    }
}

impl_identity_traits!(Domain);
