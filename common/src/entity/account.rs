// Account entity

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{EntityKind, Identifiable};
use crate::config::NameRulesConfig;
use crate::error::ParseError;
use crate::names::{parse_composite, CompositeId, Separator};

/// An account living in a domain, identified as `name@domain`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub domain: String,
}

impl Account {
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
        }
    }

    pub fn validate(&self, config: &NameRulesConfig) -> Result<(), ParseError> {
        self.identity().validate(config)
    }
}

impl Identifiable for Account {
    type Id = CompositeId;

    const KIND: EntityKind = EntityKind::Account;

    fn identity(&self) -> CompositeId {
        CompositeId::new(&self.name, &self.domain, Separator::Account)
    }
}

impl_identity_traits!(Account);

impl FromStr for Account {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = parse_composite(s, Separator::Account)?;
        Ok(Self::new(id.local(), id.domain()))
    }
}
