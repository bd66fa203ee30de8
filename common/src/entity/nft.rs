// NFT entity

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{EntityKind, Identifiable};
use crate::config::NameRulesConfig;
use crate::error::ParseError;
use crate::names::{parse_composite, CompositeId, Separator};

/// Non fungible token identified as `name$domain`
///
/// `content` is an opaque JSON object. The name rules never look at it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nft {
    pub name: String,
    pub domain: String,
    pub content: String,
}

impl Nft {
    pub fn new(
        name: impl Into<String>,
        domain: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            content: content.into(),
        }
    }

    pub fn validate(&self, config: &NameRulesConfig) -> Result<(), ParseError> {
        self.identity().validate(config)
    }

    /// Decode the content as a key/value object
    pub fn content_map(&self) -> Result<Map<String, Value>, serde_json::Error> {
        parse_content(&self.content)
    }
}

/// Decode NFT content, treating blank input as an empty object
pub fn parse_content(raw: &str) -> Result<Map<String, Value>, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }
    serde_json::from_str(raw)
}

impl Identifiable for Nft {
    type Id = CompositeId;

    const KIND: EntityKind = EntityKind::Nft;

    fn identity(&self) -> CompositeId {
        CompositeId::new(&self.name, &self.domain, Separator::Nft)
    }
}

impl_identity_traits!(Nft);

impl FromStr for Nft {
    type Err = ParseError;

    /// Parse an NFT id into an NFT with empty content
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = parse_composite(s, Separator::Nft)?;
        Ok(Self::new(id.local(), id.domain(), "{}"))
    }
}
