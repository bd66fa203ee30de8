// Composite Identifiers
//
// `name@domain` for accounts, `name#domain` for asset definitions and
// `name$domain` for NFTs. Both halves must independently pass the name rules.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::require_valid;
use crate::config::NameRulesConfig;
use crate::error::ParseError;

/// Separator glyph of a composite identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Separator {
    /// `@` in `account@domain`
    Account,
    /// `#` in `asset#domain`
    Asset,
    /// `$` in `nft$domain`
    Nft,
}

impl Separator {
    pub const fn glyph(self) -> char {
        match self {
            Self::Account => '@',
            Self::Asset => '#',
            Self::Nft => '$',
        }
    }

    /// The construct this separator forms, as the ledger spells it
    pub const fn construct(self) -> &'static str {
        match self {
            Self::Account => "account@domain",
            Self::Asset => "asset#domain",
            Self::Nft => "name$domain",
        }
    }
}

impl TryFrom<char> for Separator {
    type Error = ParseError;

    fn try_from(glyph: char) -> Result<Self, Self::Error> {
        match glyph {
            '@' => Ok(Self::Account),
            '#' => Ok(Self::Asset),
            '$' => Ok(Self::Nft),
            other => Err(ParseError::UnknownSeparator(other)),
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// A local name and a domain name joined by a separator
///
/// Construction does not validate; call [`CompositeId::validate`] or build
/// through [`parse_composite`] for checked values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompositeId {
    local: String,
    domain: String,
    separator: Separator,
}

impl CompositeId {
    pub fn new(local: impl Into<String>, domain: impl Into<String>, separator: Separator) -> Self {
        Self {
            local: local.into(),
            domain: domain.into(),
            separator,
        }
    }

    pub fn local(&self) -> &str {
        &self.local
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn separator(&self) -> Separator {
        self.separator
    }

    /// Check both halves against the name rules
    pub fn validate(&self, config: &NameRulesConfig) -> Result<(), ParseError> {
        let construct = self.separator.construct();
        require_valid(&self.local, "name", construct, config)?;
        require_valid(&self.domain, "domain", construct, config)
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.local, self.separator.glyph(), self.domain)
    }
}

/// Parse `raw` with the default name rules
pub fn parse_composite(raw: &str, separator: Separator) -> Result<CompositeId, ParseError> {
    parse_composite_with(raw, separator, &NameRulesConfig::default())
}

/// Parse `raw` into a composite id split on `separator`
///
/// Fails unless the separator occurs exactly once and both halves are valid
/// names.
pub fn parse_composite_with(
    raw: &str,
    separator: Separator,
    config: &NameRulesConfig,
) -> Result<CompositeId, ParseError> {
    let glyph = separator.glyph();
    let found = raw.matches(glyph).count();
    let Some((local, domain)) = raw.split_once(glyph).filter(|_| found == 1) else {
        return Err(ParseError::SeparatorCount {
            separator: glyph,
            construct: separator.construct(),
            found,
        });
    };

    let id = CompositeId::new(local, domain, separator);
    id.validate(config)?;
    Ok(id)
}
