//! YAML scenario parser
//!
//! A scenario is a genesis plus an ordered list of steps. A step is either an
//! action (`register_nft`, `mint`, ...) or an assertion (`assert_present`,
//! `assert_absent`, `assert_failed_with`, `assert_succeeded`), selected by its
//! `action` key.

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use ledger_common::{EntityKind, Stderr};
use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::observation::{have, Predicate};

/// Parsed scenario file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestScenario {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub feature: Option<String>,

    #[serde(default)]
    pub story: Option<String>,

    #[serde(default)]
    pub labels: IndexMap<String, String>,

    #[serde(default)]
    pub genesis: Genesis,

    pub steps: Vec<Step>,
}

/// Ledger state before the first step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Genesis {
    /// `name@domain` of the authority; `alice@wonderland` when absent
    pub authority: Option<String>,
    /// Extra domains besides the authority's
    pub domains: Vec<String>,
    /// Extra accounts as `name@domain`
    pub accounts: Vec<String>,
}

/// One scenario step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Assert(Assertion),
    Act(Action),
}

/// Assertion steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Assertion {
    AssertPresent { kind: EntityKind, id: String },
    AssertAbsent { kind: EntityKind, id: String },
    AssertFailedWith { error: Stderr },
    AssertSucceeded,
}

impl Assertion {
    pub fn predicate(&self) -> Predicate {
        match self {
            Self::AssertPresent { kind, id } => Predicate::Present {
                kind: *kind,
                identity: id.clone(),
            },
            Self::AssertAbsent { kind, id } => have::no(*kind, id.clone()),
            Self::AssertFailedWith { error } => have::failed_with(*error),
            Self::AssertSucceeded => have::succeeded(),
        }
    }
}

/// Parse a YAML scenario
///
/// # Errors
///
/// Returns an error if the YAML is malformed, a step is unknown, or the
/// scenario has no name or no steps.
pub fn parse_scenario(yaml: &str) -> Result<TestScenario> {
    let scenario: TestScenario =
        serde_yaml::from_str(yaml).context("Failed to parse scenario YAML")?;

    if scenario.name.trim().is_empty() {
        anyhow::bail!("Scenario name must not be empty");
    }
    if scenario.steps.is_empty() {
        anyhow::bail!("Scenario '{}' has no steps", scenario.name);
    }

    Ok(scenario)
}

/// Read and parse a scenario file
pub async fn load_scenario(path: impl AsRef<Path>) -> Result<TestScenario> {
    let path = path.as_ref();
    let yaml = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
    parse_scenario(&yaml).with_context(|| format!("Invalid scenario file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_steps() {
        let yaml = r#"
name: "Register NFT"
feature: "NFTs"
labels:
  tier: acceptance
genesis:
  domains: ["garden"]
  accounts: ["bob@garden"]
steps:
  - action: register_nft
    name: cute_cat
    domain: wonderland
    content: '{"color": "grey"}'
  - action: assert_succeeded
  - action: assert_present
    kind: nft
    id: cute_cat$wonderland
  - action: register_nft
    name: bad@name
    domain: wonderland
  - action: assert_failed_with
    error: reserved_character
"#;
        let scenario = parse_scenario(yaml).unwrap();
        assert_eq!(scenario.name, "Register NFT");
        assert_eq!(scenario.feature.as_deref(), Some("NFTs"));
        assert_eq!(scenario.labels.get("tier").map(String::as_str), Some("acceptance"));
        assert_eq!(scenario.genesis.accounts, vec!["bob@garden"]);
        assert_eq!(scenario.steps.len(), 5);

        assert!(matches!(
            &scenario.steps[0],
            Step::Act(Action::RegisterNft { name, .. }) if name == "cute_cat"
        ));
        assert_eq!(
            scenario.steps[1],
            Step::Assert(Assertion::AssertSucceeded)
        );
        assert_eq!(
            scenario.steps[4],
            Step::Assert(Assertion::AssertFailedWith {
                error: Stderr::ReservedCharacter
            })
        );
    }

    #[test]
    fn test_assertion_predicates() {
        let assertion = Assertion::AssertPresent {
            kind: EntityKind::Nft,
            id: "cat$wonderland".into(),
        };
        assert_eq!(assertion.predicate(), have::nft("cat$wonderland"));

        let assertion = Assertion::AssertAbsent {
            kind: EntityKind::Domain,
            id: "ghost".into(),
        };
        assert_eq!(assertion.predicate(), have::no(EntityKind::Domain, "ghost"));
    }

    #[test]
    fn test_numeric_steps() {
        let yaml = r#"
name: "Mint"
steps:
  - action: mint
    asset: "rose##alice@wonderland"
    quantity: 10
  - action: set_nft_key_value
    nft: "cat$wonderland"
    key: age
    value: 3
  - action: remove_nft_key_value
    nft: "cat$wonderland"
    key: age
"#;
        let scenario = parse_scenario(yaml).unwrap();
        assert_eq!(
            scenario.steps[0],
            Step::Act(Action::Mint {
                asset: "rose##alice@wonderland".into(),
                quantity: 10,
            })
        );
        assert!(matches!(
            &scenario.steps[1],
            Step::Act(Action::SetNftKeyValue { value, .. }) if *value == serde_json::json!(3)
        ));
        assert_eq!(
            scenario.steps[2],
            Step::Act(Action::RemoveNftKeyValue {
                nft: "cat$wonderland".into(),
                key: "age".into(),
            })
        );
    }

    #[test]
    fn test_rejects_bad_scenarios() {
        assert!(parse_scenario("name: x\nsteps: []\n").is_err());
        assert!(parse_scenario("name: ''\nsteps:\n  - action: assert_succeeded\n").is_err());
        assert!(parse_scenario("name: x\nsteps:\n  - action: fly_to_moon\n").is_err());
        assert!(parse_scenario("not: [valid").is_err());
    }
}
