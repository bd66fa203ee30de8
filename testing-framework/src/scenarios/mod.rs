//! DSL scenario parser and executor
//!
//! Scenarios are YAML files. Steps alternate between actions, which mutate
//! the ledger, and assertions, which check the last outcome or ledger state.
//!
//! ## Example Scenario
//!
//! ```yaml
//! name: "Register NFT"
//! feature: "NFTs"
//! genesis:
//!   authority: "alice@wonderland"
//!   accounts: ["bob@wonderland"]
//! steps:
//!   - action: register_nft
//!     name: cute_cat
//!     domain: wonderland
//!     content: '{"color": "grey"}'
//!   - action: assert_present
//!     kind: nft
//!     id: cute_cat$wonderland
//!   - action: register_nft
//!     name: bad@name
//!     domain: wonderland
//!   - action: assert_failed_with
//!     error: reserved_character
//! ```

pub mod executor;
pub mod parser;

pub use executor::{ExecutionReport, ScenarioExecutor};
pub use parser::{load_scenario, parse_scenario, Assertion, Genesis, Step, TestScenario};
