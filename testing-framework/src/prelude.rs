//! Common imports for acceptance tests
//!
//! ```rust,ignore
//! use ledger_testing_framework::prelude::*;
//! ```

pub use std::sync::Arc;
pub use std::time::Duration;

pub use ledger_common::{
    Account, Asset, AssetDefinition, AssetId, AssetValueType, CompositeId, Domain, EntityKind,
    Identifiable, NameRulesConfig, Nft, Separator, Stderr, ValidationOutcome,
};

pub use crate::actions::{Action, Failure, Outcome};
pub use crate::client::{
    InMemoryLedger, InfrastructureError, LedgerClient, QueryFilter, Rejection,
};
pub use crate::config::{HarnessConfig, RetryPolicy};
pub use crate::fixtures::{EdgeCase, FakeNames, NameSource};
pub use crate::harness::TestScope;
pub use crate::observation::{have, AssertionError, AssertionResult, Predicate};
pub use crate::orchestrator::{Clock, DeterministicTestEnv, PausedClock, SystemClock, TestRng};
pub use crate::reporting::{MemorySink, ReportSink, ScenarioContext, ScenarioReport};
pub use crate::scenarios::{parse_scenario, ScenarioExecutor};
