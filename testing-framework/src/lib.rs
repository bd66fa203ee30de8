//! # Ledger Acceptance Testing Framework
//!
//! Action/observation DSL for acceptance tests of a permissioned ledger's
//! namespace and asset rules.
//!
//! ## Architecture Overview
//!
//! - **actions**: staged mutating instructions and their `Outcome`
//! - **observation**: `have::*` predicates evaluated against ledger state
//! - **client**: the `LedgerClient` boundary plus an in-memory ledger
//! - **harness**: `TestScope`, the per-test state tying both together
//! - **reporting**: structured scenario context and saved failure reports
//! - **scenarios**: YAML scenario parser and executor
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ledger_testing_framework::prelude::*;
//!
//! #[tokio::test]
//! async fn test_register_nft() -> anyhow::Result<()> {
//!     let ledger = Arc::new(InMemoryLedger::builder().build());
//!     let mut scope = TestScope::new(ledger, "register_nft");
//!
//!     scope.register().nft("cute_cat", "wonderland").submit().await;
//!     scope.should(&have::nft("cute_cat$wonderland")).await.into_result()?;
//!
//!     scope.register().nft("bad@name", "wonderland").submit().await;
//!     scope
//!         .should(&have::failed_with(Stderr::ReservedCharacter))
//!         .await
//!         .into_result()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: injected clock and seeded RNG
//! 2. **Three-valued assertions**: a timeout is never reported as a mismatch
//! 3. **Mutations run once**: only presence queries are retried

#![warn(clippy::all)]

/// Core orchestration - provides Clock, RNG, deterministic environment
pub mod orchestrator;

/// Harness configuration (timeouts, retry policy, name rules)
pub mod config;

/// Ledger client boundary and the in-memory ledger
pub mod client;

/// Mutating actions and their outcomes
pub mod actions;

/// Predicates and assertion evaluation
pub mod observation;

/// Per-test scope
pub mod harness;

/// Random valid and invalid names
pub mod fixtures;

/// Scenario context, report sinks and saved reports
pub mod reporting;

// DSL scenario parser and executor
pub mod scenarios;

// Convenient re-exports for common usage
pub mod prelude;

// Re-export commonly used types at crate root
pub use harness::TestScope;
pub use orchestrator::{Clock, DeterministicTestEnv, PausedClock, SystemClock, TestRng};
