// File: testing-framework/src/orchestrator/mod.rs
//
// Orchestrator Module
//
// Owns every source of non-determinism a test touches: time (for query
// backoff and simulated latency) and randomness (for fuzzed names).

/// Clock abstractions for deterministic time control in tests
pub mod clock;
/// Deterministic random number generation for reproducible tests
pub mod rng;

use std::sync::Arc;

use ledger_common::NameRulesConfig;

use crate::fixtures::FakeNames;

/// Clock and RNG bundled for one test
///
/// # Examples
///
/// ```rust,ignore
/// use ledger_testing_framework::orchestrator::DeterministicTestEnv;
///
/// #[tokio::test]
/// async fn test_random_domain() {
///     let env = DeterministicTestEnv::new_time_paused();
///     let mut names = env.names(NameRulesConfig::default());
///     let domain = names.name();
///     // register `domain`, observe it...
///     if failed {
///         env.on_failure();
///     }
/// }
/// ```
pub struct DeterministicTestEnv {
    /// Clock for time control (SystemClock against a node, PausedClock in tests)
    pub clock: Arc<dyn Clock>,

    /// Seeded RNG for reproducible names
    pub rng: Arc<TestRng>,
}

impl DeterministicTestEnv {
    /// Paused time, seed from `LEDGER_TEST_SEED` or random
    ///
    /// Pauses tokio time, so the runtime must not already be paused.
    pub fn new_time_paused() -> Self {
        Self {
            clock: Arc::new(clock::PausedClock::new()),
            rng: Arc::new(rng::TestRng::new_from_env_or_random()),
        }
    }

    /// Paused time with a specific seed
    pub fn new_time_paused_with_seed(seed: u64) -> Self {
        Self {
            clock: Arc::new(clock::PausedClock::new()),
            rng: Arc::new(rng::TestRng::with_seed(seed)),
        }
    }

    /// Real time with a specific seed, for runs against a live node
    pub fn with_seed(seed: u64) -> Self {
        Self {
            clock: Arc::new(clock::SystemClock),
            rng: Arc::new(rng::TestRng::with_seed(seed)),
        }
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Random name provider sharing this environment's RNG
    pub fn names(&self, rules: NameRulesConfig) -> FakeNames {
        FakeNames::new(self.rng.clone(), rules)
    }

    /// Print replay instructions for a failed run
    pub fn on_failure(&self) {
        eprintln!("❌ Test failed! Replay with:");
        eprintln!(
            "   {}=0x{:016x} cargo test ...",
            rng::SEED_ENV_VAR,
            self.rng.seed()
        );
    }
}

// Re-export key types for convenience
pub use clock::{Clock, PausedClock, SystemClock};
pub use rng::TestRng;
