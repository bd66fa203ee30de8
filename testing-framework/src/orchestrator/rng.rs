// File: testing-framework/src/orchestrator/rng.rs
//
// Seeded RNG
//
// Every random name a test uses comes from a TestRng. The seed is printed
// when the RNG is created so a failing run can be replayed exactly.

use parking_lot::Mutex;
use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::distributions::{Distribution, Standard};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Environment variable that pins the seed
pub const SEED_ENV_VAR: &str = "LEDGER_TEST_SEED";

/// Deterministic, shareable random number generator
pub struct TestRng {
    seed: u64,
    inner: Mutex<StdRng>,
}

impl TestRng {
    /// Create an RNG from a known seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            inner: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Seed from `LEDGER_TEST_SEED` if set, otherwise pick one at random
    ///
    /// The seed accepts decimal or `0x`-prefixed hex.
    pub fn new_from_env_or_random() -> Self {
        let seed = match std::env::var(SEED_ENV_VAR) {
            Ok(raw) => match parse_seed(&raw) {
                Some(seed) => seed,
                None => {
                    log::warn!("Ignoring unparseable {}={:?}", SEED_ENV_VAR, raw);
                    random_seed()
                }
            },
            Err(_) => random_seed(),
        };

        log::info!("TestRng seed: 0x{:016x}", seed);
        eprintln!("TestRng seed: 0x{:016x}", seed);
        eprintln!("   Replay: {}=0x{:016x} cargo test ...", SEED_ENV_VAR, seed);

        Self::with_seed(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn gen<T>(&self) -> T
    where
        Standard: Distribution<T>,
    {
        self.inner.lock().gen()
    }

    pub fn gen_range<T, R>(&self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.inner.lock().gen_range(range)
    }

    pub fn gen_bool(&self, p: f64) -> bool {
        self.inner.lock().gen_bool(p)
    }

    /// Pick one element, `None` for an empty slice
    pub fn choose<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.gen_range(0..items.len());
        items.get(idx)
    }
}

fn parse_seed(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

fn random_seed() -> u64 {
    // Zero is reserved so a printed seed is never mistaken for "unset"
    rand::random::<u64>().max(1)
}
