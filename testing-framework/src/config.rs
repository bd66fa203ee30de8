// File: testing-framework/src/config.rs
//
// Harness Configuration
//
// Timeouts, query retry policy and name rules for one test run. Loaded from
// YAML, then overridden from the environment so CI can tune a run without
// touching the checked-in file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use ledger_common::NameRulesConfig;
use serde::{Deserialize, Serialize};

/// Overrides `call_timeout_ms`
pub const CALL_TIMEOUT_ENV_VAR: &str = "LEDGER_CALL_TIMEOUT_MS";
/// Overrides `query_retry.max_attempts`
pub const QUERY_ATTEMPTS_ENV_VAR: &str = "LEDGER_QUERY_ATTEMPTS";

/// Backoff schedule for read-only presence queries
///
/// Mutating submits never go through this policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub multiplier: u32,
}

impl RetryPolicy {
    /// A policy that queries exactly once
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before attempt `attempt + 1`, where `attempt` counts from 1
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = u64::from(self.multiplier.max(1))
            .saturating_pow(attempt.saturating_sub(1));
        let ms = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff_ms: 50,
            max_backoff_ms: 1_000,
            multiplier: 2,
        }
    }
}

/// Everything a `TestScope` needs to know about the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Upper bound on any single ledger call
    pub call_timeout_ms: u64,
    pub query_retry: RetryPolicy,
    pub name_rules: NameRulesConfig,
    /// Where failed scenario reports are written, if anywhere
    pub artifact_dir: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: 10_000,
            query_retry: RetryPolicy::default(),
            name_rules: NameRulesConfig::default(),
            artifact_dir: None,
        }
    }
}

impl HarnessConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Parse a YAML document; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse harness config YAML")
    }

    /// Load a YAML config file and apply environment overrides
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read harness config: {}", path.display()))?;

        let config = Self::from_yaml_str(&contents)
            .with_context(|| format!("Invalid harness config: {}", path.display()))?;

        Ok(config.with_env_overrides())
    }

    /// Apply `LEDGER_CALL_TIMEOUT_MS` and `LEDGER_QUERY_ATTEMPTS`
    ///
    /// Unparseable values are logged and ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(CALL_TIMEOUT_ENV_VAR) {
            match raw.trim().parse() {
                Ok(ms) => self.call_timeout_ms = ms,
                Err(_) => log::warn!("Ignoring invalid {}={:?}", CALL_TIMEOUT_ENV_VAR, raw),
            }
        }

        if let Some(raw) = lookup(QUERY_ATTEMPTS_ENV_VAR) {
            match raw.trim().parse::<u32>() {
                Ok(attempts) if attempts > 0 => self.query_retry.max_attempts = attempts,
                _ => log::warn!("Ignoring invalid {}={:?}", QUERY_ATTEMPTS_ENV_VAR, raw),
            }
        }

        self
    }
}
