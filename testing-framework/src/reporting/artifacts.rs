// File: testing-framework/src/reporting/artifacts.rs
//
// Scenario Report Artifacts
//
// A finished scope can be turned into a `ScenarioReport` and written to disk
// as pretty JSON, with the RNG seed needed to replay it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{ReportEvent, ScenarioContext};
use crate::orchestrator::rng::SEED_ENV_VAR;

/// Run metadata needed to reproduce a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMetadata {
    pub scenario_id: String,
    /// RNG seed used (if the scenario drew random names)
    pub rng_seed: Option<u64>,
    /// RFC 3339 time the scope was opened
    pub timestamp: String,
    pub duration_ms: u64,
    pub failure_reason: Option<String>,
}

/// Complete record of one scenario run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub metadata: ScenarioMetadata,
    pub context: ScenarioContext,
}

impl ScenarioReport {
    /// Report stamped with the current time; `TestScope::report` replaces the
    /// stamp with the time the scope was opened
    pub fn new(context: ScenarioContext) -> Self {
        Self {
            metadata: ScenarioMetadata {
                scenario_id: context.scenario_id.clone(),
                rng_seed: None,
                timestamp: chrono::Utc::now().to_rfc3339(),
                duration_ms: 0,
                failure_reason: None,
            },
            context,
        }
    }

    pub fn set_rng_seed(&mut self, seed: u64) {
        self.metadata.rng_seed = Some(seed);
    }

    pub fn set_failure_reason(&mut self, reason: impl Into<String>) {
        self.metadata.failure_reason = Some(reason.into());
    }

    /// A report passes when no assertion failed and no failure reason is set
    pub fn passed(&self) -> bool {
        self.metadata.failure_reason.is_none() && self.context.failed_assertions().next().is_none()
    }

    /// Save the report as `<scenario_id>_<timestamp>.json` under `output_dir`
    ///
    /// # Returns
    ///
    /// Path to the saved file
    pub async fn save(&self, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)
            .await
            .context("Failed to create artifact directory")?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%3f");
        let filename = format!("{}_{}.json", file_stem(&self.metadata.scenario_id), timestamp);
        let filepath = output_dir.join(filename);

        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;

        let mut file = fs::File::create(&filepath)
            .await
            .context("Failed to create report file")?;
        file.write_all(json.as_bytes())
            .await
            .context("Failed to write report data")?;
        file.flush().await.context("Failed to flush report file")?;

        log::info!("Scenario report saved to {}", filepath.display());
        Ok(filepath)
    }

    /// Load a report saved by [`ScenarioReport::save`]
    pub async fn load(filepath: impl AsRef<Path>) -> Result<Self> {
        let filepath = filepath.as_ref();
        let content = fs::read_to_string(filepath)
            .await
            .with_context(|| format!("Failed to read report file: {}", filepath.display()))?;

        serde_json::from_str(&content).context("Failed to parse report JSON")
    }

    /// Shell command that reruns the scenario with the same seed
    pub fn replay_command(&self) -> String {
        match self.metadata.rng_seed {
            Some(seed) => format!(
                "{}=0x{:016x} cargo test {} -- --exact --nocapture",
                SEED_ENV_VAR, seed, self.metadata.scenario_id
            ),
            None => format!(
                "cargo test {} -- --exact --nocapture",
                self.metadata.scenario_id
            ),
        }
    }

    /// Human readable multi-line summary
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Scenario: {}\n", self.metadata.scenario_id));
        if let Some(feature) = &self.context.feature {
            out.push_str(&format!("Feature:  {feature}\n"));
        }
        if let Some(story) = &self.context.story {
            out.push_str(&format!("Story:    {story}\n"));
        }
        out.push_str(&format!("Duration: {} ms\n", self.metadata.duration_ms));
        match self.metadata.rng_seed {
            Some(seed) => out.push_str(&format!("RNG seed: 0x{seed:016x}\n")),
            None => out.push_str("RNG seed: N/A\n"),
        }

        if let Some(reason) = &self.metadata.failure_reason {
            out.push_str("Failure:\n");
            for line in textwrap::wrap(reason, 72) {
                out.push_str(&format!("    {line}\n"));
            }
        }

        let failed: Vec<&ReportEvent> = self.context.failed_assertions().collect();
        if !failed.is_empty() {
            out.push_str("Failed assertions:\n");
            for event in failed {
                let text = textwrap::indent(&textwrap::fill(&event.to_string(), 72), "    ");
                out.push_str(&text);
                if !text.ends_with('\n') {
                    out.push('\n');
                }
            }
        }

        out.push_str(&format!("Replay: {}\n", self.replay_command()));
        out
    }
}

/// Keep file names portable whatever the scenario id contains
fn file_stem(scenario_id: &str) -> String {
    let stem: String = scenario_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "scenario".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing_report() -> ScenarioReport {
        let mut context = ScenarioContext::new("ghost_domain").with_feature("Domains");
        context.push(ReportEvent::Assertion {
            predicate: "have domain `ghost`".into(),
            result: "mismatch: expected present, observed absent".into(),
            passed: false,
        });
        let mut report = ScenarioReport::new(context);
        report.set_rng_seed(0xdeadbeef);
        report
    }

    #[test]
    fn test_passed() {
        assert!(ScenarioReport::new(ScenarioContext::new("ok")).passed());
        assert!(!failing_report().passed());

        let mut report = ScenarioReport::new(ScenarioContext::new("ok"));
        report.set_failure_reason("panicked");
        assert!(!report.passed());
    }

    #[test]
    fn test_replay_command() {
        let report = failing_report();
        assert_eq!(
            report.replay_command(),
            "LEDGER_TEST_SEED=0x00000000deadbeef cargo test ghost_domain -- --exact --nocapture"
        );

        let report = ScenarioReport::new(ScenarioContext::new("plain"));
        assert_eq!(report.replay_command(), "cargo test plain -- --exact --nocapture");
    }

    #[test]
    fn test_summary() {
        let summary = failing_report().summary();
        assert!(summary.contains("Scenario: ghost_domain"));
        assert!(summary.contains("Feature:  Domains"));
        assert!(summary.contains("RNG seed: 0x00000000deadbeef"));
        assert!(summary.contains("Failed assertions:"));
        assert!(summary.contains("    should have domain `ghost`"));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("nft/register cat"), "nft_register_cat");
        assert_eq!(file_stem(""), "scenario");
    }

    #[tokio::test]
    async fn test_save_and_load_report() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let mut report = failing_report();
        report.set_failure_reason("Assertion mismatch");

        let filepath = report.save(temp_dir.path()).await?;
        assert!(filepath.exists());

        let loaded = ScenarioReport::load(&filepath).await?;
        assert_eq!(loaded, report);
        assert_eq!(loaded.metadata.rng_seed, Some(0xdeadbeef));

        Ok(())
    }

    #[tokio::test]
    async fn test_load_garbage() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("bad.json");
        tokio::fs::write(&path, "not json").await.unwrap();
        assert!(ScenarioReport::load(&path).await.is_err());
    }
}
