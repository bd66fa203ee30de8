//! YAML scenario execution engine
//!
//! Runs a parsed scenario through a `TestScope`, against the in-memory
//! ledger by default or against any `LedgerClient`.
//!
//! # Example
//!
//! ```rust,ignore
//! use ledger_testing_framework::scenarios::{parse_scenario, ScenarioExecutor};
//!
//! let yaml = r#"
//! name: "Register NFT"
//! steps:
//!   - action: register_nft
//!     name: cute_cat
//!     domain: wonderland
//!   - action: assert_present
//!     kind: nft
//!     id: cute_cat$wonderland
//! "#;
//!
//! let scenario = parse_scenario(yaml)?;
//! let mut executor = ScenarioExecutor::new();
//! let report = executor.execute(scenario).await?;
//!
//! assert!(report.report.passed());
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use ledger_common::{parse_composite, Separator};

use super::parser::{Step, TestScenario};
use crate::client::{InMemoryLedger, LedgerClient};
use crate::config::HarnessConfig;
use crate::harness::TestScope;
use crate::orchestrator::{Clock, SystemClock};
use crate::reporting::{LogSink, ReportEvent, ReportSink, ScenarioContext, ScenarioReport};

/// Scenario executor that runs parsed YAML scenarios
pub struct ScenarioExecutor {
    config: HarnessConfig,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn ReportSink>,

    /// Execution log
    log: Vec<String>,

    /// Current step number (1-indexed)
    current_step: usize,
}

impl ScenarioExecutor {
    pub fn new() -> Self {
        Self {
            config: HarnessConfig::default(),
            clock: Arc::new(SystemClock),
            sink: Arc::new(LogSink),
            log: Vec::new(),
            current_step: 0,
        }
    }

    pub fn with_config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Build an in-memory ledger from the scenario genesis and run against it
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The genesis contains a malformed account id
    /// - Any assertion fails or is inconclusive
    pub async fn execute(&mut self, scenario: TestScenario) -> Result<ExecutionReport> {
        let ledger = self.build_genesis(&scenario)?;
        self.execute_against(scenario, Arc::new(ledger)).await
    }

    /// Run a scenario against an existing client, ignoring its genesis
    pub async fn execute_against<C: LedgerClient + ?Sized>(
        &mut self,
        scenario: TestScenario,
        client: Arc<C>,
    ) -> Result<ExecutionReport> {
        self.log.clear();
        self.current_step = 0;

        self.log(format!("Starting scenario: {}", scenario.name));
        if let Some(desc) = &scenario.description {
            self.log(format!("Description: {}", desc));
        }

        let mut scope = TestScope::new(client, scenario.name.clone())
            .with_config(self.config.clone())
            .with_clock(self.clock.clone())
            .with_sink(self.sink.clone())
            .with_context(Self::context_for(&scenario));

        for (idx, step) in scenario.steps.iter().enumerate() {
            self.current_step = idx + 1;

            match step {
                Step::Act(action) => {
                    scope.step(format!("Step {}: {}", self.current_step, action));
                    let outcome = scope.action(action.clone()).submit().await;
                    self.log(format!(
                        "Step {}: {} -> {}",
                        self.current_step, action, outcome
                    ));
                }
                Step::Assert(assertion) => {
                    let predicate = assertion.predicate();
                    scope.step(format!("Step {}: should {}", self.current_step, predicate));
                    let result = scope.should(&predicate).await;
                    self.log(format!(
                        "Step {}: should {} -> {}",
                        self.current_step, predicate, result
                    ));

                    if let Err(err) = result.into_result() {
                        self.save_failure(scope.report()).await;
                        return Err(err).with_context(|| {
                            format!("Failed at step {} (should {})", self.current_step, predicate)
                        });
                    }
                }
            }
        }

        self.log("=== Scenario completed successfully ===".to_string());

        Ok(ExecutionReport {
            scenario_name: scenario.name,
            steps_executed: self.current_step,
            log: self.log.clone(),
            report: scope.report(),
        })
    }

    fn context_for(scenario: &TestScenario) -> ScenarioContext {
        let mut context = ScenarioContext::new(scenario.name.clone());
        if let Some(feature) = &scenario.feature {
            context = context.with_feature(feature.clone());
        }
        if let Some(story) = &scenario.story {
            context = context.with_story(story.clone());
        }
        for (key, value) in &scenario.labels {
            context = context.with_label(key.clone(), value.clone());
        }
        context
    }

    fn build_genesis(&mut self, scenario: &TestScenario) -> Result<InMemoryLedger> {
        self.log("Setting up genesis...".to_string());

        let mut builder = InMemoryLedger::builder()
            .with_rules(self.config.name_rules.clone())
            .with_clock(self.clock.clone());

        if let Some(authority) = &scenario.genesis.authority {
            let id = parse_composite(authority, Separator::Account)
                .with_context(|| format!("Invalid genesis authority '{}'", authority))?;
            builder = builder.with_authority(id.local(), id.domain());
            self.log(format!("  Authority: {}", id));
        }

        for domain in &scenario.genesis.domains {
            builder = builder.with_domain(domain.clone());
            self.log(format!("  Domain: {}", domain));
        }

        for account in &scenario.genesis.accounts {
            let id = parse_composite(account, Separator::Account)
                .with_context(|| format!("Invalid genesis account '{}'", account))?;
            builder = builder.with_account(id.local(), id.domain());
            self.log(format!("  Account: {}", id));
        }

        Ok(builder.build())
    }

    async fn save_failure(&mut self, report: ScenarioReport) {
        let Some(dir) = self.config.artifact_dir.clone() else {
            return;
        };
        match report.save(&dir).await {
            Ok(path) => self.log(format!("Report saved to {}", path.display())),
            Err(err) => log::warn!("Failed to save scenario report: {:#}", err),
        }
    }

    /// Add log entry
    fn log(&mut self, message: String) {
        self.log.push(message);
    }

    /// Get execution log
    pub fn get_log(&self) -> &[String] {
        &self.log
    }
}

impl Default for ScenarioExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// Execution report
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub scenario_name: String,

    /// Number of steps executed
    pub steps_executed: usize,

    /// Execution log
    pub log: Vec<String>,

    /// Reporting context and metadata of the run
    pub report: ScenarioReport,
}

impl ExecutionReport {
    /// Print report to stdout
    pub fn print(&self) {
        println!("\n╔════════════════════════════════════════════════════════════╗");
        println!("║  Scenario Execution Report                                 ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║  Name: {:<50} ║", self.scenario_name);
        println!("║  Steps: {:<48} ║", self.steps_executed);
        println!(
            "║  Assertions: {:<43} ║",
            self.report
                .context
                .events
                .iter()
                .filter(|event| matches!(event, ReportEvent::Assertion { .. }))
                .count()
        );
        println!("╚════════════════════════════════════════════════════════════╝\n");

        println!("Execution Log:");
        println!("═════════════");
        for entry in &self.log {
            println!("{}", entry);
        }
    }
}
