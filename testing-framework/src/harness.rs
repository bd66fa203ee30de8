// File: testing-framework/src/harness.rs
//
// Test Scope
//
// One `TestScope` per test. It holds the client, config and clock, remembers
// the outcome of the last submitted action, and owns the reporting context.
// Actions and observations are both issued through it.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use ledger_common::Stderr;
use tokio::time::Instant;

use crate::actions::{Action, Outcome, RegisterBuilder, StagedAction, UnregisterBuilder};
use crate::client::LedgerClient;
use crate::config::HarnessConfig;
use crate::observation::{AssertionResult, Observer, Predicate};
use crate::orchestrator::{Clock, DeterministicTestEnv, SystemClock};
use crate::reporting::{LogSink, ReportEvent, ReportSink, ScenarioContext, ScenarioReport};

/// Per-test state tying actions and observations together
///
/// # Examples
///
/// ```rust,ignore
/// let ledger = Arc::new(InMemoryLedger::builder().build());
/// let mut scope = TestScope::new(ledger, "register_nft");
///
/// scope.step("Register a cat");
/// scope.register().nft("cute_cat", "wonderland").submit().await;
/// scope.should(&have::nft("cute_cat$wonderland")).await.into_result()?;
/// ```
pub struct TestScope<C: LedgerClient + ?Sized> {
    client: Arc<C>,
    config: HarnessConfig,
    clock: Arc<dyn Clock>,
    context: ScenarioContext,
    sink: Arc<dyn ReportSink>,
    last_outcome: Option<Outcome>,
    rng_seed: Option<u64>,
    started: Instant,
    opened_at: DateTime<Utc>,
}

impl<C: LedgerClient + ?Sized> TestScope<C> {
    /// Scope with default config, real time and a logging sink
    pub fn new(client: Arc<C>, scenario_id: impl Into<String>) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self {
            client,
            config: HarnessConfig::default(),
            started: clock.now(),
            clock,
            context: ScenarioContext::new(scenario_id),
            sink: Arc::new(LogSink),
            last_outcome: None,
            rng_seed: None,
            opened_at: Utc::now(),
        }
    }

    pub fn with_config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.started = clock.now();
        self.clock = clock;
        self
    }

    /// Use the environment's clock and record its seed in reports
    pub fn with_env(self, env: &DeterministicTestEnv) -> Self {
        let mut scope = self.with_clock(env.clock.clone());
        scope.rng_seed = Some(env.seed());
        scope
    }

    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the reporting context, keeping events already recorded
    pub fn with_context(mut self, context: ScenarioContext) -> Self {
        let earlier = std::mem::replace(&mut self.context, context);
        self.context.events.extend(earlier.events);
        self
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn context(&self) -> &ScenarioContext {
        &self.context
    }

    /// Outcome of the most recent submit
    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    // ========================================
    // Reporting
    // ========================================

    pub fn step(&mut self, title: impl Into<String>) {
        self.record(ReportEvent::Step {
            title: title.into(),
        });
    }

    pub fn label(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.record(ReportEvent::Label {
            key: key.into(),
            value: value.into(),
        });
    }

    fn record(&mut self, event: ReportEvent) {
        self.sink.record(&self.context, &event);
        self.context.push(event);
    }

    pub(crate) fn record_outcome(&mut self, action: &Action, outcome: Outcome) {
        self.record(ReportEvent::Action {
            action: action.to_string(),
            outcome: outcome.to_string(),
        });
        self.last_outcome = Some(outcome);
    }

    // ========================================
    // Actions
    // ========================================

    /// Stage an arbitrary action
    pub fn action(&mut self, action: Action) -> StagedAction<'_, C> {
        StagedAction::new(self, action)
    }

    pub fn register(&mut self) -> RegisterBuilder<'_, C> {
        RegisterBuilder::new(self)
    }

    pub fn unregister(&mut self) -> UnregisterBuilder<'_, C> {
        UnregisterBuilder::new(self)
    }

    pub fn mint(&mut self, asset: impl Into<String>, quantity: u64) -> StagedAction<'_, C> {
        self.action(Action::Mint {
            asset: asset.into(),
            quantity,
        })
    }

    pub fn burn(&mut self, asset: impl Into<String>, quantity: u64) -> StagedAction<'_, C> {
        self.action(Action::Burn {
            asset: asset.into(),
            quantity,
        })
    }

    pub fn transfer(
        &mut self,
        asset: impl Into<String>,
        quantity: u64,
        destination: impl Into<String>,
    ) -> StagedAction<'_, C> {
        self.action(Action::Transfer {
            asset: asset.into(),
            quantity,
            destination: destination.into(),
        })
    }

    pub fn transfer_nft(
        &mut self,
        nft: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> StagedAction<'_, C> {
        self.action(Action::TransferNft {
            nft: nft.into(),
            source: source.into(),
            destination: destination.into(),
        })
    }

    pub fn set_nft_key_value(
        &mut self,
        nft: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> StagedAction<'_, C> {
        self.action(Action::SetNftKeyValue {
            nft: nft.into(),
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn remove_nft_key_value(
        &mut self,
        nft: impl Into<String>,
        key: impl Into<String>,
    ) -> StagedAction<'_, C> {
        self.action(Action::RemoveNftKeyValue {
            nft: nft.into(),
            key: key.into(),
        })
    }

    // ========================================
    // Observation
    // ========================================

    /// Check `predicate` now and record the result
    pub async fn should(&mut self, predicate: &Predicate) -> AssertionResult {
        let observer = Observer {
            client: self.client.as_ref(),
            clock: self.clock.as_ref(),
            config: &self.config,
            last_outcome: self.last_outcome.as_ref(),
        };
        let result = observer.evaluate(predicate).await;

        self.record(ReportEvent::Assertion {
            predicate: predicate.to_string(),
            result: result.to_string(),
            passed: result.is_passed(),
        });
        result
    }

    /// Kind of the last failure, if the last submit failed
    pub fn last_failure_kind(&self) -> Option<Stderr> {
        self.last_outcome.as_ref().and_then(Outcome::failure_kind)
    }

    // ========================================
    // Reports
    // ========================================

    /// Snapshot of the scenario so far
    pub fn report(&self) -> ScenarioReport {
        let mut report = ScenarioReport::new(self.context.clone());
        report.metadata.timestamp = self.opened_at.to_rfc3339();
        report.metadata.duration_ms =
            u64::try_from((self.clock.now() - self.started).as_millis()).unwrap_or(u64::MAX);
        if let Some(seed) = self.rng_seed {
            report.set_rng_seed(seed);
        }
        if let Some(ReportEvent::Assertion {
            predicate, result, ..
        }) = self.context.failed_assertions().next()
        {
            report.set_failure_reason(format!("should {predicate}: {result}"));
        }
        report
    }

    /// Close the scope, saving the report if it failed and an artifact dir is set
    pub async fn finish(self) -> Result<ScenarioReport> {
        let report = self.report();
        if !report.passed() {
            if let Some(dir) = &self.config.artifact_dir {
                let path = report.save(dir).await?;
                eprintln!("❌ Scenario {} failed", report.metadata.scenario_id);
                eprintln!("   Report: {}", path.display());
                eprintln!("   Replay: {}", report.replay_command());
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::InMemoryLedger;
    use crate::observation::have;
    use crate::reporting::MemorySink;

    #[tokio::test]
    async fn test_events_reach_context_and_sink() {
        let ledger = Arc::new(InMemoryLedger::builder().build());
        let sink = Arc::new(MemorySink::new());
        let mut scope = TestScope::new(ledger, "events")
            .with_sink(sink.clone())
            .with_context(ScenarioContext::new("events").with_feature("NFTs"));

        scope.step("Register a cat");
        scope.label("owner", "alice");
        scope.register().nft("cute_cat", "wonderland").submit().await;
        let result = scope.should(&have::nft("cute_cat$wonderland")).await;
        assert!(result.is_passed());

        // Feature was set on the context, the rest flowed through the sink
        assert_eq!(sink.events().len(), 4);
        assert_eq!(scope.context().events.len(), 5);
        assert_eq!(
            scope.context().labels.get("owner").map(String::as_str),
            Some("alice")
        );
        assert!(matches!(
            &sink.events()[2],
            ReportEvent::Action { outcome, .. } if outcome == "success"
        ));
    }

    #[tokio::test]
    async fn test_last_outcome_tracks_latest_submit() {
        let ledger = Arc::new(InMemoryLedger::builder().build());
        let mut scope = TestScope::new(ledger, "latest");
        assert!(scope.last_outcome().is_none());

        scope.register().domain("bad name").submit().await;
        assert_eq!(scope.last_failure_kind(), Some(Stderr::Whitespace));

        scope.register().domain("garden").submit().await;
        assert_eq!(scope.last_outcome(), Some(&Outcome::Success));
        assert!(scope.last_failure_kind().is_none());
    }

    #[tokio::test]
    async fn test_failed_scope_saves_report() {
        let dir = tempfile::tempdir().unwrap();
        let env = DeterministicTestEnv::new_time_paused_with_seed(0xfeed);
        let ledger = Arc::new(InMemoryLedger::builder().build());
        let config = HarnessConfig {
            artifact_dir: Some(dir.path().to_path_buf()),
            ..HarnessConfig::default()
        };
        let mut scope = TestScope::new(ledger, "ghost")
            .with_config(config)
            .with_env(&env);

        assert!(scope.should(&have::domain("ghost")).await.is_mismatch());

        let report = scope.finish().await.unwrap();
        assert!(!report.passed());
        assert_eq!(report.metadata.rng_seed, Some(0xfeed));
        assert!(report
            .metadata
            .failure_reason
            .as_deref()
            .unwrap_or_default()
            .contains("have domain `ghost`"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_report_is_stamped_when_scope_opens() {
        let ledger = Arc::new(InMemoryLedger::builder().build());
        let opened = chrono::Utc::now();
        let scope = TestScope::new(ledger, "stamp");
        std::thread::sleep(std::time::Duration::from_millis(5));

        let first = scope.report();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = scope.report();

        assert_eq!(first.metadata.timestamp, second.metadata.timestamp);
        let stamped = chrono::DateTime::parse_from_rfc3339(&first.metadata.timestamp).unwrap();
        assert!(stamped >= opened);
        assert!(stamped < chrono::Utc::now() - chrono::Duration::milliseconds(5));
    }

    #[tokio::test]
    async fn test_passing_scope_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(InMemoryLedger::builder().build());
        let config = HarnessConfig {
            artifact_dir: Some(dir.path().to_path_buf()),
            ..HarnessConfig::default()
        };
        let mut scope = TestScope::new(ledger, "fine").with_config(config);
        assert!(scope.should(&have::domain("wonderland")).await.is_passed());

        let report = scope.finish().await.unwrap();
        assert!(report.passed());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
