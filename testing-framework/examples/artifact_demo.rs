// Example: Scenario Report Demo
//
// Runs a scope that fails an assertion, saves its report and loads it back,
// the way a CI run leaves a report behind for reproduction.

use anyhow::Result;
use ledger_testing_framework::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║              Scenario Report Demo                              ║");
    println!("╚════════════════════════════════════════════════════════════════╝\n");

    let output_dir = std::env::temp_dir().join("ledger_reports");

    // Step 1: Run a scope that fails
    println!("1. Running a scope with a failing assertion...");
    let env = DeterministicTestEnv::with_seed(0xa3f5c8e1b2d94706);
    let ledger = Arc::new(InMemoryLedger::builder().build());
    let config = HarnessConfig {
        query_retry: RetryPolicy::no_retry(),
        artifact_dir: Some(output_dir.clone()),
        ..HarnessConfig::default()
    };
    let mut scope = TestScope::new(ledger, "example_missing_domain")
        .with_config(config)
        .with_env(&env)
        .with_context(ScenarioContext::new("example_missing_domain").with_feature("Domains"));

    scope.step("Register garden");
    scope.register().domain("garden").submit().await;
    scope.step("Look for orchard");
    let result = scope.should(&have::domain("orchard")).await;
    println!("   Result: {}", result);

    // Step 2: Finish, which saves the report
    println!("\n2. Finishing scope...");
    let report = scope.finish().await?;

    // Step 3: Load the newest report back
    println!("\n3. Loading saved report...");
    let mut saved: Vec<_> = std::fs::read_dir(&output_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    saved.sort();
    if let Some(path) = saved.last() {
        let loaded = ScenarioReport::load(path).await?;
        println!("{}", loaded.summary());
    }

    println!("\nReplay with:\n  {}", report.replay_command());
    Ok(())
}
