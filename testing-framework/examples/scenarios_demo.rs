//! Scenarios Demo
//!
//! Runs every YAML scenario under `scenarios/` against the in-memory ledger
//! and prints the execution reports.
//!
//! Run with: cargo run --example scenarios_demo

use anyhow::Result;
use ledger_testing_framework::scenarios::{load_scenario, parse_scenario, ScenarioExecutor};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    println!("=== Ledger Acceptance Framework - Scenarios Demo ===\n");

    demo_scenario_files().await?;
    demo_failing_scenario().await?;

    println!("\n=== All Demos Completed Successfully ===");
    Ok(())
}

/// Demo 1: Execute the bundled scenario files
async fn demo_scenario_files() -> Result<()> {
    println!("Demo 1: Bundled Scenarios");
    println!("=========================\n");

    let mut paths: Vec<_> = std::fs::read_dir("scenarios")?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "yaml"))
        .collect();
    paths.sort();

    for path in paths {
        let scenario = load_scenario(&path).await?;
        let mut executor = ScenarioExecutor::new();
        let report = executor.execute(scenario).await?;
        report.print();
    }

    Ok(())
}

/// Demo 2: A failing assertion surfaces as an error with step context
async fn demo_failing_scenario() -> Result<()> {
    println!("Demo 2: Failing Assertion");
    println!("=========================\n");

    let yaml = r#"
name: "Ghost domain"
steps:
  - action: register_domain
    name: garden
  - action: assert_present
    kind: domain
    id: orchard
"#;

    let scenario = parse_scenario(yaml)?;
    let mut executor = ScenarioExecutor::new();
    match executor.execute(scenario).await {
        Ok(_) => println!("Unexpected success"),
        Err(err) => {
            println!("✓ Failed as expected: {:#}", err);
            for entry in executor.get_log() {
                println!("  {}", entry);
            }
        }
    }

    Ok(())
}
