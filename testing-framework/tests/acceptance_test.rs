#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//! Acceptance scenarios against the in-memory ledger
//!
//! Each test drives the DSL the way a ledger acceptance suite would: stage an
//! action, submit it, then assert on the outcome or on ledger state.

use ledger_testing_framework::prelude::*;
use strum::IntoEnumIterator;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Ledger and scope sharing a paused clock, so retries cost no wall time
fn paused_scope(
    scenario: &str,
    env: &DeterministicTestEnv,
) -> (Arc<InMemoryLedger>, TestScope<InMemoryLedger>) {
    let ledger = Arc::new(
        InMemoryLedger::builder()
            .with_account("bob", "wonderland")
            .with_clock(env.clock.clone())
            .build(),
    );
    let scope = TestScope::new(ledger.clone(), scenario).with_env(env);
    (ledger, scope)
}

#[tokio::test]
async fn test_register_nft_then_observe_it() -> anyhow::Result<()> {
    init_logger();
    let env = DeterministicTestEnv::new_time_paused_with_seed(1);
    let (ledger, mut scope) = paused_scope("register_nft", &env);

    scope.step("Register a cat");
    let outcome = scope
        .register()
        .nft_with_content("cute_cat", "wonderland", r#"{"color": "grey"}"#)
        .submit()
        .await;
    assert_eq!(outcome, Outcome::Success);

    scope
        .should(&have::nft("cute_cat$wonderland").and(have::succeeded()))
        .await
        .into_result()?;

    let content = ledger.nft_content("cute_cat$wonderland").unwrap();
    assert_eq!(content.get("color"), Some(&serde_json::json!("grey")));
    Ok(())
}

#[tokio::test]
async fn test_reserved_character_is_rejected() -> anyhow::Result<()> {
    init_logger();
    let env = DeterministicTestEnv::new_time_paused_with_seed(2);
    let (_ledger, mut scope) = paused_scope("reserved_character", &env);

    let outcome = scope.register().nft("bad@name", "wonderland").submit().await;
    assert_eq!(outcome.failure_kind(), Some(Stderr::ReservedCharacter));

    scope
        .should(&have::failed_with(Stderr::ReservedCharacter))
        .await
        .into_result()?;
    scope
        .should(&have::no(EntityKind::Nft, "bad@name$wonderland"))
        .await
        .into_result()?;

    // Wrong expected kind is a mismatch, not a pass
    assert!(scope
        .should(&have::failed_with(Stderr::Whitespace))
        .await
        .is_mismatch());
    Ok(())
}

#[tokio::test]
async fn test_missing_domain_is_a_mismatch() {
    init_logger();
    let env = DeterministicTestEnv::new_time_paused_with_seed(3);
    let (ledger, mut scope) = paused_scope("ghost_domain", &env);

    let started = env.clock.now();
    let result = scope.should(&have::domain("ghost")).await;

    match result.into_result() {
        Err(AssertionError::Mismatch(mismatch)) => {
            assert_eq!(mismatch.expected, "present");
            assert_eq!(mismatch.observed, "absent");
        }
        other => panic!("expected mismatch, got {other:?}"),
    }

    // Every attempt was spent before giving up
    let policy = RetryPolicy::default();
    assert_eq!(ledger.queries(), u64::from(policy.max_attempts));
    assert!(env.clock.now() - started >= Duration::from_millis(750));
}

#[tokio::test]
async fn test_query_timeout_is_inconclusive() {
    init_logger();
    let env = DeterministicTestEnv::new_time_paused_with_seed(4);
    let (ledger, scope) = paused_scope("query_timeout", &env);
    let config = HarnessConfig {
        call_timeout_ms: 1_000,
        query_retry: RetryPolicy {
            max_attempts: 2,
            ..RetryPolicy::default()
        },
        ..HarnessConfig::default()
    };
    let mut scope = scope.with_config(config);

    ledger.set_query_latency(Duration::from_secs(30));
    let result = scope.should(&have::domain("wonderland")).await;

    assert!(result.is_inconclusive(), "got {result}");
    assert!(matches!(
        result.into_result(),
        Err(AssertionError::Inconclusive(InfrastructureError::Timeout { .. }))
    ));
}

#[tokio::test]
async fn test_submit_failure_is_inconclusive_and_not_retried() {
    init_logger();
    let env = DeterministicTestEnv::new_time_paused_with_seed(5);
    let (ledger, mut scope) = paused_scope("submit_failure", &env);

    ledger.fail_next_submits(1);
    let outcome = scope.register().domain("garden").submit().await;

    assert!(matches!(outcome, Outcome::Inconclusive(_)));
    assert_eq!(ledger.submissions(), 1);
    assert!(scope
        .should(&have::failed_with(Stderr::Repetition))
        .await
        .is_inconclusive());
    assert!(scope.should(&have::succeeded()).await.is_inconclusive());
}

#[tokio::test]
async fn test_visibility_lag_is_absorbed_by_retries() -> anyhow::Result<()> {
    init_logger();
    let env = DeterministicTestEnv::new_time_paused_with_seed(6);
    let (ledger, mut scope) = paused_scope("visibility_lag", &env);

    ledger.set_visibility_lag(2);
    scope.register().domain("garden").submit().await;
    scope.should(&have::domain("garden")).await.into_result()?;

    assert_eq!(ledger.queries(), 3);
    Ok(())
}

#[tokio::test]
async fn test_asset_movements() -> anyhow::Result<()> {
    init_logger();
    let env = DeterministicTestEnv::new_time_paused_with_seed(7);
    let (ledger, mut scope) = paused_scope("asset_movements", &env);

    scope
        .register()
        .asset_definition("rose", "wonderland", AssetValueType::Numeric)
        .submit()
        .await;
    scope.should(&have::asset_definition("rose#wonderland")).await.into_result()?;

    scope.mint("rose##alice@wonderland", 10).submit().await;
    scope.transfer("rose##alice@wonderland", 4, "bob@wonderland").submit().await;
    scope
        .should(&have::asset("rose##bob@wonderland").and(have::succeeded()))
        .await
        .into_result()?;
    assert_eq!(ledger.asset_quantity("rose##alice@wonderland"), Some(6));
    assert_eq!(ledger.asset_quantity("rose##bob@wonderland"), Some(4));

    scope.burn("rose##bob@wonderland", 5).submit().await;
    scope
        .should(&have::failed_with(Stderr::InsufficientFunds))
        .await
        .into_result()?;
    assert_eq!(ledger.asset_quantity("rose##bob@wonderland"), Some(4));

    scope.transfer("rose##alice@wonderland", 1, "carol@wonderland").submit().await;
    scope
        .should(&have::failed_with(Stderr::FailedToFindAccount))
        .await
        .into_result()?;
    Ok(())
}

#[tokio::test]
async fn test_store_asset_rejects_mint() -> anyhow::Result<()> {
    init_logger();
    let env = DeterministicTestEnv::new_time_paused_with_seed(8);
    let (_ledger, mut scope) = paused_scope("store_asset", &env);

    scope
        .register()
        .asset_definition("notes", "wonderland", AssetValueType::Store)
        .submit()
        .await;
    let outcome = scope.mint("notes##alice@wonderland", 1).submit().await;
    assert!(!outcome.is_success());

    scope
        .register()
        .asset_definition_raw("coin", "wonderland", "Fiat")
        .submit()
        .await;
    scope
        .should(&have::failed_with(Stderr::InvalidType))
        .await
        .into_result()?;
    Ok(())
}

#[tokio::test]
async fn test_nft_transfer_and_unregister() -> anyhow::Result<()> {
    init_logger();
    let env = DeterministicTestEnv::new_time_paused_with_seed(9);
    let (ledger, mut scope) = paused_scope("nft_transfer", &env);

    scope.register().nft("cute_cat", "wonderland").submit().await;
    scope
        .set_nft_key_value("cute_cat$wonderland", "age", 3)
        .submit()
        .await;
    scope
        .transfer_nft("cute_cat$wonderland", "alice@wonderland", "bob@wonderland")
        .submit()
        .await;
    scope.should(&have::succeeded()).await.into_result()?;
    assert_eq!(
        ledger.nft_owner("cute_cat$wonderland").as_deref(),
        Some("bob@wonderland")
    );

    // Alice gave it away; the ledger's ownership message has no kind
    let outcome = scope
        .transfer_nft("cute_cat$wonderland", "alice@wonderland", "bob@wonderland")
        .submit()
        .await;
    assert!(matches!(&outcome, Outcome::Failure(failure) if failure.kind.is_none()));

    scope.unregister().nft("cute_cat$wonderland").submit().await;
    scope
        .should(&have::no(EntityKind::Nft, "cute_cat$wonderland"))
        .await
        .into_result()?;
    Ok(())
}

#[tokio::test]
async fn test_unregister_domain_cascades() -> anyhow::Result<()> {
    init_logger();
    let env = DeterministicTestEnv::new_time_paused_with_seed(10);
    let (_ledger, mut scope) = paused_scope("domain_cascade", &env);

    scope.register().domain("garden").submit().await;
    scope.register().account("bob", "garden").submit().await;
    scope.register().nft("gnome", "garden").submit().await;
    scope
        .should(&have::account("bob@garden").and(have::nft("gnome$garden")))
        .await
        .into_result()?;

    scope.unregister().domain("garden").submit().await;
    scope
        .should(
            &have::no(EntityKind::Domain, "garden")
                .and(have::no(EntityKind::Account, "bob@garden"))
                .and(have::no(EntityKind::Nft, "gnome$garden")),
        )
        .await
        .into_result()?;

    // Accounts of other domains are untouched
    scope.should(&have::account("bob@wonderland")).await.into_result()?;
    Ok(())
}

#[tokio::test]
async fn test_generated_edge_cases_fail_with_their_kind() -> anyhow::Result<()> {
    init_logger();
    let env = DeterministicTestEnv::new_time_paused_with_seed(0x5eed);
    let (ledger, mut scope) = paused_scope("edge_cases", &env);
    let mut names = env.names(NameRulesConfig::default());

    for case in EdgeCase::iter() {
        let name = names.edge_case(case).expect("possible with default rules");
        let expected = case
            .expected_outcome()
            .stderr()
            .expect("edge cases are invalid");

        scope.step(format!("Register domain breaking {case:?}"));
        scope.register().domain(name.clone()).submit().await;
        scope
            .should(&have::failed_with(expected))
            .await
            .into_result()
            .map_err(|e| anyhow::anyhow!("{case:?} with {name:?}: {e}"))?;
    }

    let valid = names.domain();
    scope.register().domain(valid.clone()).submit().await;
    scope.should(&have::domain(valid)).await.into_result()?;

    assert_eq!(ledger.submissions(), EdgeCase::iter().count() as u64 + 1);
    Ok(())
}

#[tokio::test]
async fn test_failed_run_leaves_replayable_report() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let env = DeterministicTestEnv::new_time_paused_with_seed(0xabcd);
    let (_ledger, scope) = paused_scope("replayable", &env);
    let mut scope = scope.with_config(HarnessConfig {
        artifact_dir: Some(dir.path().to_path_buf()),
        ..HarnessConfig::default()
    });

    scope.register().domain("garden").submit().await;
    assert!(scope.should(&have::domain("orchard")).await.is_mismatch());

    let report = scope.finish().await.unwrap();
    assert!(report.replay_command().contains("LEDGER_TEST_SEED=0x000000000000abcd"));

    let saved = std::fs::read_dir(dir.path())
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    let loaded = ScenarioReport::load(&saved).await.unwrap();
    assert_eq!(loaded, report);
}

#[tokio::test]
async fn test_echoed_identifier_does_not_pick_a_kind() {
    init_logger();
    let env = DeterministicTestEnv::new_time_paused_with_seed(11);
    let (_ledger, mut scope) = paused_scope("echoed_identifier", &env);

    let outcome = scope.unregister().nft("Empty_box$wonderland").submit().await;
    assert!(matches!(&outcome, Outcome::Failure(failure) if failure.kind.is_none()));
    assert!(scope
        .should(&have::failed_with(Stderr::Empty))
        .await
        .is_mismatch());
}

#[tokio::test]
async fn test_remove_nft_metadata_key() -> anyhow::Result<()> {
    init_logger();
    let env = DeterministicTestEnv::new_time_paused_with_seed(12);
    let (ledger, mut scope) = paused_scope("nft_metadata", &env);

    scope
        .register()
        .nft_with_content("cute_cat", "wonderland", r#"{"color": "grey"}"#)
        .submit()
        .await;
    scope
        .remove_nft_key_value("cute_cat$wonderland", "color")
        .submit()
        .await;
    scope.should(&have::succeeded()).await.into_result()?;
    assert!(ledger.nft_content("cute_cat$wonderland").unwrap().is_empty());

    let outcome = scope
        .remove_nft_key_value("cute_cat$wonderland", "color")
        .submit()
        .await;
    assert!(matches!(
        &outcome,
        Outcome::Failure(failure) if failure.message.contains("Failed to find metadata key")
    ));
    Ok(())
}
