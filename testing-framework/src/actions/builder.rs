// File: testing-framework/src/actions/builder.rs
//
// Action Builder
//
// `scope.register().nft("cute_cat", "wonderland").submit().await` stages one
// action and submits it exactly once. Identifiers are passed through
// untouched; rejecting them is the ledger's job.

use ledger_common::AssetValueType;

use super::{Action, Outcome};
use crate::client::{with_timeout, LedgerClient};
use crate::harness::TestScope;

/// An action waiting to be submitted through its scope
#[must_use = "a staged action does nothing until `submit` is awaited"]
pub struct StagedAction<'s, C: LedgerClient + ?Sized> {
    scope: &'s mut TestScope<C>,
    action: Action,
}

impl<'s, C: LedgerClient + ?Sized> StagedAction<'s, C> {
    pub(crate) fn new(scope: &'s mut TestScope<C>, action: Action) -> Self {
        Self { scope, action }
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Submit once, capture the outcome in the scope and return it
    ///
    /// Never retried. A transport failure or timeout is captured as
    /// `Outcome::Inconclusive`.
    pub async fn submit(self) -> Outcome {
        let client = self.scope.client().clone();
        let timeout = self.scope.config().call_timeout();

        let outcome = match with_timeout("submit", timeout, client.submit(&self.action)).await {
            Ok(Ok(())) => Outcome::Success,
            Ok(Err(rejection)) => Outcome::from_rejection(rejection.message),
            Err(err) => Outcome::Inconclusive(err),
        };

        self.scope.record_outcome(&self.action, outcome.clone());
        outcome
    }
}

/// `scope.register()`
pub struct RegisterBuilder<'s, C: LedgerClient + ?Sized> {
    scope: &'s mut TestScope<C>,
}

impl<'s, C: LedgerClient + ?Sized> RegisterBuilder<'s, C> {
    pub(crate) fn new(scope: &'s mut TestScope<C>) -> Self {
        Self { scope }
    }

    pub fn domain(self, name: impl Into<String>) -> StagedAction<'s, C> {
        StagedAction::new(self.scope, Action::RegisterDomain { name: name.into() })
    }

    pub fn account(self, name: impl Into<String>, domain: impl Into<String>) -> StagedAction<'s, C> {
        StagedAction::new(
            self.scope,
            Action::RegisterAccount {
                name: name.into(),
                domain: domain.into(),
            },
        )
    }

    pub fn asset_definition(
        self,
        name: impl Into<String>,
        domain: impl Into<String>,
        value_type: AssetValueType,
    ) -> StagedAction<'s, C> {
        self.asset_definition_raw(name, domain, value_type.to_string())
    }

    /// Asset definition with an arbitrary value type string
    pub fn asset_definition_raw(
        self,
        name: impl Into<String>,
        domain: impl Into<String>,
        value_type: impl Into<String>,
    ) -> StagedAction<'s, C> {
        StagedAction::new(
            self.scope,
            Action::RegisterAssetDefinition {
                name: name.into(),
                domain: domain.into(),
                value_type: value_type.into(),
            },
        )
    }

    /// NFT with empty content
    pub fn nft(self, name: impl Into<String>, domain: impl Into<String>) -> StagedAction<'s, C> {
        self.nft_with_content(name, domain, "{}")
    }

    pub fn nft_with_content(
        self,
        name: impl Into<String>,
        domain: impl Into<String>,
        content: impl Into<String>,
    ) -> StagedAction<'s, C> {
        StagedAction::new(
            self.scope,
            Action::RegisterNft {
                name: name.into(),
                domain: domain.into(),
                content: content.into(),
            },
        )
    }
}

/// `scope.unregister()`
pub struct UnregisterBuilder<'s, C: LedgerClient + ?Sized> {
    scope: &'s mut TestScope<C>,
}

impl<'s, C: LedgerClient + ?Sized> UnregisterBuilder<'s, C> {
    pub(crate) fn new(scope: &'s mut TestScope<C>) -> Self {
        Self { scope }
    }

    pub fn nft(self, nft: impl Into<String>) -> StagedAction<'s, C> {
        StagedAction::new(self.scope, Action::UnregisterNft { nft: nft.into() })
    }

    /// Removes the domain and everything in it
    pub fn domain(self, name: impl Into<String>) -> StagedAction<'s, C> {
        StagedAction::new(self.scope, Action::UnregisterDomain { name: name.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::InMemoryLedger;
    use crate::orchestrator::PausedClock;
    use ledger_common::Stderr;
    use std::sync::Arc;
    use std::time::Duration;

    fn scope() -> (Arc<InMemoryLedger>, TestScope<InMemoryLedger>) {
        let ledger = Arc::new(InMemoryLedger::builder().build());
        let scope = TestScope::new(ledger.clone(), "builder");
        (ledger, scope)
    }

    #[tokio::test]
    async fn test_register_nft() {
        let (ledger, mut scope) = scope();

        let outcome = scope.register().nft("cute_cat", "wonderland").submit().await;

        assert_eq!(outcome, Outcome::Success);
        assert_eq!(scope.last_outcome(), Some(&Outcome::Success));
        assert_eq!(ledger.submissions(), 1);
    }

    #[tokio::test]
    async fn test_no_pre_validation() {
        let (ledger, mut scope) = scope();

        let staged = scope.register().nft("bad@name", "wonderland");
        assert_eq!(staged.action().target(), "bad@name$wonderland");
        let outcome = staged.submit().await;

        // The malformed name reached the ledger and was rejected there
        assert_eq!(ledger.submissions(), 1);
        assert_eq!(outcome.failure_kind(), Some(Stderr::ReservedCharacter));
    }

    #[tokio::test]
    async fn test_failed_submit_is_not_retried() {
        let (ledger, mut scope) = scope();
        ledger.fail_next_submits(1);

        let outcome = scope.register().domain("garden").submit().await;

        assert!(matches!(outcome, Outcome::Inconclusive(_)));
        assert_eq!(ledger.submissions(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_timeout_is_inconclusive() {
        let ledger = Arc::new(
            InMemoryLedger::builder()
                .with_clock(Arc::new(PausedClock))
                .build(),
        );
        ledger.set_submit_latency(Duration::from_secs(60));
        let mut scope = TestScope::new(ledger.clone(), "timeout");

        let outcome = scope.register().domain("garden").submit().await;

        assert!(matches!(outcome, Outcome::Inconclusive(_)), "{outcome:?}");
    }

    #[tokio::test]
    async fn test_asset_flow() {
        let (ledger, mut scope) = scope();

        let outcome = scope
            .register()
            .asset_definition("rose", "wonderland", AssetValueType::Numeric)
            .submit()
            .await;
        assert!(outcome.is_success());

        assert!(scope
            .mint("rose##alice@wonderland", 5)
            .submit()
            .await
            .is_success());
        assert!(scope
            .register()
            .account("bob", "wonderland")
            .submit()
            .await
            .is_success());
        assert!(scope
            .transfer("rose##alice@wonderland", 2, "bob@wonderland")
            .submit()
            .await
            .is_success());

        let outcome = scope.burn("rose##bob@wonderland", 3).submit().await;
        assert_eq!(outcome.failure_kind(), Some(Stderr::InsufficientFunds));
        assert_eq!(ledger.asset_quantity("rose##bob@wonderland"), Some(2));
    }

    #[tokio::test]
    async fn test_invalid_value_type() {
        let (_ledger, mut scope) = scope();
        let outcome = scope
            .register()
            .asset_definition_raw("rose", "wonderland", "Blob")
            .submit()
            .await;
        assert_eq!(outcome.failure_kind(), Some(Stderr::InvalidType));
    }

    #[tokio::test]
    async fn test_unregister() {
        let (ledger, mut scope) = scope();
        scope.register().nft("cute_cat", "wonderland").submit().await;

        let outcome = scope.unregister().nft("cute_cat$wonderland").submit().await;
        assert!(outcome.is_success());
        assert!(ledger.nft_owner("cute_cat$wonderland").is_none());

        let outcome = scope.unregister().domain("ghost").submit().await;
        assert_eq!(outcome.failure_kind(), Some(Stderr::FailedToFindDomain));
    }
}
