// File: testing-framework/src/observation/engine.rs
//
// Observation Engine
//
// Presence predicates query the ledger, retrying with backoff to ride out
// visibility lag. Outcome predicates only read the captured outcome of the
// last submit and never touch the ledger.

use ledger_common::{EntityKind, Stderr};

use super::{AssertionMismatch, AssertionResult, Predicate};
use crate::actions::{Failure, Outcome};
use crate::client::{with_timeout, InfrastructureError, LedgerClient, QueryFilter};
use crate::config::HarnessConfig;
use crate::orchestrator::Clock;

/// Everything needed to evaluate predicates
pub struct Observer<'a, C: LedgerClient + ?Sized> {
    pub client: &'a C,
    pub clock: &'a dyn Clock,
    pub config: &'a HarnessConfig,
    /// Outcome of the most recent submit, if any
    pub last_outcome: Option<&'a Outcome>,
}

/// What one presence query saw
enum Sighting {
    Present(bool),
    Unavailable(InfrastructureError),
}

impl<'a, C: LedgerClient + ?Sized> Observer<'a, C> {
    /// Evaluate `predicate`, stopping at the first leaf that does not pass
    pub async fn evaluate(&self, predicate: &Predicate) -> AssertionResult {
        for leaf in predicate.leaves() {
            let result = self.evaluate_leaf(leaf).await;
            if !result.is_passed() {
                return result;
            }
        }
        AssertionResult::Passed
    }

    async fn evaluate_leaf(&self, leaf: &Predicate) -> AssertionResult {
        match leaf {
            Predicate::Present { kind, identity } => {
                self.check_presence(leaf, *kind, identity, true).await
            }
            Predicate::Absent { kind, identity } => {
                self.check_presence(leaf, *kind, identity, false).await
            }
            Predicate::FailedWith(expected) => self.check_failed_with(leaf, *expected),
            Predicate::Succeeded => self.check_succeeded(leaf),
            // `leaves` never yields a conjunction
            Predicate::All(_) => AssertionResult::Passed,
        }
    }

    async fn check_presence(
        &self,
        predicate: &Predicate,
        kind: EntityKind,
        identity: &str,
        expect_present: bool,
    ) -> AssertionResult {
        let canonical = kind.canonicalize(identity);
        let filter = QueryFilter::Id(identity.to_string());
        let policy = &self.config.query_retry;
        let max_attempts = policy.max_attempts.max(1);

        let mut attempt = 1;
        loop {
            let sighting = match with_timeout(
                "query",
                self.config.call_timeout(),
                self.client.query(kind, &filter),
            )
            .await
            {
                Ok(ids) => Sighting::Present(ids.contains(&canonical)),
                Err(err) => Sighting::Unavailable(err),
            };

            if let Sighting::Present(present) = sighting {
                if present == expect_present {
                    return AssertionResult::Passed;
                }
            }

            if attempt >= max_attempts {
                return match sighting {
                    Sighting::Present(present) => AssertionResult::Mismatch(AssertionMismatch {
                        predicate: predicate.to_string(),
                        expected: presence_text(expect_present).to_string(),
                        observed: presence_text(present).to_string(),
                    }),
                    Sighting::Unavailable(err) => AssertionResult::Inconclusive(err),
                };
            }

            let backoff = policy.backoff(attempt);
            match &sighting {
                Sighting::Present(_) => log::debug!(
                    "{} not yet true (attempt {}/{}), retrying in {:?}",
                    predicate,
                    attempt,
                    max_attempts,
                    backoff
                ),
                Sighting::Unavailable(err) => log::debug!(
                    "Query for {} failed (attempt {}/{}): {}, retrying in {:?}",
                    predicate,
                    attempt,
                    max_attempts,
                    err,
                    backoff
                ),
            }
            self.clock.sleep(backoff).await;
            attempt += 1;
        }
    }

    fn check_failed_with(&self, predicate: &Predicate, expected: Stderr) -> AssertionResult {
        let observed = match self.last_outcome {
            None => "no action submitted".to_string(),
            Some(Outcome::Inconclusive(err)) => return AssertionResult::Inconclusive(err.clone()),
            Some(Outcome::Failure(Failure { kind, .. })) if *kind == Some(expected) => {
                return AssertionResult::Passed
            }
            Some(outcome) => outcome.to_string(),
        };

        AssertionResult::Mismatch(AssertionMismatch {
            predicate: predicate.to_string(),
            expected: format!("failure with {expected}"),
            observed,
        })
    }

    fn check_succeeded(&self, predicate: &Predicate) -> AssertionResult {
        let observed = match self.last_outcome {
            None => "no action submitted".to_string(),
            Some(Outcome::Success) => return AssertionResult::Passed,
            Some(Outcome::Inconclusive(err)) => return AssertionResult::Inconclusive(err.clone()),
            Some(outcome) => outcome.to_string(),
        };

        AssertionResult::Mismatch(AssertionMismatch {
            predicate: predicate.to_string(),
            expected: "success".to_string(),
            observed,
        })
    }
}

fn presence_text(present: bool) -> &'static str {
    if present {
        "present"
    } else {
        "absent"
    }
}
