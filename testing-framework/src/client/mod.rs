// File: testing-framework/src/client/mod.rs
//
// Ledger Client Boundary
//
// The harness only ever talks to the ledger through `LedgerClient`. A live
// node adapter and the in-process simulated ledger implement the same trait.

/// Simulated ledger used by tests and scenarios
pub mod in_memory;

pub use in_memory::{InMemoryLedger, InMemoryLedgerBuilder};

use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use ledger_common::EntityKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::Action;

/// The ledger could not be asked, or did not answer usefully
///
/// Never a statement about ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InfrastructureError {
    #[error("{operation} timed out after {after:?}")]
    Timeout { operation: String, after: Duration },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// The ledger received the action and refused it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Rejection {
    pub message: String,
}

impl Rejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Selects which identities of one entity kind a query returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryFilter {
    All,
    /// Exactly this identity, compared in canonical form
    Id(String),
    /// Everything belonging to this domain
    InDomain(String),
}

/// Capability to mutate and read a ledger
///
/// The outer `Result` reports whether the ledger was reachable, the inner one
/// whether it accepted the action.
///
/// # Examples
///
/// ```rust,ignore
/// let client = InMemoryLedger::builder().build();
/// client.submit(&Action::RegisterDomain { name: "garden".into() }).await??;
/// let ids = client.query(EntityKind::Domain, &QueryFilter::All).await?;
/// assert!(ids.contains("garden"));
/// ```
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit one mutating action
    async fn submit(&self, action: &Action) -> Result<Result<(), Rejection>, InfrastructureError>;

    /// Identities of `kind` matching `filter`, in canonical text form
    async fn query(
        &self,
        kind: EntityKind,
        filter: &QueryFilter,
    ) -> Result<BTreeSet<String>, InfrastructureError>;
}

/// Bound `call` by `after`, reporting expiry as a `Timeout`
pub async fn with_timeout<T, F>(
    operation: &str,
    after: Duration,
    call: F,
) -> Result<T, InfrastructureError>
where
    F: Future<Output = Result<T, InfrastructureError>>,
{
    match tokio::time::timeout(after, call).await {
        Ok(result) => result,
        Err(_) => {
            log::warn!("{} timed out after {:?}", operation, after);
            Err(InfrastructureError::Timeout {
                operation: operation.to_string(),
                after,
            })
        }
    }
}
