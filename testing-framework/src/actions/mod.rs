// File: testing-framework/src/actions/mod.rs
//
// Actions
//
// Mutating intents a test sends to the ledger and the outcomes captured from
// them. Fields are raw strings on purpose: a test must be able to submit a
// malformed identifier and observe how the ledger rejects it.

/// Fluent staging and submission of actions
pub mod builder;

pub use builder::{RegisterBuilder, StagedAction, UnregisterBuilder};

use std::fmt;

use ledger_common::Stderr;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::client::InfrastructureError;

/// One mutating instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    RegisterDomain {
        name: String,
    },
    RegisterAccount {
        name: String,
        domain: String,
    },
    RegisterAssetDefinition {
        name: String,
        domain: String,
        /// `Store` or `Numeric`; anything else is rejected by the ledger
        value_type: String,
    },
    RegisterNft {
        name: String,
        domain: String,
        /// JSON object text, blank means empty
        #[serde(default)]
        content: String,
    },
    Mint {
        asset: String,
        quantity: u64,
    },
    Burn {
        asset: String,
        quantity: u64,
    },
    Transfer {
        asset: String,
        quantity: u64,
        destination: String,
    },
    TransferNft {
        nft: String,
        source: String,
        destination: String,
    },
    SetNftKeyValue {
        nft: String,
        key: String,
        value: serde_json::Value,
    },
    RemoveNftKeyValue {
        nft: String,
        key: String,
    },
    UnregisterNft {
        nft: String,
    },
    UnregisterDomain {
        name: String,
    },
}

/// Discriminant of [`Action`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    RegisterDomain,
    RegisterAccount,
    RegisterAssetDefinition,
    RegisterNft,
    Mint,
    Burn,
    Transfer,
    TransferNft,
    SetNftKeyValue,
    RemoveNftKeyValue,
    UnregisterNft,
    UnregisterDomain,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::RegisterDomain { .. } => ActionKind::RegisterDomain,
            Self::RegisterAccount { .. } => ActionKind::RegisterAccount,
            Self::RegisterAssetDefinition { .. } => ActionKind::RegisterAssetDefinition,
            Self::RegisterNft { .. } => ActionKind::RegisterNft,
            Self::Mint { .. } => ActionKind::Mint,
            Self::Burn { .. } => ActionKind::Burn,
            Self::Transfer { .. } => ActionKind::Transfer,
            Self::TransferNft { .. } => ActionKind::TransferNft,
            Self::SetNftKeyValue { .. } => ActionKind::SetNftKeyValue,
            Self::RemoveNftKeyValue { .. } => ActionKind::RemoveNftKeyValue,
            Self::UnregisterNft { .. } => ActionKind::UnregisterNft,
            Self::UnregisterDomain { .. } => ActionKind::UnregisterDomain,
        }
    }

    /// Identity text of the object the action targets, as the test wrote it
    pub fn target(&self) -> String {
        match self {
            Self::RegisterDomain { name } | Self::UnregisterDomain { name } => name.clone(),
            Self::RegisterAccount { name, domain } => format!("{name}@{domain}"),
            Self::RegisterAssetDefinition { name, domain, .. } => format!("{name}#{domain}"),
            Self::RegisterNft { name, domain, .. } => format!("{name}${domain}"),
            Self::Mint { asset, .. } | Self::Burn { asset, .. } | Self::Transfer { asset, .. } => {
                asset.clone()
            }
            Self::TransferNft { nft, .. }
            | Self::SetNftKeyValue { nft, .. }
            | Self::RemoveNftKeyValue { nft, .. }
            | Self::UnregisterNft { nft } => nft.clone(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.kind(), self.target())?;
        match self {
            Self::Mint { quantity, .. } | Self::Burn { quantity, .. } => {
                write!(f, " x{quantity}")
            }
            Self::Transfer {
                quantity,
                destination,
                ..
            } => write!(f, " x{quantity} to `{destination}`"),
            Self::TransferNft {
                source,
                destination,
                ..
            } => write!(f, " from `{source}` to `{destination}`"),
            Self::SetNftKeyValue { key, .. } | Self::RemoveNftKeyValue { key, .. } => {
                write!(f, " key `{key}`")
            }
            _ => Ok(()),
        }
    }
}

/// The ledger refused an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// `None` when the message matches no known wording
    pub kind: Option<Stderr>,
    /// Raw ledger text
    pub message: String,
}

/// Result of submitting one action
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success,
    Failure(Failure),
    /// The ledger could not be reached or did not answer in time
    Inconclusive(InfrastructureError),
}

impl Outcome {
    /// Classify a raw rejection message
    pub fn from_rejection(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Failure(Failure {
            kind: Stderr::classify(&message),
            message,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The classified error kind of a failure
    pub fn failure_kind(&self) -> Option<Stderr> {
        match self {
            Self::Failure(failure) => failure.kind,
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Failure(Failure {
                kind: Some(kind),
                message,
            }) => write!(f, "failure ({kind}): {message}"),
            Self::Failure(Failure {
                kind: None,
                message,
            }) => write!(f, "failure (unclassified): {message}"),
            Self::Inconclusive(err) => write!(f, "inconclusive: {err}"),
        }
    }
}
