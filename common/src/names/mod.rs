// Ledger Name Rules
//
// This module decides which strings are legal names for ledger entities
// (domains, accounts, asset definitions, NFTs) and how two names combine
// into a composite identifier such as `alice@wonderland`.

mod composite;
mod constants;
mod reserved;
mod validate;

pub use composite::*;
pub use constants::*;
pub use reserved::*;
pub use validate::*;
