// File: testing-framework/src/client/in_memory.rs
//
// In-Memory Ledger
//
// A single-process ledger that applies actions with the same validation and
// error wording as a real node. It can also misbehave on request: transient
// connection failures, latency, and reads that lag behind commits.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ledger_common::entity::parse_content;
use ledger_common::{
    parse_composite, AssetDefinition, AssetId, AssetValueType, CompositeId, Domain, EntityKind,
    Identifiable, NameRulesConfig, Nft, Separator,
};
use parking_lot::Mutex;
use serde_json::{Map, Value};

use super::{InfrastructureError, LedgerClient, QueryFilter, Rejection};
use crate::actions::Action;
use crate::orchestrator::{Clock, SystemClock};

/// Domain registered by the default genesis
pub const GENESIS_DOMAIN: &str = "wonderland";
/// Account registered by the default genesis, owner of registered NFTs
pub const GENESIS_AUTHORITY: &str = "alice";

#[derive(Debug, Clone)]
struct NftRecord {
    content: Map<String, Value>,
    owner: CompositeId,
}

/// Full ledger state at one point in time
#[derive(Debug, Clone, Default)]
struct World {
    domains: BTreeSet<String>,
    accounts: BTreeSet<CompositeId>,
    definitions: BTreeMap<CompositeId, AssetValueType>,
    assets: BTreeMap<AssetId, u64>,
    nfts: BTreeMap<CompositeId, NftRecord>,
}

impl World {
    fn ids(&self, kind: EntityKind) -> Vec<(String, String)> {
        // (identity, domain used by `InDomain`)
        match kind {
            EntityKind::Domain => self.domains.iter().map(|d| (d.clone(), d.clone())).collect(),
            EntityKind::Account => self
                .accounts
                .iter()
                .map(|id| (id.to_string(), id.domain().to_string()))
                .collect(),
            EntityKind::AssetDefinition => self
                .definitions
                .keys()
                .map(|id| (id.to_string(), id.domain().to_string()))
                .collect(),
            EntityKind::Asset => self
                .assets
                .keys()
                .map(|id| (id.to_string(), id.owner.domain().to_string()))
                .collect(),
            EntityKind::Nft => self
                .nfts
                .keys()
                .map(|id| (id.to_string(), id.domain().to_string()))
                .collect(),
        }
    }

    fn require_domain(&self, domain: &str) -> Result<(), Rejection> {
        if self.domains.contains(domain) {
            Ok(())
        } else {
            Err(Rejection::new(format!("Failed to find domain: `{domain}`")))
        }
    }

    fn require_account(&self, account: &CompositeId) -> Result<(), Rejection> {
        if self.accounts.contains(account) {
            Ok(())
        } else {
            Err(Rejection::new(format!("Failed to find account: `{account}`")))
        }
    }

    fn numeric_definition(&self, definition: &CompositeId) -> Result<(), Rejection> {
        match self.definitions.get(definition) {
            Some(AssetValueType::Numeric) => Ok(()),
            Some(other) => Err(Rejection::new(format!(
                "Type mismatch: expected `Numeric`, actual `{other}`"
            ))),
            None => Err(Rejection::new(format!(
                "Failed to find asset definition: `{definition}`"
            ))),
        }
    }

    fn withdraw(&mut self, asset: &AssetId, quantity: u64) -> Result<(), Rejection> {
        let Some(held) = self.assets.get(asset).copied() else {
            return Err(Rejection::new(format!("Failed to find asset: `{asset}`")));
        };
        let Some(left) = held.checked_sub(quantity) else {
            return Err(Rejection::new(ledger_common::Stderr::InsufficientFunds.message()));
        };
        if left == 0 {
            self.assets.remove(asset);
        } else {
            self.assets.insert(asset.clone(), left);
        }
        Ok(())
    }

    fn deposit(&mut self, asset: AssetId, quantity: u64) -> Result<(), Rejection> {
        let held = self.assets.get(&asset).copied().unwrap_or(0);
        let total = held
            .checked_add(quantity)
            .ok_or_else(|| Rejection::new("Math error: overflow"))?;
        if total > 0 {
            self.assets.insert(asset, total);
        }
        Ok(())
    }

    fn unregister_domain(&mut self, domain: &str) {
        self.domains.remove(domain);

        let removed: BTreeSet<CompositeId> = self
            .accounts
            .iter()
            .filter(|id| id.domain() == domain)
            .cloned()
            .collect();
        self.accounts.retain(|id| id.domain() != domain);
        self.definitions.retain(|id, _| id.domain() != domain);
        self.assets.retain(|id, _| {
            id.definition.domain() != domain && !removed.contains(&id.owner)
        });
        self.nfts
            .retain(|id, record| id.domain() != domain && !removed.contains(&record.owner));
    }
}

fn repetition(id: impl std::fmt::Display) -> Rejection {
    Rejection::new(format!("Repetition of `Register` for id `{id}`"))
}

fn parse_account(raw: &str, rules: &NameRulesConfig) -> Result<CompositeId, Rejection> {
    ledger_common::names::parse_composite_with(raw, Separator::Account, rules)
        .map_err(|e| Rejection::new(e.to_string()))
}

fn parse_nft(raw: &str, rules: &NameRulesConfig) -> Result<CompositeId, Rejection> {
    ledger_common::names::parse_composite_with(raw, Separator::Nft, rules)
        .map_err(|e| Rejection::new(e.to_string()))
}

fn parse_asset(raw: &str, rules: &NameRulesConfig) -> Result<AssetId, Rejection> {
    AssetId::parse_with(raw, rules).map_err(|e| Rejection::new(e.to_string()))
}

#[derive(Debug, Default)]
struct Faults {
    failing_queries: u32,
    failing_submits: u32,
    query_latency: Duration,
    submit_latency: Duration,
    visibility_lag: u32,
}

#[derive(Debug, Default)]
struct LedgerState {
    committed: World,
    /// What lagging reads see while `lag_remaining > 0`
    visible: World,
    lag_remaining: u32,
    submissions: u64,
    queries: u64,
}

/// Simulated ledger
///
/// # Examples
///
/// ```rust,ignore
/// let ledger = InMemoryLedger::builder()
///     .with_domain("garden")
///     .with_account("bob", "garden")
///     .build();
/// ledger.fail_next_queries(2);
/// ```
pub struct InMemoryLedger {
    authority: CompositeId,
    rules: NameRulesConfig,
    clock: Arc<dyn Clock>,
    state: Mutex<LedgerState>,
    faults: Mutex<Faults>,
}

impl InMemoryLedger {
    pub fn builder() -> InMemoryLedgerBuilder {
        InMemoryLedgerBuilder::new()
    }

    /// Account that owns newly registered NFTs
    pub fn authority(&self) -> &CompositeId {
        &self.authority
    }

    // ========================================
    // Fault injection
    // ========================================

    /// The next `n` queries fail with a connection error
    pub fn fail_next_queries(&self, n: u32) {
        self.faults.lock().failing_queries = n;
    }

    /// The next `n` submits fail with a connection error before reaching state
    pub fn fail_next_submits(&self, n: u32) {
        self.faults.lock().failing_submits = n;
    }

    pub fn set_query_latency(&self, latency: Duration) {
        self.faults.lock().query_latency = latency;
    }

    pub fn set_submit_latency(&self, latency: Duration) {
        self.faults.lock().submit_latency = latency;
    }

    /// After each commit, the next `queries` queries still see the old state
    pub fn set_visibility_lag(&self, queries: u32) {
        self.faults.lock().visibility_lag = queries;
    }

    // ========================================
    // Inspection
    // ========================================

    /// Committed quantity of an asset, `None` if it does not exist
    pub fn asset_quantity(&self, asset: &str) -> Option<u64> {
        let id = AssetId::parse_with(asset, &self.rules).ok()?;
        self.state.lock().committed.assets.get(&id).copied()
    }

    /// Committed owner of an NFT
    pub fn nft_owner(&self, nft: &str) -> Option<String> {
        let id = parse_composite(nft, Separator::Nft).ok()?;
        let state = self.state.lock();
        state.committed.nfts.get(&id).map(|r| r.owner.to_string())
    }

    /// Committed content of an NFT
    pub fn nft_content(&self, nft: &str) -> Option<Map<String, Value>> {
        let id = parse_composite(nft, Separator::Nft).ok()?;
        let state = self.state.lock();
        state.committed.nfts.get(&id).map(|r| r.content.clone())
    }

    /// Number of submit calls received, including failed ones
    pub fn submissions(&self) -> u64 {
        self.state.lock().submissions
    }

    /// Number of query calls received, including failed ones
    pub fn queries(&self) -> u64 {
        self.state.lock().queries
    }

    // ========================================
    // Execution
    // ========================================

    fn apply(&self, world: &mut World, action: &Action) -> Result<(), Rejection> {
        let rules = &self.rules;
        let invalid = |e: ledger_common::ParseError| Rejection::new(e.to_string());

        match action {
            Action::RegisterDomain { name } => {
                Domain::new(name.as_str()).validate(rules).map_err(invalid)?;
                if !world.domains.insert(name.clone()) {
                    return Err(repetition(name));
                }
            }
            Action::RegisterAccount { name, domain } => {
                let id = CompositeId::new(name.as_str(), domain.as_str(), Separator::Account);
                id.validate(rules).map_err(invalid)?;
                world.require_domain(domain)?;
                if world.accounts.contains(&id) {
                    return Err(repetition(&id));
                }
                world.accounts.insert(id);
            }
            Action::RegisterAssetDefinition {
                name,
                domain,
                value_type,
            } => {
                let value_type: AssetValueType = value_type.parse().map_err(invalid)?;
                let definition = AssetDefinition::new(name.as_str(), domain.as_str(), value_type);
                definition.validate(rules).map_err(invalid)?;
                world.require_domain(domain)?;
                let id = definition.identity();
                if world.definitions.contains_key(&id) {
                    return Err(repetition(&id));
                }
                world.definitions.insert(id, value_type);
            }
            Action::RegisterNft {
                name,
                domain,
                content,
            } => {
                let nft = Nft::new(name.as_str(), domain.as_str(), content.as_str());
                nft.validate(rules).map_err(invalid)?;
                let content = parse_content(content)
                    .map_err(|e| Rejection::new(format!("Failed to parse NFT content: {e}")))?;
                world.require_domain(domain)?;
                let id = nft.identity();
                if world.nfts.contains_key(&id) {
                    return Err(repetition(&id));
                }
                world.nfts.insert(
                    id,
                    NftRecord {
                        content,
                        owner: self.authority.clone(),
                    },
                );
            }
            Action::Mint { asset, quantity } => {
                let id = parse_asset(asset, rules)?;
                world.numeric_definition(&id.definition)?;
                world.require_account(&id.owner)?;
                world.deposit(id, *quantity)?;
            }
            Action::Burn { asset, quantity } => {
                let id = parse_asset(asset, rules)?;
                world.numeric_definition(&id.definition)?;
                world.require_account(&id.owner)?;
                world.withdraw(&id, *quantity)?;
            }
            Action::Transfer {
                asset,
                quantity,
                destination,
            } => {
                let source = parse_asset(asset, rules)?;
                let destination = parse_account(destination, rules)?;
                world.numeric_definition(&source.definition)?;
                world.require_account(&source.owner)?;
                world.require_account(&destination)?;
                world.withdraw(&source, *quantity)?;
                world.deposit(AssetId::new(source.definition, destination), *quantity)?;
            }
            Action::TransferNft {
                nft,
                source,
                destination,
            } => {
                let id = parse_nft(nft, rules)?;
                let source = parse_account(source, rules)?;
                let destination = parse_account(destination, rules)?;
                world.require_account(&source)?;
                world.require_account(&destination)?;
                let Some(record) = world.nfts.get_mut(&id) else {
                    return Err(Rejection::new(format!("Failed to find NFT: `{id}`")));
                };
                if record.owner != source {
                    return Err(Rejection::new(format!(
                        "Can't transfer NFT `{id}`: account `{source}` doesn't own it"
                    )));
                }
                record.owner = destination;
            }
            Action::SetNftKeyValue { nft, key, value } => {
                let id = parse_nft(nft, rules)?;
                let Some(record) = world.nfts.get_mut(&id) else {
                    return Err(Rejection::new(format!("Failed to find NFT: `{id}`")));
                };
                record.content.insert(key.clone(), value.clone());
            }
            Action::RemoveNftKeyValue { nft, key } => {
                let id = parse_nft(nft, rules)?;
                let Some(record) = world.nfts.get_mut(&id) else {
                    return Err(Rejection::new(format!("Failed to find NFT: `{id}`")));
                };
                if record.content.remove(key).is_none() {
                    return Err(Rejection::new(format!(
                        "Failed to find metadata key: `{key}`"
                    )));
                }
            }
            Action::UnregisterNft { nft } => {
                let id = parse_nft(nft, rules)?;
                if world.nfts.remove(&id).is_none() {
                    return Err(Rejection::new(format!("Failed to find NFT: `{id}`")));
                }
            }
            Action::UnregisterDomain { name } => {
                Domain::new(name.as_str()).validate(rules).map_err(invalid)?;
                world.require_domain(name)?;
                world.unregister_domain(name);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn submit(&self, action: &Action) -> Result<Result<(), Rejection>, InfrastructureError> {
        let latency = self.faults.lock().submit_latency;
        if !latency.is_zero() {
            self.clock.sleep(latency).await;
        }

        let lag = {
            let mut faults = self.faults.lock();
            if faults.failing_submits > 0 {
                faults.failing_submits -= 1;
                self.state.lock().submissions += 1;
                return Err(InfrastructureError::Connection(
                    "simulated submit failure".to_string(),
                ));
            }
            faults.visibility_lag
        };

        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.submissions += 1;

        let mut next = state.committed.clone();
        let result = self.apply(&mut next, action);

        match &result {
            Ok(()) => {
                if lag > 0 {
                    if state.lag_remaining == 0 {
                        state.visible = std::mem::take(&mut state.committed);
                    }
                    state.lag_remaining = lag;
                }
                state.committed = next;
                if log::log_enabled!(log::Level::Debug) {
                    log::debug!("Committed {}", action);
                }
            }
            Err(rejection) => {
                if log::log_enabled!(log::Level::Debug) {
                    log::debug!("Rejected {}: {}", action, rejection);
                }
            }
        }

        Ok(result)
    }

    async fn query(
        &self,
        kind: EntityKind,
        filter: &QueryFilter,
    ) -> Result<BTreeSet<String>, InfrastructureError> {
        let latency = self.faults.lock().query_latency;
        if !latency.is_zero() {
            self.clock.sleep(latency).await;
        }

        {
            let mut faults = self.faults.lock();
            if faults.failing_queries > 0 {
                faults.failing_queries -= 1;
                self.state.lock().queries += 1;
                return Err(InfrastructureError::Connection(
                    "simulated query failure".to_string(),
                ));
            }
        }

        let mut state = self.state.lock();
        state.queries += 1;

        let ids = if state.lag_remaining > 0 {
            state.lag_remaining -= 1;
            state.visible.ids(kind)
        } else {
            state.committed.ids(kind)
        };

        let wanted = match filter {
            QueryFilter::Id(id) => Some(kind.canonicalize(id)),
            _ => None,
        };

        let matches: BTreeSet<String> = ids
            .into_iter()
            .filter(|(id, domain)| match filter {
                QueryFilter::All => true,
                QueryFilter::Id(_) => wanted.as_deref() == Some(id.as_str()),
                QueryFilter::InDomain(wanted_domain) => domain == wanted_domain,
            })
            .map(|(id, _)| id)
            .collect();

        if log::log_enabled!(log::Level::Debug) {
            log::debug!("Query {} {:?}: {} match(es)", kind, filter, matches.len());
        }

        Ok(matches)
    }
}

/// Builder for [`InMemoryLedger`]
///
/// Default genesis: domain `wonderland` and authority `alice@wonderland`.
/// Genesis entries are inserted as given, without name checks.
pub struct InMemoryLedgerBuilder {
    authority: (String, String),
    domains: Vec<String>,
    accounts: Vec<(String, String)>,
    rules: NameRulesConfig,
    clock: Option<Arc<dyn Clock>>,
}

impl InMemoryLedgerBuilder {
    pub fn new() -> Self {
        Self {
            authority: (GENESIS_AUTHORITY.to_string(), GENESIS_DOMAIN.to_string()),
            domains: vec![GENESIS_DOMAIN.to_string()],
            accounts: Vec::new(),
            rules: NameRulesConfig::default(),
            clock: None,
        }
    }

    /// Replace the genesis authority; its domain is registered too
    pub fn with_authority(mut self, name: impl Into<String>, domain: impl Into<String>) -> Self {
        self.authority = (name.into(), domain.into());
        self
    }

    pub fn with_domain(mut self, name: impl Into<String>) -> Self {
        self.domains.push(name.into());
        self
    }

    /// Add a genesis account; its domain is registered too
    pub fn with_account(mut self, name: impl Into<String>, domain: impl Into<String>) -> Self {
        self.accounts.push((name.into(), domain.into()));
        self
    }

    pub fn with_rules(mut self, rules: NameRulesConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Clock used to simulate latency; defaults to `SystemClock`
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> InMemoryLedger {
        let authority = CompositeId::new(&self.authority.0, &self.authority.1, Separator::Account);

        let mut world = World::default();
        world.domains.extend(self.domains);
        world.domains.insert(authority.domain().to_string());
        world.accounts.insert(authority.clone());
        for (name, domain) in self.accounts {
            world.domains.insert(domain.clone());
            world
                .accounts
                .insert(CompositeId::new(name, domain, Separator::Account));
        }

        log::debug!(
            "In-memory ledger genesis: {} domain(s), {} account(s), authority {}",
            world.domains.len(),
            world.accounts.len(),
            authority
        );

        InMemoryLedger {
            authority,
            rules: self.rules,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            state: Mutex::new(LedgerState {
                committed: world,
                ..LedgerState::default()
            }),
            faults: Mutex::new(Faults::default()),
        }
    }
}

impl Default for InMemoryLedgerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
