//! In-memory collaborators for tests and local tooling.
//!
//! `StaticRegistry` answers role lookups from two settable addresses;
//! `MemoryLedger` keeps balances, pools and rewards in maps. Both count the
//! queries they serve so callers can assert on external traffic.

use alloy_primitives::{Address, U256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use crate::error::{AdapterError, Result};
use crate::gateway::{LendingGateway, RewardBalances, RewardsGateway};
use crate::registry::CapabilityRegistry;
use crate::types::PoolId;

#[derive(Debug)]
pub struct StaticRegistry {
    roles: RwLock<(Address, Address)>,
    unreachable: AtomicBool,
    calls: AtomicUsize,
}

impl StaticRegistry {
    pub fn new(operator: Address, risk_operator: Address) -> Self {
        Self {
            roles: RwLock::new((operator, risk_operator)),
            unreachable: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_operator(&self, who: Address) {
        self.roles.write().unwrap_or_else(PoisonError::into_inner).0 = who;
    }

    pub fn set_risk_operator(&self, who: Address) {
        self.roles.write().unwrap_or_else(PoisonError::into_inner).1 = who;
    }

    pub fn set_unreachable(&self, down: bool) {
        self.unreachable.store(down, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lookup(&self) -> Result<(Address, Address)> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(AdapterError::external("registry unreachable"));
        }
        Ok(*self.roles.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl CapabilityRegistry for StaticRegistry {
    fn operator(&self) -> Result<Address> {
        Ok(self.lookup()?.0)
    }

    fn risk_operator(&self) -> Result<Address> {
        Ok(self.lookup()?.1)
    }
}

/// A lending market registered in a [`MemoryLedger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Market {
    pub lending_pool: Address,
    pub lp_token: Address,
    pub liquidity: U256,
}

#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<(Address, Address), U256>,
    pools: HashMap<Address, Address>,
    markets: HashMap<PoolId, Market>,
    underlying: HashMap<Address, Vec<Address>>,
    reward_tokens: Vec<Address>,
    // (reward token, account) -> unclaimed
    rewards: HashMap<(Address, Address), U256>,
}

#[derive(Debug)]
pub struct MemoryLedger {
    controller: Address,
    state: Mutex<LedgerState>,
    unreachable: AtomicBool,
    queries: AtomicUsize,
}

impl MemoryLedger {
    pub fn new(controller: Address) -> Self {
        Self {
            controller,
            state: Mutex::new(LedgerState::default()),
            unreachable: AtomicBool::new(false),
            queries: AtomicUsize::new(0),
        }
    }

    /// Register a market: `registry` resolves to `lending_pool`, deposits of
    /// `underlying` mint `lp_token`.
    pub fn add_market(
        &self,
        registry: Address,
        lending_pool: Address,
        underlying: Address,
        lp_token: Address,
        liquidity: U256,
    ) {
        let mut s = self.state();
        s.pools.insert(registry, lending_pool);
        s.markets.insert(
            PoolId::new(registry, underlying),
            Market {
                lending_pool,
                lp_token,
                liquidity,
            },
        );
        s.underlying.insert(lp_token, vec![underlying]);
    }

    pub fn set_liquidity(&self, pool: &PoolId, liquidity: U256) {
        if let Some(m) = self.state().markets.get_mut(pool) {
            m.liquidity = liquidity;
        }
    }

    pub fn set_balance(&self, token: Address, account: Address, amount: U256) {
        self.state().balances.insert((token, account), amount);
    }

    pub fn add_reward_token(&self, token: Address) {
        self.state().reward_tokens.push(token);
    }

    pub fn set_unclaimed(&self, reward_token: Address, account: Address, amount: U256) {
        self.state()
            .rewards
            .insert((reward_token, account), amount);
    }

    pub fn set_unreachable(&self, down: bool) {
        self.unreachable.store(down, Ordering::SeqCst);
    }

    /// Number of gateway queries served so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enter(&self) -> Result<MutexGuard<'_, LedgerState>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(AdapterError::external("ledger unreachable"));
        }
        Ok(self.state())
    }

    fn market(&self, pool: &PoolId) -> Result<Market> {
        self.enter()?
            .markets
            .get(pool)
            .copied()
            .ok_or_else(|| AdapterError::external(format!("no market for {pool}")))
    }
}

impl LendingGateway for MemoryLedger {
    fn balance_of(&self, token: Address, account: Address) -> Result<U256> {
        Ok(self
            .enter()?
            .balances
            .get(&(token, account))
            .copied()
            .unwrap_or(U256::ZERO))
    }

    fn lending_pool(&self, registry: Address) -> Result<Address> {
        self.enter()?
            .pools
            .get(&registry)
            .copied()
            .ok_or_else(|| AdapterError::external(format!("no providers for registry {registry}")))
    }

    fn liquidity_pool_token(&self, pool: &PoolId) -> Result<Address> {
        Ok(self.market(pool)?.lp_token)
    }

    fn underlying_tokens(&self, lp_token: Address) -> Result<Vec<Address>> {
        Ok(self
            .enter()?
            .underlying
            .get(&lp_token)
            .cloned()
            .unwrap_or_default())
    }

    fn pool_liquidity(&self, pool: &PoolId) -> Result<U256> {
        Ok(self.market(pool)?.liquidity)
    }
}

impl RewardsGateway for MemoryLedger {
    fn incentives_controller(&self) -> Address {
        self.controller
    }

    fn reward_token(&self) -> Result<Option<Address>> {
        Ok(self.enter()?.reward_tokens.first().copied())
    }

    fn rewards_list(&self) -> Result<Vec<Address>> {
        Ok(self.enter()?.reward_tokens.clone())
    }

    fn unclaimed_rewards(&self, assets: &[Address], account: Address) -> Result<U256> {
        let s = self.enter()?;
        if assets.is_empty() {
            return Ok(U256::ZERO);
        }
        Ok(s.reward_tokens
            .first()
            .and_then(|t| s.rewards.get(&(*t, account)).copied())
            .unwrap_or(U256::ZERO))
    }

    fn unclaimed_rewards_list(&self, assets: &[Address], account: Address) -> Result<RewardBalances> {
        let s = self.enter()?;
        let unclaimed_amounts = s
            .reward_tokens
            .iter()
            .map(|t| {
                if assets.is_empty() {
                    U256::ZERO
                } else {
                    s.rewards.get(&(*t, account)).copied().unwrap_or(U256::ZERO)
                }
            })
            .collect();
        Ok(RewardBalances {
            rewards_list: s.reward_tokens.clone(),
            unclaimed_amounts,
        })
    }
}
