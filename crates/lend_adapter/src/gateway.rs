//! Read-only views of the external lending protocol.
//!
//! Implementations talk to a node (or a fixture); the adapter only ever reads
//! through these traits. Failures surface as `AdapterError::ExternalQuery`
//! and are never retried here.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::{AdapterError, Result};
use crate::types::PoolId;

/// Balances and pool valuation.
pub trait LendingGateway: Send + Sync {
    /// ERC-20 balance of `account`.
    fn balance_of(&self, token: Address, account: Address) -> Result<U256>;

    /// Lending pool behind an address-provider registry.
    fn lending_pool(&self, registry: Address) -> Result<Address>;

    /// Receipt token minted for deposits into `pool`.
    fn liquidity_pool_token(&self, pool: &PoolId) -> Result<Address>;

    fn underlying_tokens(&self, lp_token: Address) -> Result<Vec<Address>>;

    /// Pool value in units of the underlying token. V2 pools report the
    /// reserve's available liquidity, V3 pools the underlying held by the
    /// receipt token.
    fn pool_liquidity(&self, pool: &PoolId) -> Result<U256>;

    fn lp_token_balance_of(&self, pool: &PoolId, account: Address) -> Result<U256> {
        let lp_token = self.liquidity_pool_token(pool)?;
        self.balance_of(lp_token, account)
    }
}

/// Unclaimed incentives, one entry per reward token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardBalances {
    pub rewards_list: Vec<Address>,
    pub unclaimed_amounts: Vec<U256>,
}

impl RewardBalances {
    pub fn single(token: Address, amount: U256) -> Self {
        Self {
            rewards_list: vec![token],
            unclaimed_amounts: vec![amount],
        }
    }

    /// One amount per reward token; anything else is a malformed answer
    /// from the rewards controller.
    pub fn validate(&self) -> Result<()> {
        if self.rewards_list.len() != self.unclaimed_amounts.len() {
            return Err(AdapterError::external(format!(
                "rewards controller returned {} reward tokens but {} amounts",
                self.rewards_list.len(),
                self.unclaimed_amounts.len()
            )));
        }
        Ok(())
    }

    pub fn amount_of(&self, token: Address) -> U256 {
        self.rewards_list
            .iter()
            .zip(&self.unclaimed_amounts)
            .find(|(t, _)| **t == token)
            .map(|(_, a)| *a)
            .unwrap_or(U256::ZERO)
    }
}

/// Incentives / rewards controller.
///
/// Single-reward controllers answer `reward_token` and `unclaimed_rewards`;
/// reward-list controllers answer `rewards_list` and `unclaimed_rewards_list`.
/// The adapter picks the pair matching its protocol's reward shape.
pub trait RewardsGateway: Send + Sync {
    /// Address claims are sent to.
    fn incentives_controller(&self) -> Address;

    fn reward_token(&self) -> Result<Option<Address>>;

    fn rewards_list(&self) -> Result<Vec<Address>>;

    fn unclaimed_rewards(&self, assets: &[Address], account: Address) -> Result<U256>;

    fn unclaimed_rewards_list(&self, assets: &[Address], account: Address) -> Result<RewardBalances>;
}
