//! Adapter facade: composes limits, encoder, gateways and role checks.
//!
//! Every code-producing call returns the ordered instruction list the
//! executor replays. Zero amounts and zero caps produce an empty list, never
//! an error; only authorization, configuration and external failures fail.

use alloy_primitives::{Address, U256};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

use crate::config::AdapterConfig;
use crate::encoder::CallEncoder;
use crate::error::{AdapterError, Result};
use crate::gateway::{LendingGateway, RewardBalances, RewardsGateway};
use crate::instruction::Instruction;
use crate::policy::{LimitConfig, LimitStore};
use crate::protocol::{Protocol, RewardShape};
use crate::registry::{require_role, CapabilityRegistry};
use crate::types::{LimitMode, PoolId, Role};

/// `balance >= redeem`.
pub fn redeemable_sufficient(balance: U256, redeem: U256) -> bool {
    balance >= redeem
}

pub struct LendingAdapter {
    config: AdapterConfig,
    encoder: CallEncoder,
    limits: LimitStore,
    reward_assets: RwLock<Vec<Address>>,
    registry: Arc<dyn CapabilityRegistry>,
    gateway: Arc<dyn LendingGateway>,
    rewards: Arc<dyn RewardsGateway>,
}

impl LendingAdapter {
    pub fn new(
        config: AdapterConfig,
        registry: Arc<dyn CapabilityRegistry>,
        gateway: Arc<dyn LendingGateway>,
        rewards: Arc<dyn RewardsGateway>,
    ) -> Self {
        Self {
            encoder: CallEncoder::new(config.protocol),
            config,
            limits: LimitStore::new(),
            reward_assets: RwLock::new(Vec::new()),
            registry,
            gateway,
            rewards,
        }
    }

    pub fn protocol(&self) -> Protocol {
        self.config.protocol
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    // ── limit configuration ─────────────────────────────────────────

    pub fn limit_mode(&self) -> LimitMode {
        self.limits.mode()
    }

    pub fn absolute_cap(&self, pool: &PoolId) -> U256 {
        self.limits.absolute_cap(pool)
    }

    pub fn pool_percentage_cap(&self, pool: &PoolId) -> u16 {
        self.limits.pool_percentage_cap(pool)
    }

    pub fn protocol_percentage_cap(&self) -> u16 {
        self.limits.protocol_percentage_cap()
    }

    /// Consistent copy of the whole limit configuration.
    pub fn limits(&self) -> LimitConfig {
        self.limits.snapshot()
    }

    pub fn set_limit_mode(&self, caller: Address, mode: LimitMode) -> Result<()> {
        require_role(self.registry.as_ref(), Role::RiskOperator, caller)?;
        self.limits.set_mode(mode);
        info!(%mode, "limit mode set");
        Ok(())
    }

    pub fn set_absolute_cap(&self, caller: Address, pool: PoolId, amount: U256) -> Result<()> {
        require_role(self.registry.as_ref(), Role::RiskOperator, caller)?;
        self.limits.set_absolute_cap(pool, amount)?;
        info!(%pool, %amount, "absolute deposit cap set");
        Ok(())
    }

    pub fn set_pool_percentage_cap(&self, caller: Address, pool: PoolId, bps: u16) -> Result<()> {
        require_role(self.registry.as_ref(), Role::RiskOperator, caller)?;
        self.limits.set_pool_percentage_cap(pool, bps)?;
        info!(%pool, bps, "pool deposit cap set");
        Ok(())
    }

    pub fn set_protocol_percentage_cap(&self, caller: Address, bps: u16) -> Result<()> {
        require_role(self.registry.as_ref(), Role::RiskOperator, caller)?;
        self.limits.set_protocol_percentage_cap(bps)?;
        info!(bps, "protocol deposit cap set");
        Ok(())
    }

    /// Receipt-token assets whose incentives are queried and claimed.
    pub fn set_reward_assets(&self, caller: Address, assets: Vec<Address>) -> Result<()> {
        require_role(self.registry.as_ref(), Role::Operator, caller)?;
        if assets.iter().any(|a| *a == Address::ZERO) {
            return Err(AdapterError::invalid("reward asset address is zero"));
        }
        let count = assets.len();
        *self
            .reward_assets
            .write()
            .unwrap_or_else(PoisonError::into_inner) = assets;
        info!(count, "reward assets set");
        Ok(())
    }

    pub fn reward_assets(&self) -> Vec<Address> {
        self.reward_assets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Admissible deposit for `requested` under the active limit mode.
    pub fn resolve_allowed_amount(&self, pool: &PoolId, requested: U256) -> Result<U256> {
        let admissible = self
            .limits
            .resolve(pool, requested, || self.gateway.pool_liquidity(pool))?;
        debug!(%pool, %requested, %admissible, "resolved deposit amount");
        Ok(admissible)
    }

    // ── deposit / withdraw codes ────────────────────────────────────

    pub fn deposit_some_codes(
        &self,
        beneficiary: Address,
        underlying: Address,
        registry: Address,
        requested: U256,
    ) -> Result<Vec<Instruction>> {
        let pool = PoolId::new(registry, underlying);
        let amount = self.resolve_allowed_amount(&pool, requested)?;
        if amount.is_zero() {
            return Ok(Vec::new());
        }
        let lending_pool = self.gateway.lending_pool(registry)?;
        debug!(%pool, %lending_pool, %amount, protocol = %self.protocol(), "encoding deposit");
        Ok(self
            .encoder
            .encode_deposit(underlying, lending_pool, beneficiary, amount)
            .to_vec())
    }

    pub fn deposit_all_codes(
        &self,
        beneficiary: Address,
        underlying: Address,
        registry: Address,
    ) -> Result<Vec<Instruction>> {
        let balance = self.gateway.balance_of(underlying, beneficiary)?;
        self.deposit_some_codes(beneficiary, underlying, registry, balance)
    }

    /// Withdrawals are not capped.
    pub fn withdraw_some_codes(
        &self,
        beneficiary: Address,
        underlying: Address,
        registry: Address,
        amount: U256,
    ) -> Result<Vec<Instruction>> {
        if amount.is_zero() {
            return Ok(Vec::new());
        }
        let pool = PoolId::new(registry, underlying);
        let lp_token = self.gateway.liquidity_pool_token(&pool)?;
        let lending_pool = self.gateway.lending_pool(registry)?;
        debug!(%pool, %lending_pool, %amount, protocol = %self.protocol(), "encoding withdraw");
        Ok(self
            .encoder
            .encode_withdraw(lp_token, lending_pool, underlying, beneficiary, amount)
            .to_vec())
    }

    pub fn withdraw_all_codes(
        &self,
        beneficiary: Address,
        underlying: Address,
        registry: Address,
    ) -> Result<Vec<Instruction>> {
        let amount = self.lp_token_balance(beneficiary, underlying, registry)?;
        self.withdraw_some_codes(beneficiary, underlying, registry, amount)
    }

    // ── rewards ─────────────────────────────────────────────────────

    pub fn can_stake(&self) -> bool {
        false
    }

    /// V2: the controller's reward token. V3: first entry of the rewards list.
    pub fn reward_token(&self) -> Result<Option<Address>> {
        match self.protocol().reward_shape() {
            RewardShape::SingleReward => self.rewards.reward_token(),
            RewardShape::RewardList => Ok(self.rewards.rewards_list()?.first().copied()),
        }
    }

    pub fn unclaimed_reward_token_amount(&self, account: Address) -> Result<U256> {
        let assets = self.reward_assets();
        match self.protocol().reward_shape() {
            RewardShape::SingleReward => self.rewards.unclaimed_rewards(&assets, account),
            RewardShape::RewardList => match self.reward_token()? {
                Some(token) => Ok(self.rewards_list_of(&assets, account)?.amount_of(token)),
                None => Ok(U256::ZERO),
            },
        }
    }

    pub fn unclaimed_reward_tokens_amount(&self, account: Address) -> Result<RewardBalances> {
        let assets = self.reward_assets();
        match self.protocol().reward_shape() {
            RewardShape::RewardList => self.rewards_list_of(&assets, account),
            RewardShape::SingleReward => match self.rewards.reward_token()? {
                Some(token) => Ok(RewardBalances::single(
                    token,
                    self.rewards.unclaimed_rewards(&assets, account)?,
                )),
                None => Ok(RewardBalances::default()),
            },
        }
    }

    fn rewards_list_of(&self, assets: &[Address], account: Address) -> Result<RewardBalances> {
        let balances = self.rewards.unclaimed_rewards_list(assets, account)?;
        balances.validate()?;
        Ok(balances)
    }

    pub fn claim_reward_codes(&self, beneficiary: Address) -> Result<Vec<Instruction>> {
        let assets = self.reward_assets();
        if assets.is_empty() {
            return Ok(Vec::new());
        }
        let controller = self.rewards.incentives_controller();
        debug!(%controller, assets = assets.len(), "encoding claim");
        Ok(self
            .encoder
            .encode_claim(controller, &assets, beneficiary)
            .to_vec())
    }

    pub fn harvest_some_codes(
        &self,
        beneficiary: Address,
        underlying: Address,
        reward_amount: U256,
    ) -> Result<Vec<Instruction>> {
        if reward_amount.is_zero() {
            return Ok(Vec::new());
        }
        let reward_token = match self.reward_token()? {
            Some(t) if t != underlying => t,
            _ => return Ok(Vec::new()),
        };
        let router = self
            .config
            .swap_router
            .ok_or_else(|| AdapterError::invalid("harvest requires a swap router"))?;
        debug!(%router, %reward_token, %underlying, %reward_amount, "encoding harvest");
        Ok(self
            .encoder
            .encode_harvest(router, reward_token, underlying, beneficiary, reward_amount)
            .to_vec())
    }

    pub fn harvest_all_codes(&self, beneficiary: Address, underlying: Address) -> Result<Vec<Instruction>> {
        let amount = match self.reward_token()? {
            Some(token) => self.gateway.balance_of(token, beneficiary)?,
            None => return Ok(Vec::new()),
        };
        self.harvest_some_codes(beneficiary, underlying, amount)
    }

    // ── queries ─────────────────────────────────────────────────────

    pub fn underlying_tokens(&self, lp_token: Address) -> Result<Vec<Address>> {
        self.gateway.underlying_tokens(lp_token)
    }

    pub fn liquidity_pool_token(&self, underlying: Address, registry: Address) -> Result<Address> {
        self.gateway
            .liquidity_pool_token(&PoolId::new(registry, underlying))
    }

    pub fn pool_value(&self, registry: Address, underlying: Address) -> Result<U256> {
        self.gateway.pool_liquidity(&PoolId::new(registry, underlying))
    }

    pub fn lp_token_balance(&self, account: Address, underlying: Address, registry: Address) -> Result<U256> {
        self.gateway
            .lp_token_balance_of(&PoolId::new(registry, underlying), account)
    }

    /// Receipt tokens track the underlying 1:1.
    pub fn all_amount_in_token(&self, account: Address, underlying: Address, registry: Address) -> Result<U256> {
        self.lp_token_balance(account, underlying, registry)
    }

    pub fn some_amount_in_token(&self, lp_amount: U256) -> U256 {
        lp_amount
    }

    pub fn amount_in_lp_token(&self, amount: U256) -> U256 {
        amount
    }

    pub fn is_redeemable_amount_sufficient(
        &self,
        account: Address,
        underlying: Address,
        registry: Address,
        redeem: U256,
    ) -> Result<bool> {
        let balance = self.all_amount_in_token(account, underlying, registry)?;
        Ok(redeemable_sufficient(balance, redeem))
    }
}
