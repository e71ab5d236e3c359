//! Deposit limit policy.
//!
//! Two modes, exactly one active:
//! - `Absolute`: per-pool maximum amount, unconstrained when never set.
//! - `Percentage`: basis points of the pool's live value. A non-zero
//!   per-pool cap overrides the protocol-wide cap.
//!
//! Caps of the inactive mode are kept, so toggling the mode back restores
//! them. Withdrawals are never capped.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{AdapterError, Result};
use crate::types::{LimitMode, PoolId};

/// 100% in basis points.
pub const MAX_BPS: u16 = 10_000;

pub fn validate_bps(bps: u16) -> Result<()> {
    if bps > MAX_BPS {
        return Err(AdapterError::invalid(format!(
            "basis points {bps} exceed {MAX_BPS}"
        )));
    }
    Ok(())
}

/// `floor(value * bps / 10000)` without overflowing 256 bits.
///
/// Splitting `value = q * 10000 + r` keeps both partial products in range:
/// `q * bps <= value` because `bps <= 10000`, and `r * bps < 10000^2`.
pub fn bps_of(value: U256, bps: u16) -> U256 {
    let denom = U256::from(MAX_BPS);
    let bps = U256::from(bps);
    let (q, r) = (value / denom, value % denom);
    q * bps + r * bps / denom
}

/// The cap that applies to one pool under the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cap {
    Amount(U256),
    Bps(u16),
}

impl Cap {
    /// Bound `requested`. `pool_value` is only called for percentage caps.
    pub fn apply<F>(self, requested: U256, pool_value: F) -> Result<U256>
    where
        F: FnOnce() -> Result<U256>,
    {
        match self {
            Cap::Amount(max) => Ok(requested.min(max)),
            Cap::Bps(0) => Ok(U256::ZERO),
            Cap::Bps(bps) => Ok(requested.min(bps_of(pool_value()?, bps))),
        }
    }
}

/// Full limit configuration of one adapter instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "LimitSettings", try_from = "LimitSettings")]
pub struct LimitConfig {
    mode: LimitMode,
    absolute_caps: HashMap<PoolId, U256>,
    pool_pct_caps: HashMap<PoolId, u16>,
    protocol_pct_cap: u16,
}

impl LimitConfig {
    pub fn mode(&self) -> LimitMode {
        self.mode
    }

    /// `U256::MAX` when no cap was ever written for the pool.
    pub fn absolute_cap(&self, pool: &PoolId) -> U256 {
        self.absolute_caps.get(pool).copied().unwrap_or(U256::MAX)
    }

    pub fn pool_percentage_cap(&self, pool: &PoolId) -> u16 {
        self.pool_pct_caps.get(pool).copied().unwrap_or(0)
    }

    pub fn protocol_percentage_cap(&self) -> u16 {
        self.protocol_pct_cap
    }

    /// Basis points in force for `pool` under percentage mode.
    pub fn effective_bps(&self, pool: &PoolId) -> u16 {
        match self.pool_percentage_cap(pool) {
            0 => self.protocol_pct_cap,
            bps => bps,
        }
    }

    pub fn cap_for(&self, pool: &PoolId) -> Cap {
        match self.mode {
            LimitMode::Absolute => Cap::Amount(self.absolute_cap(pool)),
            LimitMode::Percentage => Cap::Bps(self.effective_bps(pool)),
        }
    }

    pub fn set_mode(&mut self, mode: LimitMode) {
        self.mode = mode;
    }

    pub fn set_absolute_cap(&mut self, pool: PoolId, amount: U256) -> Result<()> {
        pool.validate()?;
        self.absolute_caps.insert(pool, amount);
        Ok(())
    }

    pub fn set_pool_percentage_cap(&mut self, pool: PoolId, bps: u16) -> Result<()> {
        pool.validate()?;
        validate_bps(bps)?;
        self.pool_pct_caps.insert(pool, bps);
        Ok(())
    }

    pub fn set_protocol_percentage_cap(&mut self, bps: u16) -> Result<()> {
        validate_bps(bps)?;
        self.protocol_pct_cap = bps;
        Ok(())
    }
}

/// A configuration write that already passed validation.
enum CapWrite {
    AbsoluteCap(PoolId, U256),
    PoolPct(PoolId, u16),
    ProtocolPct(u16),
}

impl CapWrite {
    fn apply(self, cfg: &mut LimitConfig) {
        match self {
            CapWrite::AbsoluteCap(pool, amount) => {
                cfg.absolute_caps.insert(pool, amount);
            }
            CapWrite::PoolPct(pool, bps) => {
                cfg.pool_pct_caps.insert(pool, bps);
            }
            CapWrite::ProtocolPct(bps) => cfg.protocol_pct_cap = bps,
        }
    }
}

/// Evaluate the admissible deposit for `requested` against a configuration.
/// A zero request short-circuits before any pool valuation.
pub fn admissible_amount<F>(
    config: &LimitConfig,
    pool: &PoolId,
    requested: U256,
    pool_value: F,
) -> Result<U256>
where
    F: FnOnce() -> Result<U256>,
{
    if requested.is_zero() {
        return Ok(U256::ZERO);
    }
    config.cap_for(pool).apply(requested, pool_value)
}

/// JSON shape of a [`LimitConfig`]; per-pool maps become sorted lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitSettings {
    #[serde(default)]
    pub mode: LimitMode,
    #[serde(default)]
    pub protocol_pct_cap: u16,
    #[serde(default)]
    pub absolute_caps: Vec<AbsoluteCapEntry>,
    #[serde(default)]
    pub pool_pct_caps: Vec<PoolPctEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsoluteCapEntry {
    pub registry: Address,
    pub underlying: Address,
    pub amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolPctEntry {
    pub registry: Address,
    pub underlying: Address,
    pub bps: u16,
}

impl From<LimitConfig> for LimitSettings {
    fn from(cfg: LimitConfig) -> Self {
        let mut absolute_caps: Vec<_> = cfg
            .absolute_caps
            .into_iter()
            .map(|(pool, amount)| AbsoluteCapEntry {
                registry: pool.registry,
                underlying: pool.underlying,
                amount,
            })
            .collect();
        absolute_caps.sort_by_key(|e| (e.registry, e.underlying));

        let mut pool_pct_caps: Vec<_> = cfg
            .pool_pct_caps
            .into_iter()
            .map(|(pool, bps)| PoolPctEntry {
                registry: pool.registry,
                underlying: pool.underlying,
                bps,
            })
            .collect();
        pool_pct_caps.sort_by_key(|e| (e.registry, e.underlying));

        Self {
            mode: cfg.mode,
            protocol_pct_cap: cfg.protocol_pct_cap,
            absolute_caps,
            pool_pct_caps,
        }
    }
}

impl TryFrom<LimitSettings> for LimitConfig {
    type Error = AdapterError;

    fn try_from(s: LimitSettings) -> Result<Self> {
        let mut cfg = LimitConfig::default();
        cfg.set_mode(s.mode);
        cfg.set_protocol_percentage_cap(s.protocol_pct_cap)?;
        for e in s.absolute_caps {
            cfg.set_absolute_cap(PoolId::new(e.registry, e.underlying), e.amount)?;
        }
        for e in s.pool_pct_caps {
            cfg.set_pool_percentage_cap(PoolId::new(e.registry, e.underlying), e.bps)?;
        }
        Ok(cfg)
    }
}

/// Limit configuration shared by all calls on one adapter.
///
/// Writers validate before taking the write lock; readers copy the cap they
/// need under one read lock, so an evaluation never mixes two configurations.
#[derive(Debug, Default)]
pub struct LimitStore {
    inner: RwLock<LimitConfig>,
}

impl LimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Writes are validated before they land, so a poisoned lock still
    // guards a consistent configuration.
    fn read(&self) -> RwLockReadGuard<'_, LimitConfig> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LimitConfig> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> LimitConfig {
        self.read().clone()
    }

    pub fn mode(&self) -> LimitMode {
        self.read().mode()
    }

    pub fn absolute_cap(&self, pool: &PoolId) -> U256 {
        self.read().absolute_cap(pool)
    }

    pub fn pool_percentage_cap(&self, pool: &PoolId) -> u16 {
        self.read().pool_percentage_cap(pool)
    }

    pub fn protocol_percentage_cap(&self) -> u16 {
        self.read().protocol_percentage_cap()
    }

    pub fn set_mode(&self, mode: LimitMode) {
        self.write().set_mode(mode);
    }

    // Validation happens here, outside the lock; the write itself cannot fail.
    fn commit(&self, write: CapWrite) {
        write.apply(&mut self.write());
    }

    pub fn set_absolute_cap(&self, pool: PoolId, amount: U256) -> Result<()> {
        pool.validate()?;
        self.commit(CapWrite::AbsoluteCap(pool, amount));
        Ok(())
    }

    pub fn set_pool_percentage_cap(&self, pool: PoolId, bps: u16) -> Result<()> {
        pool.validate()?;
        validate_bps(bps)?;
        self.commit(CapWrite::PoolPct(pool, bps));
        Ok(())
    }

    pub fn set_protocol_percentage_cap(&self, bps: u16) -> Result<()> {
        validate_bps(bps)?;
        self.commit(CapWrite::ProtocolPct(bps));
        Ok(())
    }

    /// Resolve the admissible deposit. The pool valuation runs after the
    /// read lock is released.
    pub fn resolve<F>(&self, pool: &PoolId, requested: U256, pool_value: F) -> Result<U256>
    where
        F: FnOnce() -> Result<U256>,
    {
        if requested.is_zero() {
            return Ok(U256::ZERO);
        }
        let cap = self.read().cap_for(pool);
        cap.apply(requested, pool_value)
    }
}
