use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AdapterError, Result};

/// One lending-pool relationship: the protocol's address-provider registry
/// plus the underlying token deposited into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PoolId {
    pub registry: Address,
    pub underlying: Address,
}

impl PoolId {
    pub fn new(registry: Address, underlying: Address) -> Self {
        Self {
            registry,
            underlying,
        }
    }

    /// Build a pool identity for configuration writes. Zero addresses can
    /// never name a real pool and are rejected.
    pub fn checked(registry: Address, underlying: Address) -> Result<Self> {
        let id = Self::new(registry, underlying);
        id.validate()?;
        Ok(id)
    }

    pub fn validate(&self) -> Result<()> {
        if self.registry == Address::ZERO {
            return Err(AdapterError::invalid(format!(
                "pool {self}: registry address is zero"
            )));
        }
        if self.underlying == Address::ZERO {
            return Err(AdapterError::invalid(format!(
                "pool {self}: underlying token address is zero"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.registry, self.underlying)
    }
}

/// Which deposit cap is enforced. The inactive mode's caps stay stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LimitMode {
    #[default]
    Absolute = 0,
    Percentage = 1,
}

impl TryFrom<u8> for LimitMode {
    type Error = AdapterError;

    fn try_from(v: u8) -> Result<Self> {
        match v {
            0 => Ok(Self::Absolute),
            1 => Ok(Self::Percentage),
            other => Err(AdapterError::invalid(format!("unknown limit mode: {other}"))),
        }
    }
}

impl fmt::Display for LimitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute => f.write_str("absolute"),
            Self::Percentage => f.write_str("percentage"),
        }
    }
}

/// Privileged roles resolved from the capability registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Operator,
    RiskOperator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operator => f.write_str("operator"),
            Self::RiskOperator => f.write_str("riskOperator"),
        }
    }
}
