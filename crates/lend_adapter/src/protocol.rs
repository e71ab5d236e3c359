//! Protocol variant descriptor.
//!
//! V2 and V3 pools differ only in the step-3 call of a deposit, in the claim
//! call, and in how reward entitlement is queried. Everything else is shared.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::bindings::{IIncentivesControllerV2, ILendingPoolV2, IPoolV3, IRewardsControllerV3};
use crate::error::AdapterError;
use crate::instruction::Instruction;

/// Referral code passed on every deposit/supply.
pub const REFERRAL_CODE: u16 = 0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    V2,
    #[default]
    V3,
}

/// How unclaimed incentives are reported by the rewards controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardShape {
    /// One reward token, one balance.
    SingleReward,
    /// A list of reward tokens with one balance each.
    RewardList,
}

impl Protocol {
    pub fn reward_shape(self) -> RewardShape {
        match self {
            Self::V2 => RewardShape::SingleReward,
            Self::V3 => RewardShape::RewardList,
        }
    }

    /// Step 3 of a deposit: `deposit` on V2 pools, `supply` on V3.
    pub fn deposit_call(
        self,
        lending_pool: Address,
        token: Address,
        amount: U256,
        beneficiary: Address,
    ) -> Instruction {
        match self {
            Self::V2 => Instruction::new(
                lending_pool,
                ILendingPoolV2::depositCall {
                    asset: token,
                    amount,
                    onBehalfOf: beneficiary,
                    referralCode: REFERRAL_CODE,
                },
            ),
            Self::V3 => Instruction::new(
                lending_pool,
                IPoolV3::supplyCall {
                    asset: token,
                    amount,
                    onBehalfOf: beneficiary,
                    referralCode: REFERRAL_CODE,
                },
            ),
        }
    }

    /// Step 3 of a withdraw. Both variants share the signature.
    pub fn withdraw_call(
        self,
        lending_pool: Address,
        underlying: Address,
        amount: U256,
        beneficiary: Address,
    ) -> Instruction {
        match self {
            Self::V2 => Instruction::new(
                lending_pool,
                ILendingPoolV2::withdrawCall {
                    asset: underlying,
                    amount,
                    to: beneficiary,
                },
            ),
            Self::V3 => Instruction::new(
                lending_pool,
                IPoolV3::withdrawCall {
                    asset: underlying,
                    amount,
                    to: beneficiary,
                },
            ),
        }
    }

    /// Claim everything accrued on `assets` to `beneficiary`.
    pub fn claim_call(
        self,
        controller: Address,
        assets: Vec<Address>,
        beneficiary: Address,
    ) -> Instruction {
        match self {
            Self::V2 => Instruction::new(
                controller,
                IIncentivesControllerV2::claimRewardsCall {
                    assets,
                    amount: U256::MAX,
                    to: beneficiary,
                },
            ),
            Self::V3 => Instruction::new(
                controller,
                IRewardsControllerV3::claimAllRewardsCall {
                    assets,
                    to: beneficiary,
                },
            ),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V2 => f.write_str("v2"),
            Self::V3 => f.write_str("v3"),
        }
    }
}

impl FromStr for Protocol {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v2" | "2" => Ok(Self::V2),
            "v3" | "3" => Ok(Self::V3),
            other => Err(AdapterError::invalid(format!("unknown protocol: {other}"))),
        }
    }
}
