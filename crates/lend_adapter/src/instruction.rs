//! Encoded instructions, the unit the downstream executor replays.
//!
//! Wire form: the ABI encoding of the parameter pair
//! `(address target, bytes calldata)`, i.e. what `abi.encode(target, data)`
//! produces on-chain. A verifier decodes the pair, then decodes `calldata`
//! against the selector it starts with.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolValue};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bindings::{
    IIncentivesControllerV2, ILendingPoolV2, IPoolV3, IRewardsControllerV3, ISwapRouter, IERC20,
};
use crate::error::{AdapterError, Result};

/// One call addressed to a target contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub target: Address,
    pub calldata: Bytes,
}

impl Instruction {
    pub fn new(target: Address, call: impl SolCall) -> Self {
        Self {
            target,
            calldata: Bytes::from(call.abi_encode()),
        }
    }

    /// Encode to the executor wire form.
    pub fn encode(&self) -> Bytes {
        Bytes::from((self.target, self.calldata.clone()).abi_encode_params())
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let (target, calldata) = <(Address, Bytes)>::abi_decode_params(data)
            .map_err(|e| AdapterError::Decode(format!("instruction: {e}")))?;
        Ok(Self { target, calldata })
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.encode()))
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let raw = hex::decode(s.trim().trim_start_matches("0x"))
            .map_err(|e| AdapterError::Decode(format!("hex: {e}")))?;
        Self::decode(&raw)
    }

    /// First four bytes of the calldata, if present.
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.calldata.get(..4).map(|s| [s[0], s[1], s[2], s[3]])
    }
}

/// Encode a full instruction list to wire form, preserving order.
pub fn encode_all(instructions: &[Instruction]) -> Vec<Bytes> {
    instructions.iter().map(Instruction::encode).collect()
}

/// A decoded call, one variant per function the encoder emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedCall {
    Approve {
        spender: Address,
        amount: U256,
    },
    Deposit {
        asset: Address,
        amount: U256,
        on_behalf_of: Address,
        referral_code: u16,
    },
    Supply {
        asset: Address,
        amount: U256,
        on_behalf_of: Address,
        referral_code: u16,
    },
    /// Same selector on V2 and V3 pools.
    Withdraw {
        asset: Address,
        amount: U256,
        to: Address,
    },
    ClaimRewards {
        assets: Vec<Address>,
        amount: U256,
        to: Address,
    },
    ClaimAllRewards {
        assets: Vec<Address>,
        to: Address,
    },
    Swap {
        amount_in: U256,
        amount_out_min: U256,
        path: Vec<Address>,
        to: Address,
        deadline: U256,
    },
}

impl DecodedCall {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Approve { .. } => "approve",
            Self::Deposit { .. } => "deposit",
            Self::Supply { .. } => "supply",
            Self::Withdraw { .. } => "withdraw",
            Self::ClaimRewards { .. } => "claimRewards",
            Self::ClaimAllRewards { .. } => "claimAllRewards",
            Self::Swap { .. } => "swapExactTokensForTokens",
        }
    }
}

impl fmt::Display for DecodedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approve { spender, amount } => write!(f, "approve({spender}, {amount})"),
            Self::Deposit {
                asset,
                amount,
                on_behalf_of,
                referral_code,
            } => write!(f, "deposit({asset}, {amount}, {on_behalf_of}, {referral_code})"),
            Self::Supply {
                asset,
                amount,
                on_behalf_of,
                referral_code,
            } => write!(f, "supply({asset}, {amount}, {on_behalf_of}, {referral_code})"),
            Self::Withdraw { asset, amount, to } => write!(f, "withdraw({asset}, {amount}, {to})"),
            Self::ClaimRewards { assets, amount, to } => {
                write!(f, "claimRewards({assets:?}, {amount}, {to})")
            }
            Self::ClaimAllRewards { assets, to } => write!(f, "claimAllRewards({assets:?}, {to})"),
            Self::Swap {
                amount_in,
                amount_out_min,
                path,
                to,
                deadline,
            } => write!(
                f,
                "swapExactTokensForTokens({amount_in}, {amount_out_min}, {path:?}, {to}, {deadline})"
            ),
        }
    }
}

fn decode_err(name: &str, e: alloy_sol_types::Error) -> AdapterError {
    AdapterError::Decode(format!("{name}: {e}"))
}

/// Decode an instruction's calldata against every selector the encoder emits.
pub fn decode_call(ix: &Instruction) -> Result<DecodedCall> {
    let data = ix.calldata.as_ref();
    let selector = ix
        .selector()
        .ok_or_else(|| AdapterError::Decode("calldata shorter than a selector".into()))?;

    if selector == IERC20::approveCall::SELECTOR {
        let c = IERC20::approveCall::abi_decode(data).map_err(|e| decode_err("approve", e))?;
        Ok(DecodedCall::Approve {
            spender: c.spender,
            amount: c.amount,
        })
    } else if selector == ILendingPoolV2::depositCall::SELECTOR {
        let c =
            ILendingPoolV2::depositCall::abi_decode(data).map_err(|e| decode_err("deposit", e))?;
        Ok(DecodedCall::Deposit {
            asset: c.asset,
            amount: c.amount,
            on_behalf_of: c.onBehalfOf,
            referral_code: c.referralCode,
        })
    } else if selector == IPoolV3::supplyCall::SELECTOR {
        let c = IPoolV3::supplyCall::abi_decode(data).map_err(|e| decode_err("supply", e))?;
        Ok(DecodedCall::Supply {
            asset: c.asset,
            amount: c.amount,
            on_behalf_of: c.onBehalfOf,
            referral_code: c.referralCode,
        })
    } else if selector == IPoolV3::withdrawCall::SELECTOR {
        let c = IPoolV3::withdrawCall::abi_decode(data).map_err(|e| decode_err("withdraw", e))?;
        Ok(DecodedCall::Withdraw {
            asset: c.asset,
            amount: c.amount,
            to: c.to,
        })
    } else if selector == IIncentivesControllerV2::claimRewardsCall::SELECTOR {
        let c = IIncentivesControllerV2::claimRewardsCall::abi_decode(data)
            .map_err(|e| decode_err("claimRewards", e))?;
        Ok(DecodedCall::ClaimRewards {
            assets: c.assets,
            amount: c.amount,
            to: c.to,
        })
    } else if selector == IRewardsControllerV3::claimAllRewardsCall::SELECTOR {
        let c = IRewardsControllerV3::claimAllRewardsCall::abi_decode(data)
            .map_err(|e| decode_err("claimAllRewards", e))?;
        Ok(DecodedCall::ClaimAllRewards {
            assets: c.assets,
            to: c.to,
        })
    } else if selector == ISwapRouter::swapExactTokensForTokensCall::SELECTOR {
        let c = ISwapRouter::swapExactTokensForTokensCall::abi_decode(data)
            .map_err(|e| decode_err("swapExactTokensForTokens", e))?;
        Ok(DecodedCall::Swap {
            amount_in: c.amountIn,
            amount_out_min: c.amountOutMin,
            path: c.path,
            to: c.to,
            deadline: c.deadline,
        })
    } else {
        Err(AdapterError::Decode(format!(
            "unknown selector 0x{}",
            hex::encode(selector)
        )))
    }
}
