//! Call sequence encoder.
//!
//! Deposit and withdraw always produce three instructions in a fixed order:
//! reset the allowance to zero, approve the exact amount, then the pool call.
//! Many tokens reject a non-zero to non-zero allowance change, hence step 1.
//! Claim and harvest produce a single instruction with no approvals.

use alloy_primitives::{Address, U256};

use crate::bindings::{ISwapRouter, IERC20};
use crate::instruction::Instruction;
use crate::protocol::Protocol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallEncoder {
    protocol: Protocol,
}

fn approve(token: Address, spender: Address, amount: U256) -> Instruction {
    Instruction::new(token, IERC20::approveCall { spender, amount })
}

impl CallEncoder {
    pub fn new(protocol: Protocol) -> Self {
        Self { protocol }
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn encode_deposit(
        &self,
        token: Address,
        lending_pool: Address,
        beneficiary: Address,
        amount: U256,
    ) -> [Instruction; 3] {
        [
            approve(token, lending_pool, U256::ZERO),
            approve(token, lending_pool, amount),
            self.protocol
                .deposit_call(lending_pool, token, amount, beneficiary),
        ]
    }

    pub fn encode_withdraw(
        &self,
        lp_token: Address,
        lending_pool: Address,
        underlying: Address,
        beneficiary: Address,
        amount: U256,
    ) -> [Instruction; 3] {
        [
            approve(lp_token, lending_pool, U256::ZERO),
            approve(lp_token, lending_pool, amount),
            self.protocol
                .withdraw_call(lending_pool, underlying, amount, beneficiary),
        ]
    }

    pub fn encode_claim(
        &self,
        controller: Address,
        assets: &[Address],
        beneficiary: Address,
    ) -> [Instruction; 1] {
        [self
            .protocol
            .claim_call(controller, assets.to_vec(), beneficiary)]
    }

    /// Swap stub turning `amount` of the reward token into the underlying.
    /// Minimum output and deadline are left open; the executor owns slippage.
    pub fn encode_harvest(
        &self,
        router: Address,
        reward_token: Address,
        underlying: Address,
        beneficiary: Address,
        amount: U256,
    ) -> [Instruction; 1] {
        [Instruction::new(
            router,
            ISwapRouter::swapExactTokensForTokensCall {
                amountIn: amount,
                amountOutMin: U256::ZERO,
                path: vec![reward_token, underlying],
                to: beneficiary,
                deadline: U256::MAX,
            },
        )]
    }
}
