#![allow(dead_code)]

use lend_adapter::testing::{MemoryLedger, StaticRegistry};
use lend_adapter::{
    decode_call, AdapterConfig, Address, DecodedCall, Instruction, LendingAdapter, PoolId,
    Protocol, U256,
};
use std::sync::Arc;

pub const OPERATOR: Address = Address::repeat_byte(0x08);
pub const RISK_OPERATOR: Address = Address::repeat_byte(0x09);
pub const ALICE: Address = Address::repeat_byte(0x01);
pub const VAULT: Address = Address::repeat_byte(0x02);

pub const REGISTRY: Address = Address::repeat_byte(0xa1);
pub const LENDING_POOL: Address = Address::repeat_byte(0xa2);
pub const CONTROLLER: Address = Address::repeat_byte(0xa3);
pub const ROUTER: Address = Address::repeat_byte(0xa4);

pub const USDC: Address = Address::repeat_byte(0xb1);
pub const A_USDC: Address = Address::repeat_byte(0xb2);
pub const DAI: Address = Address::repeat_byte(0xc1);
pub const A_DAI: Address = Address::repeat_byte(0xc2);
pub const REWARD: Address = Address::repeat_byte(0xd1);

pub struct Fixture {
    pub adapter: LendingAdapter,
    pub ledger: Arc<MemoryLedger>,
    pub registry: Arc<StaticRegistry>,
}

impl Fixture {
    /// Two markets behind one registry: USDC and DAI, 100,000 units of
    /// liquidity each.
    pub fn new(protocol: Protocol) -> Self {
        let ledger = Arc::new(MemoryLedger::new(CONTROLLER));
        ledger.add_market(REGISTRY, LENDING_POOL, USDC, A_USDC, U256::from(100_000u64));
        ledger.add_market(REGISTRY, LENDING_POOL, DAI, A_DAI, U256::from(100_000u64));
        let registry = Arc::new(StaticRegistry::new(OPERATOR, RISK_OPERATOR));
        let adapter = LendingAdapter::new(
            AdapterConfig::new(protocol).with_swap_router(ROUTER),
            registry.clone(),
            ledger.clone(),
            ledger.clone(),
        );
        Self {
            adapter,
            ledger,
            registry,
        }
    }
}

pub fn usdc_pool() -> PoolId {
    PoolId::new(REGISTRY, USDC)
}

pub fn dai_pool() -> PoolId {
    PoolId::new(REGISTRY, DAI)
}

pub fn units(n: u64) -> U256 {
    U256::from(n)
}

/// Decode codes the way an executor receives them: wire bytes first.
pub fn decode_wire(codes: &[Instruction]) -> Vec<(Address, DecodedCall)> {
    codes
        .iter()
        .map(|ix| {
            let wire = ix.encode();
            let back = Instruction::decode(&wire).expect("wire decode");
            (back.target, decode_call(&back).expect("call decode"))
        })
        .collect()
}

pub fn check_deposit_codes(
    protocol: Protocol,
    codes: &[Instruction],
    token: Address,
    lending_pool: Address,
    account: Address,
    amount: U256,
) {
    assert_eq!(codes.len(), 3, "deposit must encode exactly three instructions");
    let decoded = decode_wire(codes);
    assert_eq!(
        decoded[0],
        (token, DecodedCall::Approve { spender: lending_pool, amount: U256::ZERO })
    );
    assert_eq!(
        decoded[1],
        (token, DecodedCall::Approve { spender: lending_pool, amount })
    );
    let expected = match protocol {
        Protocol::V2 => DecodedCall::Deposit {
            asset: token,
            amount,
            on_behalf_of: account,
            referral_code: 0,
        },
        Protocol::V3 => DecodedCall::Supply {
            asset: token,
            amount,
            on_behalf_of: account,
            referral_code: 0,
        },
    };
    assert_eq!(decoded[2], (lending_pool, expected));
}

pub fn check_withdraw_codes(
    codes: &[Instruction],
    lp_token: Address,
    token: Address,
    lending_pool: Address,
    account: Address,
    amount: U256,
) {
    assert_eq!(codes.len(), 3, "withdraw must encode exactly three instructions");
    let decoded = decode_wire(codes);
    assert_eq!(
        decoded[0],
        (lp_token, DecodedCall::Approve { spender: lending_pool, amount: U256::ZERO })
    );
    assert_eq!(
        decoded[1],
        (lp_token, DecodedCall::Approve { spender: lending_pool, amount })
    );
    assert_eq!(
        decoded[2],
        (lending_pool, DecodedCall::Withdraw { asset: token, amount, to: account })
    );
}
