//! Lending adapter core: deposit limits and ordered call encoding.
//!
//! The adapter turns a "deposit N of token X into pool P" (or withdraw, claim,
//! harvest) intent into a list of ABI-encoded instructions that a downstream
//! executor replays verbatim. Deposits are bounded by the limit policy first.
//!
//! # Architecture
//!
//! ```text
//! LendingAdapter (facade, role checks)
//!   │
//!   ├── LimitStore ── admissible_amount()      (policy, RwLock snapshot)
//!   ├── CallEncoder ── Protocol { V2 | V3 }    (approve 0, approve n, call)
//!   ├── LendingGateway / RewardsGateway        (live balances, pool value)
//!   └── CapabilityRegistry                     (operator / risk operator)
//! ```
//!
//! Collaborators are traits; `testing` holds in-memory versions of them.

pub mod adapter;
pub mod bindings;
pub mod config;
pub mod encoder;
pub mod error;
pub mod gateway;
pub mod instruction;
pub mod policy;
pub mod protocol;
pub mod registry;
pub mod testing;
pub mod types;

pub use adapter::LendingAdapter;
pub use config::AdapterConfig;
pub use encoder::CallEncoder;
pub use error::{AdapterError, Result};
pub use gateway::{LendingGateway, RewardBalances, RewardsGateway};
pub use instruction::{decode_call, DecodedCall, Instruction};
pub use policy::{admissible_amount, LimitConfig, LimitSettings, LimitStore, MAX_BPS};
pub use protocol::{Protocol, RewardShape};
pub use registry::{require_role, CapabilityRegistry};
pub use types::{LimitMode, PoolId, Role};

pub use alloy_primitives::{Address, Bytes, U256};
