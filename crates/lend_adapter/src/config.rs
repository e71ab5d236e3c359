use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AdapterError, Result};
use crate::protocol::Protocol;

/// Static adapter settings. Deposit limits are not part of it: they start
/// zero-valued and only change through role-gated setters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Lending protocol variant the encoder targets.
    #[serde(default)]
    pub protocol: Protocol,
    /// Router the harvest stub swaps through. Harvest is unavailable without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap_router: Option<Address>,
}

impl AdapterConfig {
    pub fn new(protocol: Protocol) -> Self {
        Self {
            protocol,
            swap_router: None,
        }
    }

    pub fn with_swap_router(mut self, router: Address) -> Self {
        self.swap_router = Some(router);
        self
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AdapterError::invalid(format!("read config {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    /// `LEND_PROTOCOL` (v2|v3, default v3) and `LEND_SWAP_ROUTER` (optional).
    pub fn from_env() -> Result<Self> {
        let protocol = match std::env::var("LEND_PROTOCOL") {
            Ok(v) => v.parse()?,
            Err(_) => Protocol::default(),
        };
        let swap_router = match std::env::var("LEND_SWAP_ROUTER") {
            Ok(v) => Some(v.trim().parse::<Address>().map_err(|e| {
                AdapterError::invalid(format!("LEND_SWAP_ROUTER: {e}"))
            })?),
            Err(_) => None,
        };
        Ok(Self {
            protocol,
            swap_router,
        })
    }
}
