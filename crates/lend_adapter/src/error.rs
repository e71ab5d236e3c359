use alloy_primitives::Address;
use thiserror::Error;

use crate::types::Role;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("unauthorized: {caller} is not the {role}")]
    Unauthorized { role: Role, caller: Address },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("external query: {0}")]
    ExternalQuery(String),

    #[error("decode: {0}")]
    Decode(String),

    #[error("serde-json: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdapterError {
    pub fn external(msg: impl Into<String>) -> Self {
        Self::ExternalQuery(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AdapterError>;
