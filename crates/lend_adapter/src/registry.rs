//! Capability registry client.
//!
//! Roles are resolved on every privileged call. Nothing is cached, so a role
//! change in the registry applies to the very next call.

use alloy_primitives::Address;
use tracing::warn;

use crate::error::{AdapterError, Result};
use crate::types::Role;

pub trait CapabilityRegistry: Send + Sync {
    fn operator(&self) -> Result<Address>;
    fn risk_operator(&self) -> Result<Address>;

    fn holder_of(&self, role: Role) -> Result<Address> {
        match role {
            Role::Operator => self.operator(),
            Role::RiskOperator => self.risk_operator(),
        }
    }
}

/// Fail with `Unauthorized` unless `caller` currently holds `role`.
pub fn require_role(registry: &dyn CapabilityRegistry, role: Role, caller: Address) -> Result<()> {
    let holder = registry.holder_of(role)?;
    if holder != caller {
        warn!(%role, %caller, "rejected call: caller does not hold role");
        return Err(AdapterError::Unauthorized { role, caller });
    }
    Ok(())
}
