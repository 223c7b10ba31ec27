//! User management: grant and revoke, operating on a registry
//! plus an external `user → roles` map.

use crate::registry::RoleRegistry;
use crate::types::{Mask, RoleId};
use orgchart_primitives::Address;
use std::collections::HashMap;
use tracing::info;

/// Grant `role_id` to `nominee`. Idempotent: a nominee who
/// already directly holds the role is left unchanged.
pub fn grant(
    registry: &mut RoleRegistry,
    user_roles: &mut HashMap<Address, Mask>,
    nominee: Address,
    role_id: RoleId,
) -> crate::error::Result<()> {
    let flag = registry.lookup_flag(role_id)?;
    let entry = user_roles.entry(nominee).or_insert(Mask::ZERO);
    if *entry & flag == Mask::ZERO {
        *entry |= flag;
        registry.increment_assignment_count(flag);
        info!(user = ?nominee, ?role_id, "role granted");
    }
    Ok(())
}

/// Revoke `role_id` from `nominee`. Revoking a role not directly
/// held is a no-op: it does not remove inherited authority and does not
/// error.
pub fn revoke(
    registry: &mut RoleRegistry,
    user_roles: &mut HashMap<Address, Mask>,
    nominee: Address,
    role_id: RoleId,
) -> crate::error::Result<()> {
    let flag = registry.lookup_flag(role_id)?;
    if let Some(entry) = user_roles.get_mut(&nominee) {
        if *entry & flag != Mask::ZERO {
            *entry &= !flag;
            registry.decrement_assignment_count(flag);
            info!(user = ?nominee, ?role_id, "role revoked");
        }
    }
    Ok(())
}
