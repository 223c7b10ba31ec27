//! Inheritance oracle: `has_role` / `strictly_has_role` and the
//! structure-mask closure they build on.

use crate::registry::RoleRegistry;
use crate::types::{Flag, Mask, RoleId};
use tracing::debug;

/// OR together the `structure_mask` of every role whose bit is set in
/// `flags`. Each set bit is located by repeatedly taking the lowest
/// set bit and clearing it, so the cost is `O(popcount(flags))` registry
/// lookups rather than a 256-bit scan.
pub fn build_structure_mask(registry: &RoleRegistry, flags: Mask) -> Mask {
    let mut remaining = flags;
    let mut effective = Mask::ZERO;
    while remaining != Mask::ZERO {
        let lowest_bit = remaining & (!remaining + Mask::from(1u64));
        if let Ok(mask) = registry.lookup_mask(lowest_bit) {
            effective |= mask;
        }
        remaining &= !lowest_bit;
    }
    effective
}

/// `has_role(user, role_id)`: true if `role_id` is held directly or
/// via inheritance through the junior closure.
pub fn has_role(registry: &RoleRegistry, user_roles: Mask, role_id: RoleId) -> crate::error::Result<bool> {
    let required = registry.lookup_flag(role_id)?;
    let held = user_roles & registry.active_role_flags();

    if held & required == required {
        debug!(?role_id, "role held directly");
        return Ok(true);
    }
    if held == Mask::ZERO {
        return Ok(false);
    }

    let effective = build_structure_mask(registry, held);
    let result = effective & required == required;
    debug!(?role_id, via_inheritance = result, "inheritance closure checked");
    Ok(result)
}

/// `strictly_has_role(user, role_id)`: true only if `role_id` is held
/// directly, ignoring the inheritance closure entirely.
pub fn strictly_has_role(
    registry: &RoleRegistry,
    user_roles: Mask,
    role_id: RoleId,
) -> crate::error::Result<bool> {
    let required = registry.lookup_flag(role_id)?;
    let held = user_roles & registry.active_role_flags();
    Ok(held & required == required)
}
