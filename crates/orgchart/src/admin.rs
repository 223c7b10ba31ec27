//! Dynamic admin: add-role and remove-role mechanics, gated by
//! admin-rule fulfillment at the `Chart` layer.

use crate::config::EngineConfig;
use crate::error::{ChartError, Result};
use crate::oracle::build_structure_mask;
use crate::registry::RoleRegistry;
use crate::types::{Flag, Mask, RoleId};
use orgchart_primitives::B256;
use tracing::info;

/// The caller-supplied definition of a role to add.
#[derive(Debug, Clone)]
pub struct RoleDef {
    pub role_id: RoleId,
    pub flag: Flag,
    pub senior_flags: Mask,
    pub junior_flags: Mask,
    pub rule_hashes: Vec<B256>,
}

fn is_single_bit(flag: Flag) -> bool {
    flag != Mask::ZERO && (flag & (flag - Mask::from(1u64))) == Mask::ZERO
}

/// Basic validation before the admin approval is even checked.
pub fn validate_add_role(registry: &RoleRegistry, role_def: &RoleDef, config: &EngineConfig) -> Result<()> {
    if !is_single_bit(role_def.flag) {
        return Err(ChartError::MalformedRoleFlag);
    }
    if role_def.flag & registry.free_role_flags() == Mask::ZERO {
        return Err(ChartError::RoleFlagTaken);
    }
    if registry.lookup_flag(role_def.role_id).is_ok() {
        return Err(ChartError::RoleIdTaken);
    }
    let active = registry.active_role_flags();
    if role_def.senior_flags & !active != Mask::ZERO {
        return Err(ChartError::SeniorsMissing);
    }
    if role_def.junior_flags & !active != Mask::ZERO {
        return Err(ChartError::JuniorsMissing);
    }
    if role_def.rule_hashes.len() >= config.max_num_rules {
        return Err(ChartError::TooManyRules);
    }
    Ok(())
}

/// Cycle detection, ancestor update, index insertion, and
/// registration. Shared by `Chart::add_role` (after steps 1-2) and
/// `StaticChart::build` (construction skips steps 1-2 entirely).
pub fn apply_add_role(registry: &mut RoleRegistry, role_def: &RoleDef) -> Result<()> {
    // Step 3: cycle detection.
    let mut new_structure_mask = role_def.flag;
    new_structure_mask |= build_structure_mask(registry, role_def.junior_flags);
    if new_structure_mask & role_def.senior_flags != Mask::ZERO {
        return Err(ChartError::CycleDetected);
    }

    // Step 4: ancestor update.
    let mut first_parent: Option<usize> = None;
    let index_snapshot: Vec<Flag> = registry.role_index().to_vec();
    for (i, ancestor_flag) in index_snapshot.iter().enumerate() {
        let ancestor_flag = *ancestor_flag;
        let is_direct_parent = role_def.senior_flags & ancestor_flag != Mask::ZERO;
        if is_direct_parent {
            if let Some(mask) = registry.direct_junior_mask_mut(ancestor_flag) {
                *mask |= role_def.flag;
            }
            first_parent = Some(first_parent.map_or(i, |f| f.min(i)));
        }

        let ancestor_structure = registry.lookup_mask(ancestor_flag)?;
        if ancestor_structure & role_def.senior_flags != Mask::ZERO {
            if let Some(mask) = registry.structure_mask_mut(ancestor_flag) {
                *mask |= new_structure_mask;
            }
        }
    }

    // Step 5: insertion, preserving the reverse-topological invariant.
    let insert_at = first_parent.unwrap_or(registry.num_active_roles());
    registry.insert_into_index(insert_at, role_def.flag);

    // Step 6: registration.
    registry.register_role(
        role_def.role_id,
        role_def.flag,
        new_structure_mask,
        role_def.junior_flags,
    );
    for rule_hash in &role_def.rule_hashes {
        registry.bind_rule_hash(*rule_hash, role_def.flag);
    }

    info!(role_id = ?role_def.role_id, "role added");
    Ok(())
}

/// Ancestor update, index removal, and binding cleanup.
/// Does NOT free the flag back to the free pool.
pub fn apply_remove_role(registry: &mut RoleRegistry, role_id: RoleId) -> Result<()> {
    let flag = registry.lookup_flag(role_id)?;

    let index_snapshot: Vec<Flag> = registry.role_index().to_vec();
    for ancestor_flag in index_snapshot {
        if ancestor_flag == flag {
            continue;
        }
        let mut junior_cleared = false;
        if let Some(mask) = registry.direct_junior_mask_mut(ancestor_flag) {
            if *mask & flag != Mask::ZERO {
                *mask &= !flag;
                junior_cleared = true;
            }
        }
        let structure = registry.lookup_mask(ancestor_flag)?;
        if structure & flag != Mask::ZERO {
            // The direct-junior clear above must run first so the removed
            // bit doesn't reappear via the stale direct-junior set.
            let _ = junior_cleared;
            let direct_juniors = registry.lookup_junior_mask(ancestor_flag)?;
            let rebuilt = ancestor_flag | build_structure_mask(registry, direct_juniors);
            registry.set_structure_mask(ancestor_flag, rebuilt);
        }
    }

    registry.remove_from_index(flag);
    registry.deregister_role(role_id, flag);

    info!(?role_id, "role removed");
    Ok(())
}
