//! Role registry: role-id/flag bookkeeping, structure masks, and
//! the reverse-topological role index.

use crate::error::{ChartError, Result};
use crate::types::{Flag, Mask, RoleId, MAX_ROLE_SLOTS};
use orgchart_primitives::B256;
use std::collections::HashMap;

/// Sentinel stored in [`RoleRegistry::rule_active_flags`] for admin rules,
/// distinguishing them from the OR'd role flags a user-management rule is
/// registered under.
pub const ADMIN_RULE_SENTINEL: Mask = Mask::MAX;

/// Maintains the authoritative maps for the chart's persisted state:
/// `role_id → flag`, `flag → structure_mask`, `flag → direct_junior_mask`,
/// `role_id → assignment_count`, plus the active/free flag bitsets and the
/// reverse-topological `role_index` array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleRegistry {
    role_id_to_flag: HashMap<RoleId, Flag>,
    flag_to_role_id: HashMap<Flag, RoleId>,
    structure_mask: HashMap<Flag, Mask>,
    direct_junior_mask: HashMap<Flag, Mask>,
    assignment_count: HashMap<Flag, u64>,
    active_role_flags: Mask,
    free_role_flags: Mask,
    /// Reverse-topological: juniors at lower indices than their seniors.
    role_index: Vec<Flag>,
    rule_to_active_flags: HashMap<B256, Mask>,
}

impl RoleRegistry {
    /// An empty registry with every one of the 256 role slots free.
    pub fn new() -> Self {
        let mut free_role_flags = Mask::ZERO;
        for bit in 0..MAX_ROLE_SLOTS {
            free_role_flags |= Mask::from(1u64) << bit;
        }
        Self {
            free_role_flags,
            ..Default::default()
        }
    }

    pub fn lookup_flag(&self, role_id: RoleId) -> Result<Flag> {
        self.role_id_to_flag
            .get(&role_id)
            .copied()
            .ok_or(ChartError::UnknownRole)
    }

    pub fn lookup_role_id(&self, flag: Flag) -> Result<RoleId> {
        self.flag_to_role_id.get(&flag).copied().ok_or(ChartError::UnknownRole)
    }

    pub fn lookup_mask(&self, flag: Flag) -> Result<Mask> {
        self.structure_mask.get(&flag).copied().ok_or(ChartError::UnknownRole)
    }

    pub fn lookup_junior_mask(&self, flag: Flag) -> Result<Mask> {
        self.direct_junior_mask
            .get(&flag)
            .copied()
            .ok_or(ChartError::UnknownRole)
    }

    pub fn assignment_count(&self, flag: Flag) -> u64 {
        self.assignment_count.get(&flag).copied().unwrap_or(0)
    }

    pub fn active_role_flags(&self) -> Mask {
        self.active_role_flags
    }

    pub fn free_role_flags(&self) -> Mask {
        self.free_role_flags
    }

    pub fn is_active(&self, flag: Flag) -> bool {
        self.active_role_flags & flag == flag
    }

    pub fn num_active_roles(&self) -> usize {
        self.role_index.len()
    }

    /// Active role flags, reverse-topological (juniors before their seniors).
    pub fn role_index(&self) -> &[Flag] {
        &self.role_index
    }

    pub(crate) fn increment_assignment_count(&mut self, flag: Flag) {
        *self.assignment_count.entry(flag).or_insert(0) += 1;
    }

    pub(crate) fn decrement_assignment_count(&mut self, flag: Flag) {
        if let Some(count) = self.assignment_count.get_mut(&flag) {
            *count = count.saturating_sub(1);
        }
    }

    pub(crate) fn structure_mask_mut(&mut self, flag: Flag) -> Option<&mut Mask> {
        self.structure_mask.get_mut(&flag)
    }

    pub(crate) fn direct_junior_mask_mut(&mut self, flag: Flag) -> Option<&mut Mask> {
        self.direct_junior_mask.get_mut(&flag)
    }

    pub(crate) fn set_structure_mask(&mut self, flag: Flag, mask: Mask) {
        self.structure_mask.insert(flag, mask);
    }

    pub(crate) fn set_direct_junior_mask(&mut self, flag: Flag, mask: Mask) {
        self.direct_junior_mask.insert(flag, mask);
    }

    /// Insert `flag` at `index` in `role_index`, shifting everything from
    /// `index` onward one slot right.
    pub(crate) fn insert_into_index(&mut self, index: usize, flag: Flag) {
        self.role_index.insert(index, flag);
    }

    /// Remove `flag` from `role_index`, shifting everything after it one
    /// slot left.
    pub(crate) fn remove_from_index(&mut self, flag: Flag) {
        if let Some(pos) = self.role_index.iter().position(|f| *f == flag) {
            self.role_index.remove(pos);
        }
    }

    pub(crate) fn register_role(
        &mut self,
        role_id: RoleId,
        flag: Flag,
        structure_mask: Mask,
        direct_junior_mask: Mask,
    ) {
        self.role_id_to_flag.insert(role_id, flag);
        self.flag_to_role_id.insert(flag, role_id);
        self.structure_mask.insert(flag, structure_mask);
        self.direct_junior_mask.insert(flag, direct_junior_mask);
        self.free_role_flags &= !flag;
        self.active_role_flags |= flag;
    }

    /// The mask (or [`ADMIN_RULE_SENTINEL`]) registered for `rule_hash`, or
    /// zero if the hash is not bound to anything.
    pub fn rule_active_flags(&self, rule_hash: B256) -> Mask {
        self.rule_to_active_flags.get(&rule_hash).copied().unwrap_or(Mask::ZERO)
    }

    /// OR `flag` into `rule_hash`'s registered flag set.
    pub(crate) fn bind_rule_hash(&mut self, rule_hash: B256, flag: Mask) {
        let entry = self.rule_to_active_flags.entry(rule_hash).or_insert(Mask::ZERO);
        *entry |= flag;
    }

    /// Mark `rule_hash` as an admin rule via the all-bits-set sentinel.
    pub(crate) fn bind_admin_rule_hash(&mut self, rule_hash: B256) {
        self.rule_to_active_flags.insert(rule_hash, ADMIN_RULE_SENTINEL);
    }

    /// Clear every binding for `flag`. Deliberately does NOT
    /// restore `flag` to `free_role_flags` — flag re-use is barred for the
    /// lifetime of the registry.
    pub(crate) fn deregister_role(&mut self, role_id: RoleId, flag: Flag) {
        self.role_id_to_flag.remove(&role_id);
        self.flag_to_role_id.remove(&flag);
        self.structure_mask.remove(&flag);
        self.direct_junior_mask.remove(&flag);
        self.assignment_count.remove(&flag);
        self.active_role_flags &= !flag;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_registry_has_all_slots_free() {
        let reg = RoleRegistry::new();
        assert_eq!(reg.active_role_flags(), Mask::ZERO);
        assert_eq!(reg.num_active_roles(), 0);
        for bit in 0..MAX_ROLE_SLOTS {
            let flag = Mask::from(1u64) << bit;
            assert_eq!(reg.free_role_flags() & flag, flag);
        }
    }

    #[test]
    fn unknown_role_lookup_fails() {
        let reg = RoleRegistry::new();
        let err = reg.lookup_flag(RoleId::from_name("ghost")).unwrap_err();
        assert_eq!(err, ChartError::UnknownRole);
    }

    #[test]
    fn register_and_deregister_round_trip() {
        let mut reg = RoleRegistry::new();
        let role_id = RoleId::from_name("dso");
        let flag = Mask::from(1u64);
        reg.register_role(role_id, flag, flag, Mask::ZERO);
        assert!(reg.is_active(flag));
        assert_eq!(reg.lookup_flag(role_id).unwrap(), flag);
        assert_eq!(reg.free_role_flags() & flag, Mask::ZERO);

        reg.deregister_role(role_id, flag);
        assert!(!reg.is_active(flag));
        assert!(reg.lookup_flag(role_id).is_err());
        // Flag must NOT return to the free pool.
        assert_eq!(reg.free_role_flags() & flag, Mask::ZERO);
    }
}
