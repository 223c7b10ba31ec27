//! Rule fulfillment: checking that a verified signer set satisfies a
//! rule's quantified atoms.

use crate::atom::Atom;
use crate::error::{ChartError, Result};
use crate::oracle::{has_role, strictly_has_role};
use crate::registry::RoleRegistry;
use orgchart_primitives::Address;
use std::collections::HashMap;

/// Check that `signers` (already verified and strictly ascending)
/// satisfy every atom in `atoms`, given a caller-supplied `assignment` of
/// one atom index per signer (or `atoms.len()` for the nominee's self-sign).
///
/// `user_roles` resolves a signer's directly-assigned role bit-vector; the
/// caller supplies it instead of this module owning a user→roles map so
/// fulfillment stays decoupled from where assignments are stored.
#[allow(clippy::too_many_arguments)]
pub fn check_fulfillment(
    registry: &RoleRegistry,
    nominee: Option<Address>,
    signers: &[Address],
    atoms: &[Atom],
    assignment: &[usize],
    user_roles: impl Fn(Address) -> orgchart_primitives::U256,
    max_num_signers: usize,
) -> Result<()> {
    if assignment.len() != signers.len() {
        return Err(ChartError::InvalidAssignment);
    }

    let mut counts: HashMap<usize, u64> = HashMap::new();

    for (i, signer) in signers.iter().enumerate() {
        if Some(*signer) == nominee {
            continue;
        }
        let idx = assignment[i];
        if idx >= atoms.len() {
            return Err(ChartError::InvalidAssignment);
        }
        let atom = atoms[idx];
        let roles = user_roles(*signer);
        let satisfied = if atom.strict() {
            strictly_has_role(registry, roles, atom.role_id())?
        } else {
            has_role(registry, roles, atom.role_id())?
        };
        if !satisfied {
            return Err(ChartError::PermissionDenied);
        }
        *counts.entry(idx).or_insert(0) += 1;
    }

    for (idx, atom) in atoms.iter().enumerate() {
        let quantity = atom.quantity() as u64;
        let required = if atom.relative() {
            let base = registry.assignment_count(registry.lookup_flag(atom.role_id())?);
            let raw = (base * quantity).div_ceil(100);
            raw.clamp(1, max_num_signers as u64)
        } else {
            quantity
        };
        let got = counts.get(&idx).copied().unwrap_or(0);
        if got < required {
            return Err(ChartError::NotEnoughSigners);
        }
    }

    Ok(())
}
