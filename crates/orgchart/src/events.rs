//! Events emitted by successful mutating operations.

use crate::types::{Mask, RoleId};
use orgchart_primitives::Address;

/// A record of a successful mutating operation, collected into the caller's
/// transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    RoleGranted { user: Address, role_id: RoleId },
    RoleRevoked { user: Address, role_id: RoleId },
    RoleAdded {
        role_id: RoleId,
        senior_flags: Mask,
        junior_flags: Mask,
    },
    RoleRemoved { role_id: RoleId },
}
