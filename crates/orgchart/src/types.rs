//! Core value types shared across the engine

use orgchart_primitives::{keccak256, U256};
use std::fmt;

/// A 256-bit bit-vector; used both as a single role [`Flag`] (exactly one bit
/// set) and as a [`Mask`] (any subset of bits).
pub type Flag = U256;

/// See [`Flag`] — the two aliases exist purely for call-site readability.
pub type Mask = U256;

/// Freshness-window / sizing constants.
pub const LOOK_BACK_LENGTH: u64 = 3;
pub const MAX_NUM_SIGNERS: usize = 100;
pub const MAX_NUM_RULES: usize = 10;

/// Maximum number of simultaneously-allocated role slots: one
/// bit per role in a 256-bit word.
pub const MAX_ROLE_SLOTS: usize = 256;

/// Opaque role identifier: the 30 low bytes of a hash of the role's human
/// name. The two high bytes of the containing word are reserved for atom
/// metadata and must never be set on a stored `RoleId`.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct RoleId([u8; 30]);

impl RoleId {
    /// Build a `RoleId` from its raw 30 bytes directly.
    pub const fn from_bytes(bytes: [u8; 30]) -> Self {
        Self(bytes)
    }

    /// Derive a `RoleId` from a human-readable role name the way a static
    /// chart's role table does: the low 30 bytes of `keccak256(name)`.
    pub fn from_name(name: &str) -> Self {
        let digest = keccak256(name.as_bytes());
        let mut bytes = [0u8; 30];
        bytes.copy_from_slice(&digest.as_slice()[2..]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 30] {
        &self.0
    }

    /// Parse a raw 32-byte word as a `role_id`, requiring the top two bytes
    /// to be zero.
    pub fn try_from_word(word: [u8; 32]) -> Result<Self, crate::error::ChartError> {
        if word[0] != 0 || word[1] != 0 {
            return Err(crate::error::ChartError::MalformedRoleId);
        }
        let mut bytes = [0u8; 30];
        bytes.copy_from_slice(&word[2..]);
        Ok(Self(bytes))
    }

    /// Left-pad to a full 32-byte word (top two bytes zero), matching the
    /// atom layout with `quantity`/`modifier_flags` left unset.
    pub fn to_word(self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[2..].copy_from_slice(&self.0);
        word
    }
}

impl fmt::Debug for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoleId(0x")?;
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        write!(f, ")")
    }
}

/// The action a rule governs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Grant,
    Revoke,
    Admin,
}

impl Action {
    /// The canonical lowercase name hashed into a rule's `action_digest`.
    pub const fn name(self) -> &'static str {
        match self {
            Action::Grant => "grant",
            Action::Revoke => "revoke",
            Action::Admin => "admin",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_id_from_name_is_deterministic() {
        let a = RoleId::from_name("treasurer");
        let b = RoleId::from_name("treasurer");
        assert_eq!(a, b);
    }

    #[test]
    fn role_id_word_has_zero_high_bytes() {
        let id = RoleId::from_name("treasurer");
        let word = id.to_word();
        assert_eq!(&word[..2], &[0u8, 0u8]);
    }

    #[test]
    fn distinct_names_yield_distinct_ids() {
        assert_ne!(RoleId::from_name("a"), RoleId::from_name("b"));
    }
}
