//! Rule atoms: one quantified role requirement packed into a 256-bit word

use crate::error::{ChartError, Result};
use crate::types::RoleId;
use orgchart_primitives::U256;

const FLAG_STRICT: u8 = 1 << 0;
const FLAG_RELATIVE: u8 = 1 << 1;

/// One quantified role requirement inside a [`crate::rule::Rule`].
///
/// Packs as a 256-bit big-endian word: byte 0 (most significant) carries
/// `modifier_flags`, byte 1 carries `quantity`, and the remaining 30 bytes
/// carry `role_id` — the same layout [`RoleId::to_word`] leaves room for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Atom {
    role_id: RoleId,
    quantity: u8,
    strict: bool,
    relative: bool,
}

impl Atom {
    /// Encode an atom, validating its constraints:
    /// `quantity ∈ [1,255]`, and `quantity ∈ [1,100]` when `relative`.
    pub fn new(role_id: RoleId, quantity: u8, strict: bool, relative: bool) -> Result<Self> {
        if quantity == 0 {
            return Err(ChartError::InvalidAtom(
                "quantity must be at least 1".to_string(),
            ));
        }
        if relative && quantity > 100 {
            return Err(ChartError::InvalidAtom(
                "relative quantity must be a percentage in [1,100]".to_string(),
            ));
        }
        Ok(Self {
            role_id,
            quantity,
            strict,
            relative,
        })
    }

    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    pub fn quantity(&self) -> u8 {
        self.quantity
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn relative(&self) -> bool {
        self.relative
    }

    /// Pack this atom into its 256-bit word encoding.
    pub fn encode(&self) -> U256 {
        let mut word = self.role_id.to_word();
        word[1] = self.quantity;
        let mut modifier_flags = 0u8;
        if self.strict {
            modifier_flags |= FLAG_STRICT;
        }
        if self.relative {
            modifier_flags |= FLAG_RELATIVE;
        }
        word[0] = modifier_flags;
        U256::from_be_bytes(word)
    }

    /// Decode an atom from its 256-bit word encoding, re-running the
    /// validation `new` performs.
    pub fn decode(word: U256) -> Result<Self> {
        let bytes = word.to_be_bytes::<32>();
        let modifier_flags = bytes[0];
        let quantity = bytes[1];
        let mut role_id_bytes = [0u8; 30];
        role_id_bytes.copy_from_slice(&bytes[2..]);

        let strict = modifier_flags & FLAG_STRICT != 0;
        let relative = modifier_flags & FLAG_RELATIVE != 0;

        Self::new(RoleId::from_bytes(role_id_bytes), quantity, strict, relative)
    }
}

impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Atom {
    /// Atoms sort ascending by their 256-bit numeric encoding,
    /// not by field declaration order.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.encode().cmp(&other.encode())
    }
}
