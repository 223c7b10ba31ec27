//! Rule representation and canonical hashing

use crate::atom::Atom;
use crate::types::Action;
use orgchart_primitives::{abi, keccak256, B256};

/// The EIP-712-style type-hash input for every rule; fixed and publicly known.
const RULE_TYPE_STRING: &[u8] = b"Rule(bytes32 type,bool selfSigned,bytes32 ruleHash)";

/// A rule: `(action, self_sign_required, sorted_atoms)`.
///
/// `self_sign_required` is meaningful only for [`Action::Grant`]; it is
/// still folded into the hash for every action (a rule can be
/// syntactically constructed with `self_sign_required = true` on a
/// non-grant action — the engine hashes it as given and logs a warning
/// at registration rather than rejecting it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    action: Action,
    self_sign_required: bool,
    atoms: Vec<Atom>,
}

impl Rule {
    /// Build a rule, sorting its atoms ascending by numeric encoding
    /// so that [`Rule::hash`] is independent of input order.
    pub fn new(action: Action, self_sign_required: bool, mut atoms: Vec<Atom>) -> Self {
        atoms.sort();
        Self {
            action,
            self_sign_required,
            atoms,
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn self_sign_required(&self) -> bool {
        self.self_sign_required
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// The canonical rule hash.
    ///
    /// Computed identically here and by any off-chain prover that agrees on
    /// atom ordering and ABI word packing: both must land on the same hash
    /// for the rule-hash lookup to succeed.
    pub fn hash(&self) -> B256 {
        rule_hash(self.action, self.self_sign_required, &self.atoms)
    }
}

/// Free function mirroring [`Rule::hash`], usable by a caller that only has
/// the raw `(action, self_sign_required, atoms)` triple (e.g. a prover that
/// builds an approval without materializing a [`Rule`]).
///
/// `atoms` is sorted internally; callers do not need to pre-sort.
pub fn rule_hash(action: Action, self_sign_required: bool, atoms: &[Atom]) -> B256 {
    let mut sorted = atoms.to_vec();
    sorted.sort();

    let atom_words: Vec<abi::Word> = sorted.iter().map(|a| a.encode().to_be_bytes::<32>()).collect();
    let atoms_digest = keccak256(&abi::encode_words(&atom_words));

    let type_digest = keccak256(RULE_TYPE_STRING);
    let action_digest = keccak256(action.name().as_bytes());

    let encoded = abi::encode_words(&[
        abi::word_from_b256(type_digest),
        abi::word_from_b256(action_digest),
        abi::word_from_bool(self_sign_required),
        abi::word_from_b256(atoms_digest),
    ]);

    keccak256(&encoded)
}
