//! Signed-approval verification pipeline and EIP-712-style domain
//! separation / request hashing.

use crate::atom::Atom;
use crate::block_oracle::BlockOracle;
use crate::config::EngineConfig;
use crate::error::{ChartError, Result};
use crate::registry::{RoleRegistry, ADMIN_RULE_SENTINEL};
use crate::rule::rule_hash;
use crate::types::{Action, Flag, Mask, RoleId};
use orgchart_primitives::{abi, eth_signed_message_hash, keccak256, recover_signer, Address, EcdsaSignature, B256};
use tracing::{debug, warn};

const DOMAIN_TYPE_STRING: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract,bytes32 salt)";
const USER_MGT_TYPE_STRING: &[u8] =
    b"UserManagementRequest(address nominee,bytes32 action,bytes32 role,bytes32 baseBlockHash)";
const ADD_ROLE_TYPE_STRING: &[u8] = b"AddRoleRequest(bytes32 roleId,bytes32 roleFlag,bytes32 seniorFlags,bytes32 juniorFlags,bytes32 hashOfRuleHashes,bytes32 baseBlockHash)";
const REMOVE_ROLE_TYPE_STRING: &[u8] = b"RemoveRoleRequest(bytes32 roleId,bytes32 baseBlockHash)";

/// Per-deployment constant folded into every signed request.
#[derive(Debug, Clone, Copy)]
pub struct Domain {
    separator: B256,
}

impl Domain {
    pub fn new(chain_id: u64, verifying_contract: Address, salt: B256) -> Self {
        let type_hash = keccak256(DOMAIN_TYPE_STRING);
        let name_hash = keccak256(b"OrgChart");
        let version_hash = keccak256(b"1");
        let chain_id_word = abi::word_from_u256(Mask::from(chain_id));

        let encoded = abi::encode_words(&[
            abi::word_from_b256(type_hash),
            abi::word_from_b256(name_hash),
            abi::word_from_b256(version_hash),
            chain_id_word,
            abi::word_from_address(verifying_contract),
            abi::word_from_b256(salt),
        ]);

        Self {
            separator: keccak256(&encoded),
        }
    }

    pub fn separator(&self) -> B256 {
        self.separator
    }
}

/// One signed request the engine can verify, carrying only the action-specific
/// fields that feed into the request hash.
#[derive(Debug, Clone)]
pub enum RequestKind {
    UserManagement {
        nominee: Address,
        action: Action,
        role_id: RoleId,
    },
    AddRole {
        role_id: RoleId,
        role_flag: Flag,
        senior_flags: Mask,
        junior_flags: Mask,
        rule_hashes: Vec<B256>,
    },
    RemoveRole {
        role_id: RoleId,
    },
}

impl RequestKind {
    fn is_admin(&self) -> bool {
        !matches!(self, RequestKind::UserManagement { .. })
    }

    fn nominee(&self) -> Option<Address> {
        match self {
            RequestKind::UserManagement { nominee, .. } => Some(*nominee),
            _ => None,
        }
    }

    /// `inner = keccak(ABI-encode(request-type-hash, ...fields..., base_block_hash))`.
    fn inner_hash(&self, base_block_hash: B256) -> B256 {
        match self {
            RequestKind::UserManagement {
                nominee,
                action,
                role_id,
            } => {
                let type_hash = keccak256(USER_MGT_TYPE_STRING);
                let action_digest = keccak256(action.name().as_bytes());
                let role_word = {
                    let mut word = [0u8; 32];
                    word[2..].copy_from_slice(role_id.as_bytes());
                    word
                };
                let encoded = abi::encode_words(&[
                    abi::word_from_b256(type_hash),
                    abi::word_from_address(*nominee),
                    abi::word_from_b256(action_digest),
                    role_word,
                    abi::word_from_b256(base_block_hash),
                ]);
                keccak256(&encoded)
            }
            RequestKind::AddRole {
                role_id,
                role_flag,
                senior_flags,
                junior_flags,
                rule_hashes,
            } => {
                let type_hash = keccak256(ADD_ROLE_TYPE_STRING);
                let role_id_word = {
                    let mut word = [0u8; 32];
                    word[2..].copy_from_slice(role_id.as_bytes());
                    word
                };
                let rule_hash_words: Vec<abi::Word> =
                    rule_hashes.iter().map(|h| abi::word_from_b256(*h)).collect();
                let hash_of_rule_hashes = keccak256(&abi::encode_words(&rule_hash_words));

                let encoded = abi::encode_words(&[
                    abi::word_from_b256(type_hash),
                    role_id_word,
                    abi::word_from_u256(*role_flag),
                    abi::word_from_u256(*senior_flags),
                    abi::word_from_u256(*junior_flags),
                    abi::word_from_b256(hash_of_rule_hashes),
                    abi::word_from_b256(base_block_hash),
                ]);
                keccak256(&encoded)
            }
            RequestKind::RemoveRole { role_id } => {
                let type_hash = keccak256(REMOVE_ROLE_TYPE_STRING);
                let role_id_word = {
                    let mut word = [0u8; 32];
                    word[2..].copy_from_slice(role_id.as_bytes());
                    word
                };
                let encoded = abi::encode_words(&[
                    abi::word_from_b256(type_hash),
                    role_id_word,
                    abi::word_from_b256(base_block_hash),
                ]);
                keccak256(&encoded)
            }
        }
    }
}

/// An approval bundle: ordered signatures, the rule body (`atoms`),
/// a caller-supplied signer→atom assignment, the expected self-sign flag,
/// and the base block the signers attested to.
#[derive(Debug, Clone)]
pub struct Approval {
    pub signatures: Vec<EcdsaSignature>,
    pub atoms: Vec<Atom>,
    /// One index per signature into `atoms`, or `atoms.len()` as the
    /// self-sign sentinel.
    pub assignment: Vec<usize>,
    pub self_sign_required: bool,
    pub base_block_hash: B256,
}

/// The result of a successful verification: the action's rule hash and
/// the ordered, recovered signer set ready for the fulfillment check.
#[derive(Debug, Clone)]
pub struct VerifiedApproval {
    pub rule_hash: B256,
    pub signers: Vec<Address>,
    pub self_signed: bool,
}

/// Run the full verification pipeline, failing fast on the first violated step.
#[allow(clippy::too_many_arguments)]
pub fn verify_approval(
    registry: &RoleRegistry,
    oracle: &dyn BlockOracle,
    domain: &Domain,
    request: &RequestKind,
    action: Action,
    approval: &Approval,
    config: &EngineConfig,
) -> Result<VerifiedApproval> {
    // Step 1: base-block freshness.
    check_base_block_fresh(oracle, approval.base_block_hash, config.look_back_length)?;

    // Step 2: size bound.
    if approval.signatures.len() > config.max_num_signers {
        return Err(ChartError::TooManySigners);
    }

    // Step 3: request hash.
    let target = signing_digest(domain, request, approval.base_block_hash);

    // Step 4: signature recovery, strictly ascending.
    let mut signers = Vec::with_capacity(approval.signatures.len());
    let mut last_signer: Option<Address> = None;
    for sig in &approval.signatures {
        let signer = recover_signer(target, sig)?;
        if let Some(last) = last_signer {
            if signer <= last {
                return Err(ChartError::UnorderedSigners);
            }
        }
        last_signer = Some(signer);
        signers.push(signer);
    }

    // Step 5: self-sign detection.
    let nominee = request.nominee();
    let self_signed = match nominee {
        Some(nominee) => signers.iter().any(|s| *s == nominee),
        None => false,
    };

    // Step 6: rule-hash lookup.
    let hash = rule_hash(action, approval.self_sign_required, &approval.atoms);
    let registered = registry.rule_active_flags(hash);
    if request.is_admin() {
        if registered != ADMIN_RULE_SENTINEL {
            return Err(ChartError::InvalidAdminRule);
        }
    } else if let RequestKind::UserManagement { role_id, .. } = request {
        let role_flag = registry.lookup_flag(*role_id)?;
        if registered & role_flag != role_flag {
            return Err(ChartError::InvalidRule);
        }
    }

    // Step 7: self-sign consistency.
    if approval.self_sign_required != self_signed {
        return if approval.self_sign_required {
            Err(ChartError::MissingSelfSign)
        } else {
            Err(ChartError::UnexpectedSelfSign)
        };
    }
    if approval.self_sign_required && !matches!(action, Action::Grant) {
        warn!(?action, "rule requires self-sign on a non-grant action");
    }

    debug!(?action, signer_count = signers.len(), "approval verified");
    Ok(VerifiedApproval {
        rule_hash: hash,
        signers,
        self_signed,
    })
}

/// The final 32-byte digest a signer must sign for `request` under `domain`
/// The request hash wrapped first in the `"\x19\x01"` EIP-712
/// prefix with the domain separator, then in the Ethereum personal-message
/// prefix. Off-chain provers call this directly to produce signatures for
/// an [`Approval`]; [`verify_approval`] recomputes the same value to check
/// them.
pub fn signing_digest(domain: &Domain, request: &RequestKind, base_block_hash: B256) -> B256 {
    let inner = request.inner_hash(base_block_hash);
    let wrapped = keccak256(&[b"\x19\x01".as_slice(), domain.separator().as_slice(), inner.as_slice()].concat());
    eth_signed_message_hash(wrapped)
}

fn check_base_block_fresh(oracle: &dyn BlockOracle, base_block_hash: B256, look_back_length: u64) -> Result<()> {
    let current = oracle.current_height();
    let floor = current.saturating_sub(look_back_length);
    let mut height = floor;
    while height < current {
        if oracle.block_hash(height) == Some(base_block_hash) {
            return Ok(());
        }
        height += 1;
    }
    Err(ChartError::StaleBaseBlock)
}
