//! ECDSA signer recovery with Ethereum message wrapping
//!
//! Recovery follows the same two steps Ethereum tooling uses everywhere a
//! signer needs to be derived from a signature rather than carried alongside
//! it: wrap the digest being signed in the `"\x19Ethereum Signed Message:\n32"`
//! prefix (so a wallet's human-readable signing dialog can't be confused with
//! a raw transaction), then recover the `secp256k1` public key and take the
//! low 20 bytes of its Keccak-256 hash as the address.

use crate::error::{PrimitivesError, Result};
use crate::hash::keccak256;
use alloy_primitives::{Address, B256};
use k256::ecdsa::{RecoveryId, Signature as K256Signature, VerifyingKey};

/// An Ethereum-style `r || s || v` signature, 65 bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcdsaSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    /// Recovery byte; accepts both the `{0,1}` and legacy `{27,28}` encodings.
    pub v: u8,
}

impl EcdsaSignature {
    /// Parse a signature from its 65-byte wire encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 65 {
            return Err(PrimitivesError::MalformedSignature(format!(
                "expected 65 bytes, got {}",
                bytes.len()
            )));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[0..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { r, s, v: bytes[64] })
    }

    fn recovery_id(&self) -> Result<RecoveryId> {
        let normalized = match self.v {
            0 | 27 => 0u8,
            1 | 28 => 1u8,
            other => return Err(PrimitivesError::InvalidRecoveryId(other)),
        };
        RecoveryId::from_byte(normalized).ok_or(PrimitivesError::InvalidRecoveryId(self.v))
    }
}

/// Wrap a 32-byte digest in the `"\x19Ethereum Signed Message:\n32"` prefix,
/// the way an `eth_sign`-compatible wallet hashes a message before signing it.
pub fn eth_signed_message_hash(digest: B256) -> B256 {
    const PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";
    keccak256(&[PREFIX, digest.as_slice()].concat())
}

/// Recover the signer address from a prehashed digest and signature.
///
/// `prehash` must already be the final 32-byte value that was signed (e.g.
/// the output of [`eth_signed_message_hash`]), not the original message.
pub fn recover_signer(prehash: B256, signature: &EcdsaSignature) -> Result<Address> {
    let recovery_id = signature.recovery_id()?;
    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);
    let sig = K256Signature::from_slice(&sig_bytes)
        .map_err(|_| PrimitivesError::MalformedSignature("invalid r/s scalars".to_string()))?;

    let verifying_key =
        VerifyingKey::recover_from_prehash(prehash.as_slice(), &sig, recovery_id)
            .map_err(|_| PrimitivesError::RecoveryFailed)?;

    Ok(address_from_verifying_key(&verifying_key))
}

fn address_from_verifying_key(key: &VerifyingKey) -> Address {
    let encoded = key.to_encoded_point(false);
    // Skip the leading 0x04 SEC1 uncompressed-point tag.
    let hash = keccak256(&encoded.as_bytes()[1..]);
    Address::from_slice(&hash.as_slice()[12..])
}
