//! Error types for the primitives crate

use thiserror::Error;

/// Errors raised by the low-level cryptographic and encoding primitives
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrimitivesError {
    /// An ECDSA signature did not deserialize to the expected `r || s || v` layout
    #[error("malformed ECDSA signature: {0}")]
    MalformedSignature(String),

    /// The recovery id byte (`v`) was outside `{0, 1, 27, 28}`
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// `k256` could not recover a public key from the given signature and prehash
    #[error("signature recovery failed")]
    RecoveryFailed,
}

/// Result type for primitives operations
pub type Result<T> = std::result::Result<T, PrimitivesError>;
