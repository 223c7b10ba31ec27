//! # OrgChart Primitives
//!
//! The leaf layer of the organizational-chart access-control engine: 256-bit
//! word types, Keccak-256 hashing, fixed-width ABI word packing, and ECDSA
//! signer recovery with Ethereum message wrapping. Nothing in this crate
//! knows what a role, a rule, or a chart is — [`crates/orgchart`] builds all
//! of that on top.

pub mod abi;
pub mod ecdsa;
pub mod error;
pub mod hash;

pub use alloy_primitives::{Address, B256, U256};
pub use ecdsa::{eth_signed_message_hash, recover_signer, EcdsaSignature};
pub use error::{PrimitivesError, Result};
pub use hash::{keccak256, keccak256_concat};
