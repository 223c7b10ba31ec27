//! Fixed-width ABI word packing
//!
//! The signed-request hashes this crate supports are all built from a short,
//! statically-known list of fields, each padded to a 32-byte word the way
//! Solidity's `abi.encode` pads them. There is no dynamic-length encoding here
//! (no offsets, no length prefixes) — every caller already knows its field
//! list, so packing is just "turn each field into one word, concatenate".

use alloy_primitives::{Address, B256, U256};

/// One ABI-encoded 32-byte word.
pub type Word = [u8; 32];

/// Pack a `bytes32` field verbatim.
pub fn word_from_b256(value: B256) -> Word {
    value.0
}

/// Pack an `address` field, left-padded with zeros to 32 bytes.
pub fn word_from_address(value: Address) -> Word {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(value.as_slice());
    word
}

/// Pack a `bool` field as a 32-byte word whose low byte is 0 or 1.
pub fn word_from_bool(value: bool) -> Word {
    let mut word = [0u8; 32];
    word[31] = u8::from(value);
    word
}

/// Pack a `uint256`/`bytes32`-sized integer field.
pub fn word_from_u256(value: U256) -> Word {
    value.to_be_bytes::<32>()
}

/// Concatenate a sequence of already-packed words into one ABI buffer.
pub fn encode_words(words: &[Word]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(words.len() * 32);
    for word in words {
        buf.extend_from_slice(word);
    }
    buf
}
