//! Engine configuration (ADDED): the engine's constants made overridable for
//! hosts that need a different freshness window or signer/rule ceiling.

use crate::types::{LOOK_BACK_LENGTH, MAX_NUM_RULES, MAX_NUM_SIGNERS};

/// Tunable limits for one `Chart`/`StaticChart` instance. [`Default`]
/// reproduces the engine's default constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Base-block freshness window size.
    pub look_back_length: u64,
    /// Maximum signatures accepted by one approval.
    pub max_num_signers: usize,
    /// Maximum rule hashes a single role may register.
    pub max_num_rules: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            look_back_length: LOOK_BACK_LENGTH,
            max_num_signers: MAX_NUM_SIGNERS,
            max_num_rules: MAX_NUM_RULES,
        }
    }
}
