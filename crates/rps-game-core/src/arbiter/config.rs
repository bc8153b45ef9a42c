//! Arbiter configuration.

use serde::{Deserialize, Serialize};

/// One day
pub const DEFAULT_REVEAL_TIMEOUT_SECS: u64 = 24 * 60 * 60;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbiterConfig {
    /// Time from the second commitment until reveals close
    pub reveal_timeout_secs: u64,
}

impl ArbiterConfig {
    pub fn with_reveal_timeout(reveal_timeout_secs: u64) -> Self {
        Self {
            reveal_timeout_secs,
        }
    }
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            reveal_timeout_secs: DEFAULT_REVEAL_TIMEOUT_SECS,
        }
    }
}
