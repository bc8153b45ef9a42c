//! Commitment and Salt for the commit-reveal scheme.

use crate::games::Move;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Secret salt a player mixes into their commitment
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Salt(#[serde(with = "super::hex_bytes")] [u8; 32]);

impl Salt {
    /// Create a new random salt
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt({})", hex::encode(&self.0[..8]))
    }
}

/// Commitment = SHA256(move_code || salt)
///
/// The all-zero value is the empty commitment and is never accepted by the
/// arbiter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Commitment(#[serde(with = "super::hex_bytes")] [u8; 32]);

impl Commitment {
    /// Hash arbitrary action bytes together with a salt
    pub fn new(action_bytes: &[u8], salt: &Salt) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(action_bytes);
        hasher.update(salt.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Commitment to a move, as a client computes it before playing
    pub fn for_move(mv: Move, salt: &Salt) -> Self {
        Self::new(&mv.to_bytes(), salt)
    }

    /// The empty commitment
    pub fn empty() -> Self {
        Self([0u8; 32])
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Recompute the hash of `(mv, salt)` and compare byte-for-byte
    pub fn verify(&self, mv: Move, salt: &Salt) -> bool {
        *self == Self::for_move(mv, salt)
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
