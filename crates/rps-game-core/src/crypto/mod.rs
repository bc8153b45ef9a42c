//! Cryptographic primitives for the commit-reveal scheme.

mod commitment;
mod hex_bytes;

pub use commitment::{Commitment, Salt};
