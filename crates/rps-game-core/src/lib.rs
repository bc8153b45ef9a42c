//! RPS Game Core Library
//!
//! This crate provides the game registry and arbiter for wagered two-player
//! Rock-Paper-Scissors played with a commit-reveal scheme: commitment
//! verification, reveal deadlines, winner determination and escrow
//! settlement through a [`Ledger`].

pub mod arbiter;
pub mod crypto;
pub mod error;
pub mod games;
pub mod ledger;
pub mod protocol;

pub use arbiter::{Arbiter, ArbiterConfig, BetAmounts, Game, RevealStatus};
pub use crypto::{Commitment, Salt};
pub use error::{ArbiterError, ErrorKind};
pub use games::{Move, Outcome};
pub use ledger::{AccountId, InMemoryLedger, Ledger, LedgerError};
pub use protocol::{ArbiterEvent, EventRecord, GameId, GameState, Resolution, Seat, Timestamp};
