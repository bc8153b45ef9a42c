//! RPS Ledger Library
//!
//! Shared value-custody primitives for the arbiter:
//! - Account identities (AccountId)
//! - The Ledger trait with two-phase payouts, and InMemoryLedger

pub mod account;
pub mod ledger;

pub use account::AccountId;
pub use ledger::{HoldId, InMemoryLedger, Ledger, LedgerError, PayoutHold};
