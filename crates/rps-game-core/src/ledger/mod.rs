//! Escrow ledger abstraction.
//!
//! Re-exports from rps-ledger so callers only need this crate.

pub use rps_ledger::{AccountId, HoldId, InMemoryLedger, Ledger, LedgerError, PayoutHold};
