//! Ledger trait definition.

use crate::account::AccountId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from ledger operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Insufficient funds in {account}: needed {needed}, available {available}")]
    InsufficientFunds {
        account: AccountId,
        needed: u64,
        available: u64,
    },

    #[error("Insufficient escrow: needed {needed}, available {available}")]
    InsufficientEscrow { needed: u64, available: u64 },

    #[error("Destination {0} rejected the transfer")]
    DestinationRejected(AccountId),

    #[error("Balance overflow")]
    Overflow,
}

/// Identifier of an outstanding payout hold
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HoldId(pub u64);

/// Escrowed value reserved for a single destination.
///
/// A hold is consumed by exactly one of `release_payout` or `cancel_payout`.
#[derive(Debug, PartialEq, Eq)]
pub struct PayoutHold {
    pub id: HoldId,
    pub to: AccountId,
    pub amount: u64,
}

/// Trait for the value-custody backend the arbiter pays through.
///
/// Payouts are two-phase: `hold_payout` is the only fallible step and
/// reserves escrowed value once the destination has agreed to accept it.
/// A held payout always completes on `release_payout`, so a caller that
/// obtains every hold it needs can finish a multi-party settlement without
/// any partial failure.
pub trait Ledger {
    /// Move value from an account into escrow
    fn deposit(&mut self, from: &AccountId, amount: u64) -> Result<(), LedgerError>;

    /// Reserve escrowed value for a payout to `to`
    fn hold_payout(&mut self, to: &AccountId, amount: u64) -> Result<PayoutHold, LedgerError>;

    /// Credit a held payout to its destination
    fn release_payout(&mut self, hold: PayoutHold);

    /// Return a held payout to escrow
    fn cancel_payout(&mut self, hold: PayoutHold);

    /// Spendable balance of an account (zero for unknown accounts)
    fn balance(&self, account: &AccountId) -> u64;

    /// Value currently in escrow, including held payouts
    fn escrow_balance(&self) -> u64;
}
