//! In-memory ledger for tests and the demo service.

use super::traits::{HoldId, Ledger, LedgerError, PayoutHold};
use crate::account::AccountId;
use std::collections::HashMap;
use tracing::warn;

/// State of a single account
#[derive(Clone, Debug, Default)]
struct AccountState {
    balance: u64,
    /// Simulates a destination that refuses incoming value
    rejects_incoming: bool,
}

/// In-memory ledger with a single escrow pool
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    accounts: HashMap<AccountId, AccountState>,
    /// Free escrow, excluding outstanding holds
    escrow: u64,
    holds: HashMap<HoldId, (AccountId, u64)>,
    next_hold: u64,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh account with an initial balance
    pub fn open_account(&mut self, initial_balance: u64) -> AccountId {
        let id = AccountId::new();
        self.open_account_with_id(id, initial_balance);
        id
    }

    /// Open (or reset) an account under a known identity
    pub fn open_account_with_id(&mut self, id: AccountId, initial_balance: u64) {
        self.accounts.insert(
            id,
            AccountState {
                balance: initial_balance,
                rejects_incoming: false,
            },
        );
    }

    pub fn has_account(&self, id: &AccountId) -> bool {
        self.accounts.contains_key(id)
    }

    /// Make an account refuse (or accept again) incoming payouts
    pub fn set_rejects_incoming(&mut self, id: &AccountId, rejects: bool) -> Result<(), LedgerError> {
        let state = self
            .accounts
            .get_mut(id)
            .ok_or(LedgerError::AccountNotFound(*id))?;
        state.rejects_incoming = rejects;
        Ok(())
    }

    /// Number of holds not yet released or cancelled
    pub fn outstanding_holds(&self) -> usize {
        self.holds.len()
    }

    fn held_total(&self) -> u64 {
        self.holds.values().map(|(_, amount)| *amount).sum()
    }

    fn held_for(&self, id: &AccountId) -> u64 {
        self.holds
            .values()
            .filter(|(to, _)| to == id)
            .map(|(_, amount)| *amount)
            .sum()
    }
}

impl Ledger for InMemoryLedger {
    fn deposit(&mut self, from: &AccountId, amount: u64) -> Result<(), LedgerError> {
        self.escrow
            .checked_add(self.held_total())
            .and_then(|total| total.checked_add(amount))
            .ok_or(LedgerError::Overflow)?;

        let state = self
            .accounts
            .get_mut(from)
            .ok_or(LedgerError::AccountNotFound(*from))?;
        if state.balance < amount {
            return Err(LedgerError::InsufficientFunds {
                account: *from,
                needed: amount,
                available: state.balance,
            });
        }

        state.balance -= amount;
        self.escrow += amount;
        Ok(())
    }

    fn hold_payout(&mut self, to: &AccountId, amount: u64) -> Result<PayoutHold, LedgerError> {
        let held_for_destination = self.held_for(to);
        let state = self
            .accounts
            .get(to)
            .ok_or(LedgerError::AccountNotFound(*to))?;
        if state.rejects_incoming {
            return Err(LedgerError::DestinationRejected(*to));
        }
        // Release must never overflow the destination.
        state
            .balance
            .checked_add(held_for_destination)
            .and_then(|total| total.checked_add(amount))
            .ok_or(LedgerError::Overflow)?;
        if self.escrow < amount {
            return Err(LedgerError::InsufficientEscrow {
                needed: amount,
                available: self.escrow,
            });
        }

        let id = HoldId(self.next_hold);
        self.next_hold += 1;
        self.escrow -= amount;
        self.holds.insert(id, (*to, amount));

        Ok(PayoutHold {
            id,
            to: *to,
            amount,
        })
    }

    fn release_payout(&mut self, hold: PayoutHold) {
        let Some((to, amount)) = self.holds.remove(&hold.id) else {
            warn!(hold = ?hold.id, "release of unknown payout hold ignored");
            return;
        };
        match self.accounts.get_mut(&to) {
            Some(state) => state.balance = state.balance.saturating_add(amount),
            None => {
                warn!(%to, amount, "payout destination vanished, returning to escrow");
                self.escrow += amount;
            }
        }
    }

    fn cancel_payout(&mut self, hold: PayoutHold) {
        match self.holds.remove(&hold.id) {
            Some((_, amount)) => self.escrow += amount,
            None => warn!(hold = ?hold.id, "cancel of unknown payout hold ignored"),
        }
    }

    fn balance(&self, account: &AccountId) -> u64 {
        self.accounts.get(account).map_or(0, |state| state.balance)
    }

    fn escrow_balance(&self) -> u64 {
        self.escrow + self.held_total()
    }
}
