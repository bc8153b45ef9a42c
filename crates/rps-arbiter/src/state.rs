//! Application state management.

use chrono::{DateTime, Utc};
use rps_game_core::{AccountId, Arbiter, ArbiterConfig, InMemoryLedger, Timestamp};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared application state.
///
/// Every operation runs under one lock, so the arbiter sees a single
/// sequential order of calls.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Mutex<AppStateInner>>,
    starting_balance: u64,
}

struct AppStateInner {
    arbiter: Arbiter<InMemoryLedger>,
    /// Simulated current time (for deadline testing)
    current_time: Option<DateTime<Utc>>,
}

impl AppState {
    pub fn new(config: ArbiterConfig, starting_balance: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(AppStateInner {
                arbiter: Arbiter::with_config(config, InMemoryLedger::new()),
                current_time: None,
            })),
            starting_balance,
        }
    }

    fn lock(&self) -> MutexGuard<'_, AppStateInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Advance simulated time by seconds. Returns `None`, leaving the clock
    /// untouched, when the result is out of range.
    pub fn advance_time(&self, seconds: u64) -> Option<DateTime<Utc>> {
        let mut inner = self.lock();
        let current = inner.current_time.unwrap_or_else(Utc::now);
        let advanced = i64::try_from(seconds)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|delta| current.checked_add_signed(delta))?;
        inner.current_time = Some(advanced);
        Some(advanced)
    }

    /// Run `op` against the arbiter with the current time
    pub fn with_arbiter<R>(
        &self,
        op: impl FnOnce(&mut Arbiter<InMemoryLedger>, Timestamp) -> R,
    ) -> R {
        let mut inner = self.lock();
        let now = inner.current_time.unwrap_or_else(Utc::now);
        op(&mut inner.arbiter, to_timestamp(now))
    }

    /// Open a demo account funded with the starting balance
    pub fn open_account(&self) -> (AccountId, u64) {
        let balance = self.starting_balance;
        let id = self.lock().arbiter.ledger_mut().open_account(balance);
        (id, balance)
    }
}

pub fn to_timestamp(time: DateTime<Utc>) -> Timestamp {
    u64::try_from(time.timestamp()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rps_game_core::Ledger;

    #[test]
    fn test_advance_time() {
        let state = AppState::new(ArbiterConfig::default(), 100);
        let before = state.with_arbiter(|_, now| now);
        let after = state.advance_time(3600).unwrap();

        assert!(to_timestamp(after) >= before + 3600);
        state.with_arbiter(|_, now| assert_eq!(now, to_timestamp(after)));
        assert_eq!(state.advance_time(0), Some(after));
    }

    #[test]
    fn test_out_of_range_advance_leaves_clock() {
        let state = AppState::new(ArbiterConfig::default(), 100);
        let start = state.advance_time(0).unwrap();

        assert_eq!(state.advance_time(u64::MAX), None);
        assert_eq!(state.advance_time(i64::MAX as u64), None);
        assert_eq!(state.advance_time(0), Some(start));
    }

    #[test]
    fn test_open_account_is_funded() {
        let state = AppState::new(ArbiterConfig::default(), 250);
        let (id, balance) = state.open_account();

        assert_eq!(balance, 250);
        assert_eq!(state.with_arbiter(|a, _| a.ledger().balance(&id)), 250);
    }

    #[test]
    fn test_pre_epoch_clamps_to_zero() {
        let epoch = DateTime::<Utc>::from_timestamp(-5, 0).unwrap();
        assert_eq!(to_timestamp(epoch), 0);
    }
}
