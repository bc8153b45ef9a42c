//! Arbiter errors.

use crate::ledger::{AccountId, LedgerError};
use crate::protocol::{GameId, GameState, Timestamp};
use serde::Serialize;
use thiserror::Error;

/// Failure of an arbiter operation. A failed operation has no effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArbiterError {
    #[error("Game not found: {0}")]
    GameNotFound(GameId),

    #[error("Opponent must not be the null identity")]
    NullOpponent,

    #[error("Cannot start a game against yourself")]
    SelfPlay,

    #[error("Commitment must not be empty")]
    EmptyCommitment,

    #[error("Invalid move: a revealed move must be Rock, Paper or Scissors")]
    InvalidMove,

    #[error("Bet amount must be greater than zero")]
    ZeroBet,

    #[error("Bet would overflow the game pool")]
    PoolOverflow,

    #[error("{caller} is not a participant of game {game_id}")]
    NotParticipant { game_id: GameId, caller: AccountId },

    #[error("Game {game_id} is {actual}, expected {expected}")]
    StateMismatch {
        game_id: GameId,
        expected: GameState,
        actual: GameState,
    },

    #[error("{0} already placed a bet")]
    AlreadyBet(AccountId),

    #[error("{0} already revealed")]
    AlreadyRevealed(AccountId),

    #[error("Stale reveal: deadline {deadline} passed (now {now})")]
    StaleReveal { deadline: Timestamp, now: Timestamp },

    #[error("Reveal deadline {deadline} has not passed yet (now {now})")]
    DeadlineNotReached { deadline: Timestamp, now: Timestamp },

    #[error("Bad commitment: move and salt do not match the stored commitment")]
    BadCommitment,

    #[error("Fund transfer failed: {0}")]
    Transfer(#[from] LedgerError),
}

/// Error categories
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    Authorization,
    StateMismatch,
    Temporal,
    CommitmentMismatch,
    FundTransfer,
}

impl ArbiterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArbiterError::GameNotFound(_)
            | ArbiterError::NullOpponent
            | ArbiterError::SelfPlay
            | ArbiterError::EmptyCommitment
            | ArbiterError::InvalidMove
            | ArbiterError::ZeroBet
            | ArbiterError::PoolOverflow => ErrorKind::InvalidInput,
            ArbiterError::NotParticipant { .. } => ErrorKind::Authorization,
            ArbiterError::StateMismatch { .. }
            | ArbiterError::AlreadyBet(_)
            | ArbiterError::AlreadyRevealed(_) => ErrorKind::StateMismatch,
            ArbiterError::StaleReveal { .. } | ArbiterError::DeadlineNotReached { .. } => {
                ErrorKind::Temporal
            }
            ArbiterError::BadCommitment => ErrorKind::CommitmentMismatch,
            ArbiterError::Transfer(_) => ErrorKind::FundTransfer,
        }
    }
}
