//! Audit log records.

use crate::crypto::Commitment;
use crate::games::{Move, Outcome};
use crate::ledger::AccountId;
use crate::protocol::{GameId, Timestamp};
use serde::{Deserialize, Serialize};

/// Observable side effect of a state transition.
///
/// Each transition records its events exactly once, and only if the whole
/// operation succeeds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArbiterEvent {
    GameCreated {
        game_id: GameId,
        player1: AccountId,
        player2: AccountId,
    },
    MoveCommitted {
        game_id: GameId,
        player: AccountId,
        commitment: Commitment,
    },
    BetReceived {
        game_id: GameId,
        player: AccountId,
        amount: u64,
    },
    MoveRevealed {
        game_id: GameId,
        player: AccountId,
        #[serde(rename = "move")]
        play: Move,
    },
    WinnerDetermined {
        game_id: GameId,
        outcome: Outcome,
        /// `None` on a tie
        winner: Option<AccountId>,
    },
    GameAborted {
        game_id: GameId,
        aborted_by: AccountId,
    },
    /// Pool paid to the winner
    FundsDistributed {
        game_id: GameId,
        to: AccountId,
        amount: u64,
    },
    /// A player's own bet paid back on a tie or abort
    FundsReturned {
        game_id: GameId,
        to: AccountId,
        amount: u64,
    },
}

impl ArbiterEvent {
    pub fn game_id(&self) -> GameId {
        match self {
            ArbiterEvent::GameCreated { game_id, .. }
            | ArbiterEvent::MoveCommitted { game_id, .. }
            | ArbiterEvent::BetReceived { game_id, .. }
            | ArbiterEvent::MoveRevealed { game_id, .. }
            | ArbiterEvent::WinnerDetermined { game_id, .. }
            | ArbiterEvent::GameAborted { game_id, .. }
            | ArbiterEvent::FundsDistributed { game_id, .. }
            | ArbiterEvent::FundsReturned { game_id, .. } => *game_id,
        }
    }
}

/// An event with its position in the global log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub seq: u64,
    pub recorded_at: Timestamp,
    #[serde(flatten)]
    pub event: ArbiterEvent,
}
