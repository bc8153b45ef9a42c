//! The per-game record held by the registry.

use crate::crypto::Commitment;
use crate::games::Move;
use crate::ledger::AccountId;
use crate::protocol::{GameId, GameState, Resolution, Seat, Timestamp};
use serde::{Deserialize, Serialize};

/// Amounts escrowed by each player
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetAmounts {
    pub bet1: u64,
    pub bet2: u64,
}

impl BetAmounts {
    pub fn total(&self) -> u64 {
        self.bet1 + self.bet2
    }
}

/// One game instance. Only the arbiter mutates it; everyone else reads it
/// through the accessors below.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Game {
    id: GameId,
    player1: AccountId,
    player2: AccountId,
    commitment1: Commitment,
    commitment2: Option<Commitment>,
    bet1: u64,
    bet2: u64,
    move1: Move,
    move2: Move,
    reveal_deadline: Option<Timestamp>,
    state: GameState,
    created_at: Timestamp,
    resolution: Option<Resolution>,
}

impl Game {
    pub(crate) fn new(
        id: GameId,
        player1: AccountId,
        player2: AccountId,
        commitment1: Commitment,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            player1,
            player2,
            commitment1,
            commitment2: None,
            bet1: 0,
            bet2: 0,
            move1: Move::None,
            move2: Move::None,
            reveal_deadline: None,
            state: GameState::AwaitingOpponent,
            created_at,
            resolution: None,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn player(&self, seat: Seat) -> AccountId {
        match seat {
            Seat::Player1 => self.player1,
            Seat::Player2 => self.player2,
        }
    }

    /// Seat occupied by `account`, if it plays in this game
    pub fn seat_of(&self, account: &AccountId) -> Option<Seat> {
        if *account == self.player1 {
            Some(Seat::Player1)
        } else if *account == self.player2 {
            Some(Seat::Player2)
        } else {
            None
        }
    }

    pub fn commitment(&self, seat: Seat) -> Option<Commitment> {
        match seat {
            Seat::Player1 => Some(self.commitment1),
            Seat::Player2 => self.commitment2,
        }
    }

    pub fn bet(&self, seat: Seat) -> u64 {
        match seat {
            Seat::Player1 => self.bet1,
            Seat::Player2 => self.bet2,
        }
    }

    pub fn bet_amounts(&self) -> BetAmounts {
        BetAmounts {
            bet1: self.bet1,
            bet2: self.bet2,
        }
    }

    /// Combined escrowed value of both players
    pub fn pool(&self) -> u64 {
        self.bet_amounts().total()
    }

    /// Revealed move, `Move::None` until the reveal happens
    pub fn revealed_move(&self, seat: Seat) -> Move {
        match seat {
            Seat::Player1 => self.move1,
            Seat::Player2 => self.move2,
        }
    }

    pub fn has_revealed(&self, seat: Seat) -> bool {
        self.revealed_move(seat).is_playable()
    }

    pub fn both_revealed(&self) -> bool {
        self.has_revealed(Seat::Player1) && self.has_revealed(Seat::Player2)
    }

    pub fn reveal_deadline(&self) -> Option<Timestamp> {
        self.reveal_deadline
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    pub(crate) fn accept_opponent(&mut self, commitment2: Commitment, reveal_deadline: Timestamp) {
        debug_assert_eq!(self.state, GameState::AwaitingOpponent);
        self.commitment2 = Some(commitment2);
        self.reveal_deadline = Some(reveal_deadline);
        self.state = GameState::AwaitingReveal;
    }

    pub(crate) fn place_bet(&mut self, seat: Seat, amount: u64) {
        let slot = match seat {
            Seat::Player1 => &mut self.bet1,
            Seat::Player2 => &mut self.bet2,
        };
        debug_assert_eq!(*slot, 0);
        *slot = amount;
    }

    pub(crate) fn record_move(&mut self, seat: Seat, play: Move) {
        let slot = match seat {
            Seat::Player1 => &mut self.move1,
            Seat::Player2 => &mut self.move2,
        };
        debug_assert_eq!(*slot, Move::None);
        *slot = play;
    }

    pub(crate) fn settle(&mut self, resolution: Resolution) {
        debug_assert_eq!(self.state, GameState::AwaitingReveal);
        self.resolution = Some(resolution);
        self.state = GameState::Settled;
    }
}
