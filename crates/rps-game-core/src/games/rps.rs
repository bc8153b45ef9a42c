//! Rock-Paper-Scissors moves and the resolution rule.

use crate::protocol::Seat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A revealed play.
///
/// `None` marks a move that has not been revealed yet and is never a legal
/// play.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    #[default]
    None,
    Rock,
    Paper,
    Scissors,
}

impl Move {
    /// Numeric move code hashed into commitments
    pub fn code(&self) -> u8 {
        match self {
            Move::None => 0,
            Move::Rock => 1,
            Move::Paper => 2,
            Move::Scissors => 3,
        }
    }

    /// Parse a numeric move code; codes above 3 are invalid
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Move::None),
            1 => Some(Move::Rock),
            2 => Some(Move::Paper),
            3 => Some(Move::Scissors),
            _ => None,
        }
    }

    /// Convert to bytes for commitment
    pub fn to_bytes(&self) -> [u8; 1] {
        [self.code()]
    }

    pub fn is_playable(&self) -> bool {
        *self != Move::None
    }

    /// Check if this move beats the other
    pub fn beats(&self, other: &Move) -> bool {
        matches!(
            (self, other),
            (Move::Rock, Move::Scissors) | (Move::Scissors, Move::Paper) | (Move::Paper, Move::Rock)
        )
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Result of judging two revealed moves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Player1Wins,
    Player2Wins,
    Tie,
}

impl Outcome {
    /// Seat that takes the pool, if any
    pub fn winner(&self) -> Option<Seat> {
        match self {
            Outcome::Player1Wins => Some(Seat::Player1),
            Outcome::Player2Wins => Some(Seat::Player2),
            Outcome::Tie => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Player1Wins => "player 1 wins",
            Outcome::Player2Wins => "player 2 wins",
            Outcome::Tie => "tie",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolve two playable moves: equal moves tie, otherwise the move that
/// beats the other wins.
pub fn judge(move1: Move, move2: Move) -> Outcome {
    debug_assert!(move1.is_playable() && move2.is_playable());

    if move1 == move2 {
        Outcome::Tie
    } else if move1.beats(&move2) {
        Outcome::Player1Wins
    } else {
        Outcome::Player2Wins
    }
}
