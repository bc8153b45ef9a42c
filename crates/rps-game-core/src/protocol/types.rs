//! Protocol types.

use crate::games::Outcome;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Unix time in seconds
pub type Timestamp = u64;

/// Sequential game handle into the registry
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(u64);

impl GameId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl FromStr for GameId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl fmt::Debug for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameId({})", self.0)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side of a game a participant occupies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    Player1,
    Player2,
}

impl Seat {
    /// Get the opponent's seat
    pub fn opponent(&self) -> Seat {
        match self {
            Seat::Player1 => Seat::Player2,
            Seat::Player2 => Seat::Player1,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::Player1 => write!(f, "player 1"),
            Seat::Player2 => write!(f, "player 2"),
        }
    }
}

/// Lifecycle state of a game. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameState {
    AwaitingOpponent,
    AwaitingReveal,
    Settled,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameState::AwaitingOpponent => "awaiting opponent",
            GameState::AwaitingReveal => "awaiting reveal",
            GameState::Settled => "settled",
        };
        write!(f, "{s}")
    }
}

/// How a settled game ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Both moves revealed and judged
    Decided(Outcome),
    /// Reveal deadline lapsed and the game was aborted
    Aborted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_opponent() {
        assert_eq!(Seat::Player1.opponent(), Seat::Player2);
        assert_eq!(Seat::Player2.opponent(), Seat::Player1);
    }

    #[test]
    fn test_game_state_order_is_lifecycle_order() {
        assert!(GameState::AwaitingOpponent < GameState::AwaitingReveal);
        assert!(GameState::AwaitingReveal < GameState::Settled);
    }

    #[test]
    fn test_game_id_parse() {
        assert_eq!("42".parse::<GameId>().unwrap(), GameId::new(42));
        assert!("-1".parse::<GameId>().is_err());
        assert_eq!(serde_json::to_string(&GameId::new(7)).unwrap(), "7");
    }

    #[test]
    fn test_resolution_serialization() {
        let json = serde_json::to_string(&Resolution::Decided(Outcome::Tie)).unwrap();
        assert_eq!(json, r#"{"decided":"Tie"}"#);
        assert_eq!(serde_json::to_string(&Resolution::Aborted).unwrap(), r#""aborted""#);
    }
}
