//! Protocol types and event records.

mod events;
mod types;

pub use events::{ArbiterEvent, EventRecord};
pub use types::{GameId, GameState, Resolution, Seat, Timestamp};
