//! Core duel types: actions, participants and seats, RNG, configuration.
//!
//! Everything here is free of combat rules; the `combat` module gives
//! these types meaning.

pub mod action;
pub mod player;
pub mod rng;
pub mod config;

pub use action::{Action, ParseActionError};
pub use player::{ParticipantId, Player, Seat, SeatMap};
pub use rng::{GameRng, GameRngState, RandomSource};
pub use config::{MatchConfig, SessionConfig};
