//! Games and matches.
//!
//! A game is a run of rounds until someone's HP hits zero. A match is a
//! best-of-N run of games. `MatchState` ties the combat engine to the
//! match score and produces a `RoundReport` per resolved round.

pub mod result;
pub mod state;
pub mod view;

pub use result::{GameResult, MatchEnd, MatchResult};
pub use state::{ExternalHandle, MatchState, RoundReport};
pub use view::{MatchView, PlayerView};
