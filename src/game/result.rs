//! Results of a game and of a match.

use serde::{Deserialize, Serialize};

use crate::core::Seat;

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(Seat),
    /// Draw (no winner).
    Draw,
}

impl GameResult {
    /// Check if a seat won.
    #[must_use]
    pub fn is_winner(&self, seat: Seat) -> bool {
        matches!(self, GameResult::Winner(s) if *s == seat)
    }
}

/// Result of a completed match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    /// One seat reached the win threshold first.
    Winner(Seat),
    /// No winner.
    Draw,
}

impl MatchResult {
    /// Check if a seat won.
    #[must_use]
    pub fn is_winner(&self, seat: Seat) -> bool {
        matches!(self, MatchResult::Winner(s) if *s == seat)
    }
}

/// How a match left the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEnd {
    /// Played out to the win threshold.
    Completed(MatchResult),
    /// `by` gave up; the opponent wins.
    Forfeited { by: Seat },
    /// Both players voted to draw in the same round.
    AgreedDraw,
}

impl MatchEnd {
    /// The final result regardless of how the match ended.
    #[must_use]
    pub fn result(&self) -> MatchResult {
        match *self {
            MatchEnd::Completed(result) => result,
            MatchEnd::Forfeited { by } => MatchResult::Winner(by.opponent()),
            MatchEnd::AgreedDraw => MatchResult::Draw,
        }
    }
}
