//! Public, render-ready snapshots of a match.
//!
//! Views contain everything the display layer shows (HP, boost, priority,
//! shield status, score) and nothing it may not see: committed actions are
//! reduced to a "has committed" flag.

use serde::{Deserialize, Serialize};

use crate::core::{ParticipantId, Player, SeatMap};

/// Public state of one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub participant: ParticipantId,
    pub hp: u32,
    pub boost: u32,
    pub priority: u32,
    pub shield_break_counter: u32,
    pub wins: u32,
    /// An action is in for this round (which one stays hidden).
    pub committed: bool,
    pub voted_to_draw: bool,
}

impl PlayerView {
    /// Next round's shield-mend odds as "1 in N", if the shield is broken.
    #[must_use]
    pub fn mend_odds(&self) -> Option<u32> {
        (self.shield_break_counter > 0).then(|| self.shield_break_counter + 1)
    }
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            participant: player.participant,
            hp: player.hp,
            boost: player.boost,
            priority: player.priority,
            shield_break_counter: player.shield_break_counter,
            wins: player.wins,
            committed: player.has_committed(),
            voted_to_draw: player.voted_to_draw(),
        }
    }
}

/// Public state of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchView {
    pub players: SeatMap<PlayerView>,
    /// Round about to be played.
    pub round: u32,
    /// Game in progress (starts at 1).
    pub game_number: u32,
    pub win_threshold: u32,
}
