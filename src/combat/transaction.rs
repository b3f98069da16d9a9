//! Scoped round transaction.
//!
//! Opening a `RoundTransaction` locks both players' committed actions.
//! Dropping it, on every path, unlocks and clears them so the next round
//! starts with nothing committed.

use std::ops::{Deref, DerefMut};

use crate::core::{Player, SeatMap};

/// Exclusive access to both players for the span of one round.
pub struct RoundTransaction<'a> {
    players: &'a mut SeatMap<Player>,
}

impl<'a> RoundTransaction<'a> {
    /// Lock both players' actions and open the round.
    pub fn begin(players: &'a mut SeatMap<Player>) -> Self {
        for (_, player) in players.iter_mut() {
            player.lock_action();
        }
        Self { players }
    }
}

impl Deref for RoundTransaction<'_> {
    type Target = SeatMap<Player>;

    fn deref(&self) -> &Self::Target {
        self.players
    }
}

impl DerefMut for RoundTransaction<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.players
    }
}

impl Drop for RoundTransaction<'_> {
    fn drop(&mut self) {
        for (_, player) in self.players.iter_mut() {
            player.finish_round();
        }
    }
}
