//! Participants, seats and per-player combat state.
//!
//! ## ParticipantId
//!
//! Opaque external user reference. The engine only compares it.
//!
//! ## Seat / SeatMap
//!
//! A duel always has exactly two seats: the challenger and the challengee.
//! `SeatMap` stores one value per seat with O(1) access by `Seat`.
//!
//! ## Player
//!
//! Combat stats plus the action committed for the current round.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::action::Action;
use super::config::MatchConfig;

/// Opaque, comparable identity of an external participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub u64);

impl ParticipantId {
    /// Create a new participant ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Renders as a Markdown user mention.
impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<@{}>", self.0)
    }
}

/// One of the two sides of a duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    /// The participant who issued the challenge.
    Challenger,
    /// The participant who was challenged.
    Challengee,
}

impl Seat {
    /// Both seats, challenger first.
    pub const BOTH: [Seat; 2] = [Seat::Challenger, Seat::Challengee];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Seat::Challenger => Seat::Challengee,
            Seat::Challengee => Seat::Challenger,
        }
    }

    /// Storage index (challenger = 0).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Seat::Challenger => 0,
            Seat::Challengee => 1,
        }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seat::Challenger => f.write_str("Challenger"),
            Seat::Challengee => f.write_str("Challengee"),
        }
    }
}

/// Per-seat data storage.
///
/// ## Example
///
/// ```
/// use bagh::core::{Seat, SeatMap};
///
/// let mut hp = SeatMap::with_value(3);
/// hp[Seat::Challengee] = 1;
///
/// assert_eq!(hp[Seat::Challenger], 3);
/// assert_eq!(hp[Seat::Challengee], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: [T; 2],
}

impl<T> SeatMap<T> {
    /// Create a SeatMap with values from a factory function.
    pub fn new(mut factory: impl FnMut(Seat) -> T) -> Self {
        Self {
            data: [factory(Seat::Challenger), factory(Seat::Challengee)],
        }
    }

    /// Create a SeatMap from explicit challenger and challengee values.
    pub fn from_pair(challenger: T, challengee: T) -> Self {
        Self {
            data: [challenger, challengee],
        }
    }

    /// Create a SeatMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::from_pair(value.clone(), value)
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, seat: Seat) -> &T {
        &self.data[seat.index()]
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, seat: Seat) -> &mut T {
        &mut self.data[seat.index()]
    }

    /// Mutable references to both seats at once: `(seat, opponent)`.
    pub fn pair_mut(&mut self, seat: Seat) -> (&mut T, &mut T) {
        let [challenger, challengee] = &mut self.data;
        match seat {
            Seat::Challenger => (challenger, challengee),
            Seat::Challengee => (challengee, challenger),
        }
    }

    /// Iterate over (Seat, &T) pairs, challenger first.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        Seat::BOTH.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Seat, &mut T) pairs, challenger first.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Seat, &mut T)> {
        Seat::BOTH.into_iter().zip(self.data.iter_mut())
    }

    /// Transform every entry, keeping seat positions.
    pub fn map<U>(&self, mut f: impl FnMut(Seat, &T) -> U) -> SeatMap<U> {
        SeatMap::new(|seat| f(seat, self.get(seat)))
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        self.get(seat)
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        self.get_mut(seat)
    }
}

/// Combat state and pending action of one participant.
///
/// Stats are only changed by the resolution engine and the match
/// aggregator. From outside, the only entry points are
/// [`set_action`](Player::set_action), [`clear_action`](Player::clear_action),
/// [`lock_action`](Player::lock_action) and
/// [`unlock_action`](Player::unlock_action).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Who this is. Never interpreted.
    pub participant: ParticipantId,

    /// Current health. Never negative; may exceed the base maximum while boosted.
    pub hp: u32,

    /// Boost stacks, 0..=max_boost.
    pub boost: u32,

    /// Initiative counter that beats simultaneous counters and heals.
    pub priority: u32,

    /// While positive, Guard does not block damage.
    pub shield_break_counter: u32,

    /// Games won in the current match.
    pub wins: u32,

    current_action: Action,
    action_locked: bool,
    voted_to_draw: bool,
}

impl Player {
    /// Create a player at full health with no pending action.
    #[must_use]
    pub fn new(participant: ParticipantId, config: &MatchConfig) -> Self {
        Self {
            participant,
            hp: config.base_max_health,
            boost: 0,
            priority: 0,
            shield_break_counter: 0,
            wins: 0,
            current_action: Action::Unchosen,
            action_locked: false,
            voted_to_draw: false,
        }
    }

    /// The action committed this round, or `Unchosen`.
    #[must_use]
    pub fn action(&self) -> Action {
        self.current_action
    }

    /// Whether an action is committed for this round.
    #[must_use]
    pub fn has_committed(&self) -> bool {
        self.current_action.is_chosen()
    }

    /// Whether the committed action can no longer be undone.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.action_locked
    }

    /// Whether this player has asked to end the match as a draw.
    #[must_use]
    pub fn voted_to_draw(&self) -> bool {
        self.voted_to_draw
    }

    /// Whether the shield is currently broken.
    #[must_use]
    pub fn shield_broken(&self) -> bool {
        self.shield_break_counter > 0
    }

    /// Commit an action for this round.
    ///
    /// Returns `false` without changing anything if an action is already
    /// committed, or if `action` is `Unchosen`.
    pub fn set_action(&mut self, action: Action) -> bool {
        if self.current_action.is_chosen() || !action.is_chosen() {
            return false;
        }
        self.current_action = action;
        true
    }

    /// Undo the committed action.
    ///
    /// Only succeeds while not locked and with an action committed.
    pub fn clear_action(&mut self) -> bool {
        if !self.action_locked && self.current_action.is_chosen() {
            self.current_action = Action::Unchosen;
            return true;
        }
        false
    }

    /// Freeze the committed action once both sides are in.
    pub fn lock_action(&mut self) {
        self.action_locked = true;
    }

    /// Release the lock for the next round.
    pub fn unlock_action(&mut self) {
        self.action_locked = false;
    }

    /// Unlock and clear, ready for the next round.
    pub(crate) fn finish_round(&mut self) {
        self.unlock_action();
        self.clear_action();
    }

    pub(crate) fn set_draw_vote(&mut self, voted: bool) {
        self.voted_to_draw = voted;
    }

    /// Back to the state at the start of a game. Wins are kept.
    pub(crate) fn reset_for_new_game(&mut self, config: &MatchConfig) {
        let wins = self.wins;
        *self = Self::new(self.participant, config);
        self.wins = wins;
    }
}
