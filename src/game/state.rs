//! An ongoing best-of-N match.
//!
//! `MatchState` owns both players, the round and game counters, and the
//! match's own RNG stream. `resolve_round` runs the combat engine and then
//! folds a finished game into the match score:
//!
//! - winner's `wins` goes up (nothing on a draw) and a score line is added
//! - the match ends when one seat reaches the threshold while the other
//!   has not; both reaching it together is a drawn match
//! - otherwise both players are reset, `game_number` advances and `round`
//!   goes back to 1

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::result::{GameResult, MatchResult};
use super::view::{MatchView, PlayerView};
use crate::combat::{resolve_round, CombatError, RoundEvent};
use crate::core::{Action, GameRng, MatchConfig, ParticipantId, Player, RandomSource, Seat, SeatMap};

/// Handle owned by the display layer (thread, channel or message ID).
///
/// Carried through for correlation only.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalHandle(pub String);

impl ExternalHandle {
    /// Wrap a display-layer identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Everything a resolved round reports back to the display layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundReport {
    /// Round number that was resolved.
    pub round: u32,
    /// Game the round belonged to.
    pub game_number: u32,
    /// The actions both seats revealed.
    pub actions: SeatMap<Action>,
    /// Narration events, verdict and score lines included.
    pub events: Vec<RoundEvent>,
    /// Set when the round ended a game.
    pub game_result: Option<GameResult>,
    /// Set when the game ended the match.
    pub match_result: Option<MatchResult>,
    /// Public state after the round.
    pub state: MatchView,
}

impl RoundReport {
    /// Check if the round finished a game.
    #[must_use]
    pub fn game_ended(&self) -> bool {
        self.game_result.is_some()
    }

    /// Check if the round finished the match.
    #[must_use]
    pub fn match_ended(&self) -> bool {
        self.match_result.is_some()
    }

    /// Markdown narration mentioning each participant.
    #[must_use]
    pub fn narration(&self) -> String {
        crate::combat::narration::render_events(&self.events, |seat| {
            self.state.players[seat].participant.to_string()
        })
    }
}

/// Two players in a best-of-N match.
#[derive(Clone, Debug)]
pub struct MatchState {
    /// Challenger and challengee.
    pub players: SeatMap<Player>,
    /// Round within the current game (starts at 1).
    pub round: u32,
    /// Game within the match (starts at 1).
    pub game_number: u32,
    /// Display-layer thread for this match.
    pub thread: Option<ExternalHandle>,
    /// Display-layer message showing the last round.
    pub last_round_message: Option<ExternalHandle>,
    config: MatchConfig,
    rng: GameRng,
}

impl MatchState {
    /// Start a match at round 1 of game 1.
    #[must_use]
    pub fn new(challenger: ParticipantId, challengee: ParticipantId, config: MatchConfig, rng: GameRng) -> Self {
        Self {
            players: SeatMap::from_pair(Player::new(challenger, &config), Player::new(challengee, &config)),
            round: 1,
            game_number: 1,
            thread: None,
            last_round_message: None,
            config,
            rng,
        }
    }

    /// Match rules.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Seat of a participant, if they play in this match.
    #[must_use]
    pub fn seat_of(&self, participant: ParticipantId) -> Option<Seat> {
        self.players
            .iter()
            .find(|(_, p)| p.participant == participant)
            .map(|(seat, _)| seat)
    }

    /// Player record of a participant.
    #[must_use]
    pub fn player(&self, participant: ParticipantId) -> Option<&Player> {
        self.seat_of(participant).map(|seat| &self.players[seat])
    }

    /// Whether both seats have an action in.
    #[must_use]
    pub fn both_committed(&self) -> bool {
        self.players.iter().all(|(_, p)| p.has_committed())
    }

    /// Pick a uniformly random action for `seat` from the match RNG.
    ///
    /// Returns the action, or `None` if the seat had already committed.
    pub fn choose_random_action(&mut self, seat: Seat) -> Option<Action> {
        let action = Action::ALL[self.rng.pick_index(Action::ALL.len())];
        self.players[seat].set_action(action).then_some(action)
    }

    /// Resolve the committed round and update the match score.
    pub fn resolve_round(&mut self) -> Result<RoundReport, CombatError> {
        let round = self.round;
        let game_number = self.game_number;

        let resolution = resolve_round(&mut self.players, &self.config, &mut self.rng)?;
        let game_result = resolution.game_result();
        let mut events = resolution.events;
        let match_result = match game_result {
            Some(result) => self.record_game(result, &mut events),
            None => {
                self.round += 1;
                None
            }
        };

        debug!(round, game_number, ?game_result, ?match_result, "round complete");

        Ok(RoundReport {
            round,
            game_number,
            actions: resolution.actions,
            events,
            game_result,
            match_result,
            state: self.view(),
        })
    }

    /// Fold a finished game into the match.
    fn record_game(&mut self, result: GameResult, events: &mut Vec<RoundEvent>) -> Option<MatchResult> {
        if let GameResult::Winner(seat) = result {
            self.players[seat].wins += 1;
        }

        let challenger_wins = self.players[Seat::Challenger].wins;
        let challengee_wins = self.players[Seat::Challengee].wins;
        events.push(RoundEvent::Score {
            challenger_wins,
            challengee_wins,
        });

        let threshold = self.config.win_threshold;
        let match_result = match (challenger_wins >= threshold, challengee_wins >= threshold) {
            (true, true) => Some(MatchResult::Draw),
            (true, false) => Some(MatchResult::Winner(Seat::Challenger)),
            (false, true) => Some(MatchResult::Winner(Seat::Challengee)),
            (false, false) => None,
        };

        match match_result {
            Some(MatchResult::Winner(seat)) => {
                info!(%seat, challenger_wins, challengee_wins, "match won");
                events.push(RoundEvent::MatchVictory { seat });
            }
            Some(MatchResult::Draw) => {
                info!(challenger_wins, challengee_wins, "match drawn");
                events.push(RoundEvent::MatchDrawn);
            }
            None => self.start_next_game(),
        }

        match_result
    }

    fn start_next_game(&mut self) {
        for (_, player) in self.players.iter_mut() {
            player.reset_for_new_game(&self.config);
        }
        self.game_number += 1;
        self.round = 1;
    }

    /// Public snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> MatchView {
        MatchView {
            players: self.players.map(|_, p| PlayerView::from(p)),
            round: self.round,
            game_number: self.game_number,
            win_threshold: self.config.win_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_match(wins: u32) -> MatchState {
        MatchState::new(
            ParticipantId::new(1),
            ParticipantId::new(2),
            MatchConfig::default().with_win_threshold(wins),
            GameRng::new(42),
        )
    }

    fn play(state: &mut MatchState, challenger: Action, challengee: Action) -> RoundReport {
        assert!(state.players[Seat::Challenger].set_action(challenger));
        assert!(state.players[Seat::Challengee].set_action(challengee));
        state.resolve_round().unwrap()
    }

    /// Challenger wins a game in three unanswered attacks.
    fn win_game(state: &mut MatchState) -> RoundReport {
        play(state, Action::Attack, Action::Boost);
        play(state, Action::Attack, Action::Boost);
        play(state, Action::Attack, Action::Boost)
    }

    #[test]
    fn test_new_match() {
        let state = new_match(3);
        assert_eq!(state.round, 1);
        assert_eq!(state.game_number, 1);
        assert_eq!(state.seat_of(ParticipantId::new(2)), Some(Seat::Challengee));
        assert!(state.player(ParticipantId::new(3)).is_none());
        assert!(!state.both_committed());
    }

    #[test]
    fn test_round_advances() {
        let mut state = new_match(3);
        let report = play(&mut state, Action::Guard, Action::Guard);

        assert_eq!(report.round, 1);
        assert!(!report.game_ended());
        assert_eq!(state.round, 2);
        assert_eq!(report.state.round, 2);
    }

    #[test]
    fn test_game_win_resets_players() {
        let mut state = new_match(3);
        let report = win_game(&mut state);

        assert_eq!(report.game_result, Some(GameResult::Winner(Seat::Challenger)));
        assert!(!report.match_ended());
        assert_eq!(state.game_number, 2);
        assert_eq!(state.round, 1);
        assert_eq!(state.players[Seat::Challenger].wins, 1);
        assert_eq!(state.players[Seat::Challengee].hp, 3);
        assert_eq!(state.players[Seat::Challengee].boost, 0);
        assert!(report.events.contains(&RoundEvent::Score {
            challenger_wins: 1,
            challengee_wins: 0
        }));
    }

    #[test]
    fn test_match_ends_at_threshold() {
        let mut state = new_match(2);
        win_game(&mut state);
        let report = win_game(&mut state);

        assert_eq!(report.match_result, Some(MatchResult::Winner(Seat::Challenger)));
        assert_eq!(report.events.last(), Some(&RoundEvent::MatchVictory { seat: Seat::Challenger }));
        // final game is not reset
        assert_eq!(state.game_number, 2);
        assert_eq!(state.players[Seat::Challengee].hp, 0);
    }

    #[test]
    fn test_draw_game_counts_no_wins() {
        let mut state = new_match(3);
        let mut events = Vec::new();
        let result = state.record_game(GameResult::Draw, &mut events);

        assert_eq!(result, None);
        assert_eq!(state.players[Seat::Challenger].wins, 0);
        assert_eq!(state.players[Seat::Challengee].wins, 0);
        assert_eq!(state.game_number, 2);
    }

    #[test]
    fn test_simultaneous_threshold_is_drawn_match() {
        let mut state = new_match(1);
        state.players[Seat::Challengee].wins = 1;
        let mut events = Vec::new();
        let result = state.record_game(GameResult::Winner(Seat::Challenger), &mut events);

        assert_eq!(result, Some(MatchResult::Draw));
        assert_eq!(events.last(), Some(&RoundEvent::MatchDrawn));
    }

    #[test]
    fn test_choose_random_action() {
        let mut state = new_match(3);
        let action = state.choose_random_action(Seat::Challengee).unwrap();
        assert!(action.is_chosen());
        assert_eq!(state.players[Seat::Challengee].action(), action);
        assert_eq!(state.choose_random_action(Seat::Challengee), None);
    }

    #[test]
    fn test_narration_mentions_participants() {
        let mut state = new_match(3);
        let report = play(&mut state, Action::Attack, Action::Boost);
        let text = report.narration();
        assert!(text.contains("<@1>"));
        assert!(text.contains("<@2>"));
    }
}
