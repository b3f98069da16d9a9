//! Session lifecycle.
//!
//! ```text
//!  issue_challenge ──► AwaitingChallengeResponse ──accept──► MatchOngoing ◄─┐
//!                              │                               │  │         │
//!                     refuse / rescind          forfeit / draw │  └─ round ─┘
//!                              ▼                vote / match   ▼
//!                         (removed)             complete   (removed)
//! ```
//!
//! Every operation locks the participant's session for its whole
//! check-then-act sequence. A rejected operation changes nothing and
//! returns a [`SessionError`].

use std::sync::Mutex;

use tracing::{debug, info, warn};

use super::error::{Result, SessionError};
use super::registry::{InMemorySessionRegistry, SessionRegistry};
use super::state::{Challenge, Pairing, Session, SessionKind, SessionState, SessionView};
use crate::core::{Action, GameRng, ParticipantId, Seat, SessionConfig};
use crate::game::{ExternalHandle, MatchEnd, MatchState, MatchView, RoundReport};

/// Result of issuing a challenge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChallengeIssued {
    /// Waiting for the challengee to accept or refuse.
    AwaitingResponse(Pairing),
    /// The challengee is the AI; the match has already started.
    SoloMatchStarted(MatchView),
}

/// Result of committing an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The opponent has not committed yet.
    Waiting,
    /// Both were in; the round resolved.
    Resolved(RoundReport),
}

/// A match that has left the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchConclusion {
    pub pairing: Pairing,
    pub end: MatchEnd,
    /// Public state at the moment the match ended.
    pub state: MatchView,
}

/// Result of a draw vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawVote {
    /// Waiting for the opponent to vote in the same round.
    Pending,
    /// Both voted; the match is over.
    Agreed(MatchConclusion),
}

/// What to do with the session after an operation.
enum Next<T> {
    Keep(T),
    Terminate(T),
}

/// Drives sessions through their lifecycle over an injected registry.
pub struct SessionManager<R = InMemorySessionRegistry> {
    registry: R,
    config: SessionConfig,
    rng: Mutex<GameRng>,
}

impl SessionManager<InMemorySessionRegistry> {
    /// Create a manager backed by an in-memory registry.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_registry(config, InMemorySessionRegistry::new())
    }
}

impl<R: SessionRegistry> SessionManager<R> {
    /// Create a manager over a custom registry.
    pub fn with_registry(config: SessionConfig, registry: R) -> Self {
        let rng = Mutex::new(GameRng::new(config.seed));
        Self { registry, config, rng }
    }

    /// Manager configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Underlying registry.
    #[must_use]
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Check if a participant has a live session.
    pub fn is_busy(&self, participant: ParticipantId) -> Result<bool> {
        self.registry.contains(participant)
    }

    /// Public snapshot of a participant's session.
    pub fn view(&self, participant: ParticipantId) -> Result<SessionView> {
        self.with_session(participant, "view", |session| Ok(Next::Keep(session.view())))
    }

    /// Challenge someone.
    ///
    /// Fails if the two are the same, if either is already in a session,
    /// or if the challenger is the AI participant. Challenging the AI
    /// starts a solo match at once.
    pub fn issue_challenge(&self, challenger: ParticipantId, challengee: ParticipantId) -> Result<ChallengeIssued> {
        let issued = self.try_issue_challenge(challenger, challengee);
        if let Err(error) = &issued {
            warn!(%challenger, %challengee, %error, "challenge rejected");
        }
        issued
    }

    fn try_issue_challenge(&self, challenger: ParticipantId, challengee: ParticipantId) -> Result<ChallengeIssued> {
        if challenger == challengee {
            return Err(SessionError::SelfReferential);
        }
        if self.config.is_ai(challenger) {
            return Err(SessionError::AiChallenger(challenger));
        }
        if self.config.is_ai(challengee) {
            let pairing = Pairing::solo(challenger, challengee);

            // fork from a copy; the manager's stream only advances once the insert succeeds
            let mut rng = self.rng.lock().map_err(|_| SessionError::LockPoisoned)?;
            let mut advanced = rng.clone();
            let mut game = self.match_for(pairing, advanced.fork());
            game.choose_random_action(Seat::Challengee);
            let view = game.view();

            self.registry
                .insert(Session::new(pairing, SessionState::MatchOngoing(Box::new(game))))?;
            *rng = advanced;
            info!(%challenger, "solo match started");
            return Ok(ChallengeIssued::SoloMatchStarted(view));
        }

        let pairing = Pairing::new(challenger, challengee);
        self.registry.insert(Session::new(
            pairing,
            SessionState::AwaitingChallengeResponse(Challenge::default()),
        ))?;
        info!(%challenger, %challengee, "challenge issued");
        Ok(ChallengeIssued::AwaitingResponse(pairing))
    }

    /// Challengee accepts: the match starts.
    pub fn accept(&self, participant: ParticipantId) -> Result<MatchView> {
        self.with_session(participant, "accept", |session| {
            expect_challenge(&session.state)?;
            if participant == session.pairing.challenger {
                return Err(SessionError::SelfReferential);
            }

            let rng = self.rng.lock().map_err(|_| SessionError::LockPoisoned)?.fork();
            let game = self.match_for(session.pairing, rng);
            let view = game.view();
            session.state = SessionState::MatchOngoing(Box::new(game));
            info!(challenger = %session.pairing.challenger, challengee = %participant, "challenge accepted");
            Ok(Next::Keep(view))
        })
    }

    /// Challengee refuses: the session is removed.
    pub fn refuse(&self, participant: ParticipantId) -> Result<Pairing> {
        self.with_session(participant, "refuse", |session| {
            expect_challenge(&session.state)?;
            if participant == session.pairing.challenger {
                return Err(SessionError::SelfReferential);
            }
            info!(challenger = %session.pairing.challenger, challengee = %participant, "challenge refused");
            Ok(Next::Terminate(session.pairing))
        })
    }

    /// Challenger withdraws: the session is removed.
    pub fn rescind(&self, participant: ParticipantId) -> Result<Pairing> {
        self.with_session(participant, "rescind", |session| {
            expect_challenge(&session.state)?;
            if participant != session.pairing.challenger {
                return Err(SessionError::NotChallenger);
            }
            info!(challenger = %participant, challengee = %session.pairing.challengee, "challenge rescinded");
            Ok(Next::Terminate(session.pairing))
        })
    }

    /// Commit this round's action; resolves the round once both are in.
    pub fn commit_action(&self, participant: ParticipantId, action: Action) -> Result<CommitOutcome> {
        if !action.is_chosen() {
            warn!(%participant, "unchosen action rejected");
            return Err(SessionError::UnchosenAction);
        }

        self.with_session(participant, "commit_action", |session| {
            let solo = session.pairing.solo;
            let (game, seat) = ongoing_match(session, participant)?;

            if !game.players[seat].set_action(action) {
                return Err(SessionError::DuplicateCommitment);
            }
            debug!(%participant, %seat, "action committed");

            if !game.both_committed() {
                return Ok(Next::Keep(CommitOutcome::Waiting));
            }

            let report = game.resolve_round()?;
            if report.match_ended() {
                return Ok(Next::Terminate(CommitOutcome::Resolved(report)));
            }
            if solo {
                game.choose_random_action(Seat::Challengee);
            }
            Ok(Next::Keep(CommitOutcome::Resolved(report)))
        })
    }

    /// Take back this round's action before the opponent commits.
    pub fn undo_action(&self, participant: ParticipantId) -> Result<()> {
        self.with_session(participant, "undo_action", |session| {
            let (game, seat) = ongoing_match(session, participant)?;
            if !game.players[seat].clear_action() {
                return Err(SessionError::NothingToUndo);
            }
            Ok(Next::Keep(()))
        })
    }

    /// Give up the match; the opponent wins.
    pub fn forfeit(&self, participant: ParticipantId) -> Result<MatchConclusion> {
        self.with_session(participant, "forfeit", |session| {
            let pairing = session.pairing;
            let (game, seat) = ongoing_match(session, participant)?;
            info!(%participant, "match forfeited");
            Ok(Next::Terminate(MatchConclusion {
                pairing,
                end: MatchEnd::Forfeited { by: seat },
                state: game.view(),
            }))
        })
    }

    /// Vote to end the match as a draw.
    ///
    /// Takes effect once both players have voted within the same round.
    /// Votes are cleared whenever a round resolves. The AI never votes.
    pub fn vote_draw(&self, participant: ParticipantId) -> Result<DrawVote> {
        self.with_session(participant, "vote_draw", |session| {
            let pairing = session.pairing;
            let (game, seat) = ongoing_match(session, participant)?;
            game.players[seat].set_draw_vote(true);

            if !game.players.iter().all(|(_, p)| p.voted_to_draw()) {
                debug!(%participant, "draw vote pending");
                return Ok(Next::Keep(DrawVote::Pending));
            }

            info!(challenger = %pairing.challenger, challengee = %pairing.challengee, "match drawn by agreement");
            Ok(Next::Terminate(DrawVote::Agreed(MatchConclusion {
                pairing,
                end: MatchEnd::AgreedDraw,
                state: game.view(),
            })))
        })
    }

    /// Remember the display-layer message holding the challenge prompt.
    pub fn set_challenge_message(&self, participant: ParticipantId, handle: ExternalHandle) -> Result<()> {
        self.with_session(participant, "set_challenge_message", |session| {
            match &mut session.state {
                SessionState::AwaitingChallengeResponse(challenge) => {
                    challenge.challengee_message = Some(handle);
                    Ok(Next::Keep(()))
                }
                SessionState::MatchOngoing(_) => Err(SessionError::InvalidTransition {
                    expected: SessionKind::AwaitingChallengeResponse,
                    found: SessionKind::MatchOngoing,
                }),
            }
        })
    }

    /// Remember the display-layer thread and latest round message of a match.
    pub fn set_match_handles(
        &self,
        participant: ParticipantId,
        thread: Option<ExternalHandle>,
        last_round_message: Option<ExternalHandle>,
    ) -> Result<()> {
        self.with_session(participant, "set_match_handles", |session| {
            let (game, _) = ongoing_match(session, participant)?;
            if thread.is_some() {
                game.thread = thread;
            }
            if last_round_message.is_some() {
                game.last_round_message = last_round_message;
            }
            Ok(Next::Keep(()))
        })
    }

    fn match_for(&self, pairing: Pairing, rng: GameRng) -> MatchState {
        MatchState::new(
            pairing.challenger,
            pairing.challengee,
            self.config.match_config.clone(),
            rng,
        )
    }

    /// Run `op` under the participant's session lock.
    ///
    /// On `Terminate` the session is removed from the registry and then
    /// closed, before the lock is released.
    fn with_session<T>(
        &self,
        participant: ParticipantId,
        operation: &'static str,
        op: impl FnOnce(&mut Session) -> Result<Next<T>>,
    ) -> Result<T> {
        let outcome = self.run_locked(participant, op);
        if let Err(error) = &outcome {
            warn!(%participant, operation, %error, "session operation rejected");
        }
        outcome
    }

    fn run_locked<T>(
        &self,
        participant: ParticipantId,
        op: impl FnOnce(&mut Session) -> Result<Next<T>>,
    ) -> Result<T> {
        let handle = self
            .registry
            .get(participant)?
            .ok_or(SessionError::NoSession(participant))?;
        let mut session = handle.lock().map_err(|_| SessionError::LockPoisoned)?;
        if session.closed {
            return Err(SessionError::NoSession(participant));
        }

        match op(&mut session)? {
            Next::Keep(value) => Ok(value),
            Next::Terminate(value) => {
                let pairing = session.pairing;
                self.registry.remove(&pairing)?;
                session.closed = true;
                debug!(challenger = %pairing.challenger, challengee = %pairing.challengee, "session removed");
                Ok(value)
            }
        }
    }
}

fn expect_challenge(state: &SessionState) -> Result<()> {
    match state {
        SessionState::AwaitingChallengeResponse(_) => Ok(()),
        SessionState::MatchOngoing(_) => Err(SessionError::InvalidTransition {
            expected: SessionKind::AwaitingChallengeResponse,
            found: SessionKind::MatchOngoing,
        }),
    }
}

fn ongoing_match(session: &mut Session, participant: ParticipantId) -> Result<(&mut MatchState, Seat)> {
    match &mut session.state {
        SessionState::MatchOngoing(game) => {
            let seat = game
                .seat_of(participant)
                .ok_or(SessionError::NoSession(participant))?;
            Ok((&mut **game, seat))
        }
        SessionState::AwaitingChallengeResponse(_) => Err(SessionError::InvalidTransition {
            expected: SessionKind::MatchOngoing,
            found: SessionKind::AwaitingChallengeResponse,
        }),
    }
}
