//! Session state: who is paired with whom, and where they are in the
//! challenge → match lifecycle.
//!
//! Termination is not a variant: a terminated session is simply absent
//! from the registry.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::ParticipantId;
use crate::game::{ExternalHandle, MatchState, MatchView};

/// Two participants bound to one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairing {
    pub challenger: ParticipantId,
    pub challengee: ParticipantId,
    /// The challengee is the AI; only the challenger is registered.
    pub solo: bool,
}

impl Pairing {
    /// A challenge between two people.
    #[must_use]
    pub const fn new(challenger: ParticipantId, challengee: ParticipantId) -> Self {
        Self {
            challenger,
            challengee,
            solo: false,
        }
    }

    /// A match against the AI participant.
    #[must_use]
    pub const fn solo(challenger: ParticipantId, ai: ParticipantId) -> Self {
        Self {
            challenger,
            challengee: ai,
            solo: true,
        }
    }

    /// Identities that hold a registry entry for this pairing.
    #[must_use]
    pub fn members(&self) -> SmallVec<[ParticipantId; 2]> {
        let mut members = SmallVec::new();
        members.push(self.challenger);
        if !self.solo {
            members.push(self.challengee);
        }
        members
    }
}

/// Which lifecycle stage a session is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionKind {
    AwaitingChallengeResponse,
    MatchOngoing,
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionKind::AwaitingChallengeResponse => f.write_str("awaiting a challenge response"),
            SessionKind::MatchOngoing => f.write_str("an ongoing match"),
        }
    }
}

/// An issued challenge waiting for the challengee.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Challenge {
    /// Display-layer message that carries the accept/refuse prompt.
    pub challengee_message: Option<ExternalHandle>,
}

/// Lifecycle stage plus its data.
#[derive(Clone, Debug)]
pub enum SessionState {
    AwaitingChallengeResponse(Challenge),
    MatchOngoing(Box<MatchState>),
}

impl SessionState {
    /// The stage, without data.
    #[must_use]
    pub fn kind(&self) -> SessionKind {
        match self {
            SessionState::AwaitingChallengeResponse(_) => SessionKind::AwaitingChallengeResponse,
            SessionState::MatchOngoing(_) => SessionKind::MatchOngoing,
        }
    }
}

/// A registry entry: the pairing and its current state.
#[derive(Clone, Debug)]
pub struct Session {
    pub pairing: Pairing,
    pub state: SessionState,
    /// Set once the session has been removed from the registry.
    pub(crate) closed: bool,
}

impl Session {
    /// Create a live session.
    #[must_use]
    pub fn new(pairing: Pairing, state: SessionState) -> Self {
        Self {
            pairing,
            state,
            closed: false,
        }
    }

    /// Public snapshot.
    #[must_use]
    pub fn view(&self) -> SessionView {
        match &self.state {
            SessionState::AwaitingChallengeResponse(_) => SessionView::AwaitingChallengeResponse { pairing: self.pairing },
            SessionState::MatchOngoing(game) => SessionView::MatchOngoing(game.view()),
        }
    }
}

/// What the display layer may see of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionView {
    AwaitingChallengeResponse { pairing: Pairing },
    MatchOngoing(MatchView),
}
