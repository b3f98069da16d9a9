//! Errors reported to the display layer.
//!
//! Every variant is recoverable and leaves session state untouched.

use thiserror::Error;

use super::state::SessionKind;
use crate::combat::CombatError;
use crate::core::ParticipantId;

/// Rejected session operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{0} is not in a session")]
    NoSession(ParticipantId),

    #[error("expected {expected}, but the session is {found}")]
    InvalidTransition { expected: SessionKind, found: SessionKind },

    #[error("an action is already committed for this round")]
    DuplicateCommitment,

    #[error("you cannot challenge, accept or refuse yourself")]
    SelfReferential,

    #[error("{0} is already busy with another session")]
    Busy(ParticipantId),

    #[error("{0} plays only when challenged")]
    AiChallenger(ParticipantId),

    #[error("only the challenger can rescind a challenge")]
    NotChallenger,

    #[error("there is no action to undo, or the round is already locked")]
    NothingToUndo,

    #[error("an action must be boost, attack, guard or heal")]
    UnchosenAction,

    #[error("session lock was poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Combat(#[from] CombatError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
