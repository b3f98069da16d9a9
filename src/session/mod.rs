//! Challenge and match sessions between participants.
//!
//! A participant is in at most one live session. The [`SessionManager`]
//! moves sessions through the challenge → match lifecycle and removes them
//! from the [`SessionRegistry`] when they end.

pub mod error;
pub mod manager;
pub mod registry;
pub mod state;

pub use error::{Result, SessionError};
pub use manager::{ChallengeIssued, CommitOutcome, DrawVote, MatchConclusion, SessionManager};
pub use registry::{InMemorySessionRegistry, SessionHandle, SessionRegistry};
pub use state::{Challenge, Pairing, Session, SessionKind, SessionState, SessionView};
