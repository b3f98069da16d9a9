//! # bagh
//!
//! Turn resolution and session lifecycle for BAGH, a two-player
//! simultaneous-action duel. Each round both players secretly pick Boost,
//! Attack, Guard or Heal; once both picks are in the round resolves
//! health, boost stacks, priority and shield breaks, and produces a
//! narrated transcript.
//!
//! ## Design Principles
//!
//! 1. **Seat-symmetric**: swapping challenger and challengee swaps the
//!    outcome and nothing else. Damage is queued and applied after both
//!    players have acted.
//!
//! 2. **Reproducible**: the only randomness is the shield-mend roll and the
//!    AI's action pick, both drawn from a seeded, forkable `GameRng`.
//!
//! 3. **Display-agnostic**: rounds report structured `RoundEvent`s; Markdown
//!    rendering is one consumer among many. Platform handles are carried
//!    as opaque strings.
//!
//! ## Modules
//!
//! - `core`: actions, participants and seats, RNG, configuration
//! - `combat`: round events, round transaction, resolution engine, narration
//! - `game`: match state, game/match results, public views
//! - `session`: challenge/match lifecycle over a shared registry

pub mod core;
pub mod combat;
pub mod game;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Action, ParseActionError,
    ParticipantId, Player, Seat, SeatMap,
    GameRng, GameRngState, RandomSource,
    MatchConfig, SessionConfig,
};

pub use crate::combat::{resolve_round, CombatError, RoundEvent, RoundResolution, RoundVerdict};

pub use crate::game::{
    ExternalHandle, GameResult, MatchEnd, MatchResult,
    MatchState, MatchView, PlayerView, RoundReport,
};

pub use crate::session::{
    ChallengeIssued, CommitOutcome, DrawVote, MatchConclusion,
    InMemorySessionRegistry, Pairing, SessionError, SessionManager,
    SessionRegistry, SessionView,
};
