//! Combat resolution.
//!
//! - `event`: structured narration of a round
//! - `transaction`: scoped lock/clear of both players' actions
//! - `engine`: the three-phase round resolution
//! - `narration`: Markdown rendering of events and status

pub mod event;
pub mod transaction;
pub mod engine;
pub mod narration;

pub use event::RoundEvent;
pub use transaction::RoundTransaction;
pub use engine::{resolve_round, CombatError, RoundResolution, RoundVerdict, ENDURE_HP};
