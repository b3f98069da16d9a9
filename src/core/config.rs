//! Match and session configuration.
//!
//! - `MatchConfig`: combat constants and the win threshold
//! - `SessionConfig`: match config plus solo-play and seeding options

use serde::{Deserialize, Serialize};

use super::player::ParticipantId;

/// Rules for a single best-of-N match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Games a player must win to take the match (default: 3).
    pub win_threshold: u32,

    /// HP at the start of each game, and the base heal ceiling (default: 3).
    pub base_max_health: u32,

    /// Highest boost stack (default: 6).
    pub max_boost: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            win_threshold: 3,
            base_max_health: 3,
            max_boost: 6,
        }
    }
}

impl MatchConfig {
    /// Set the win threshold. A threshold of 1 is a single game.
    #[must_use]
    pub fn with_win_threshold(mut self, wins: u32) -> Self {
        assert!(wins > 0, "Win threshold must be at least 1");
        self.win_threshold = wins;
        self
    }

    /// Set the starting health.
    #[must_use]
    pub fn with_base_max_health(mut self, hp: u32) -> Self {
        assert!(hp > 0, "Base max health must be at least 1");
        self.base_max_health = hp;
        self
    }

    /// Set the boost cap.
    #[must_use]
    pub fn with_max_boost(mut self, max: u32) -> Self {
        self.max_boost = max;
        self
    }

    /// Heal ceiling for a player holding `boost` stacks.
    #[must_use]
    pub fn heal_ceiling(&self, boost: u32) -> u32 {
        self.base_max_health + 1 + boost
    }
}

/// Configuration for a [`SessionManager`](crate::session::SessionManager).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Rules applied to every match the manager starts.
    pub match_config: MatchConfig,

    /// Identity that plays automatically. Challenging it starts a solo match.
    pub ai_participant: Option<ParticipantId>,

    /// Seed for the manager RNG. Each match forks its own stream.
    pub seed: u64,
}

impl SessionConfig {
    /// Create a config with default match rules and the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Set the match rules.
    #[must_use]
    pub fn with_match_config(mut self, config: MatchConfig) -> Self {
        self.match_config = config;
        self
    }

    /// Register the AI participant used for solo play.
    #[must_use]
    pub fn with_ai_participant(mut self, participant: ParticipantId) -> Self {
        self.ai_participant = Some(participant);
        self
    }

    /// Whether `participant` is the AI opponent.
    #[must_use]
    pub fn is_ai(&self, participant: ParticipantId) -> bool {
        self.ai_participant == Some(participant)
    }
}
