//! The four duel actions and the "nothing chosen yet" sentinel.
//!
//! Each round both players secretly commit one of `Boost`, `Attack`,
//! `Guard` or `Heal`. `Unchosen` only marks the gap between rounds and is
//! never resolved as a move.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A move committed for one round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Stack one more boost (max 6). Boost adds to damage and heal amount.
    Boost,
    /// Deal `1 + boost` damage to the opponent.
    Attack,
    /// Block an incoming attack unless the shield is broken.
    Guard,
    /// Restore `1 + boost` HP, up to `base + 1 + boost`.
    Heal,
    /// No selection yet.
    #[default]
    Unchosen,
}

impl Action {
    /// Every real move, in declaration order.
    pub const ALL: [Action; 4] = [Action::Boost, Action::Attack, Action::Guard, Action::Heal];

    /// Whether this is an actual move rather than the sentinel.
    #[must_use]
    pub const fn is_chosen(self) -> bool {
        !matches!(self, Action::Unchosen)
    }

    /// Markdown label used in narration.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Action::Boost => "⬆️ **BOOST** ⬆️",
            Action::Attack => "⚔️ **ATTACK** ⚔️",
            Action::Guard => "🛡️ **GUARD** 🛡️",
            Action::Heal => "✨ **HEAL** ✨",
            Action::Unchosen => "**nothing**",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Boost => "boost",
            Action::Attack => "attack",
            Action::Guard => "guard",
            Action::Heal => "heal",
            Action::Unchosen => "unchosen",
        };
        f.write_str(name)
    }
}

/// Error returned when text does not name a move.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown action `{0}` (expected boost, attack, guard or heal)")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    /// Accepts full names or their first letter, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "b" | "boost" => Ok(Action::Boost),
            "a" | "attack" => Ok(Action::Attack),
            "g" | "guard" => Ok(Action::Guard),
            "h" | "heal" => Ok(Action::Heal),
            _ => Err(ParseActionError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unchosen() {
        assert_eq!(Action::default(), Action::Unchosen);
        assert!(!Action::Unchosen.is_chosen());
        assert!(Action::ALL.iter().all(|a| a.is_chosen()));
    }

    #[test]
    fn test_parse_short_and_long() {
        assert_eq!("b".parse::<Action>(), Ok(Action::Boost));
        assert_eq!("Attack".parse::<Action>(), Ok(Action::Attack));
        assert_eq!(" guard ".parse::<Action>(), Ok(Action::Guard));
        assert_eq!("H".parse::<Action>(), Ok(Action::Heal));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("unchosen".parse::<Action>().is_err());
        assert!("".parse::<Action>().is_err());
        assert!("x".parse::<Action>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Action::Guard), "guard");
    }

    #[test]
    fn test_action_serialization() {
        let json = serde_json::to_string(&Action::Heal).unwrap();
        let deserialized: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, Action::Heal);
    }
}
