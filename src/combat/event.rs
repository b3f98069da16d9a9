//! Structured record of everything that happened in a round.
//!
//! The engine and the match aggregator emit `RoundEvent`s in display
//! order; `narration` turns them into Markdown. Events carry seats, not
//! names, so the display layer decides how to mention players.

use serde::{Deserialize, Serialize};

use crate::core::Seat;

/// One narrated fact about a resolved round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    // === Initial phase ===
    /// A broken shield mended at the start of the round.
    ShieldMended { seat: Seat },
    /// A broken shield failed its mend roll.
    ShieldStillBroken { seat: Seat },
    /// Boost went up to `boost`.
    Boosted { seat: Seat, boost: u32 },
    /// Boost was already capped; it is preserved.
    BoostHeld { seat: Seat, boost: u32 },

    // === Middle phase ===
    /// Attack landed for `damage`.
    AttackHit {
        attacker: Seat,
        defender: Seat,
        damage: u32,
        boosted: bool,
        with_priority: bool,
    },
    /// Attack was stopped by an intact guard.
    AttackBlocked {
        attacker: Seat,
        defender: Seat,
        attacker_boost: u32,
        defender_boost: u32,
    },
    /// Guard was raised but the shield is broken, so the attack goes through.
    GuardBroken { attacker: Seat, defender: Seat },
    /// The defender's shield broke for `counter` rounds of odds.
    ShieldBroken { seat: Seat, counter: u32 },
    /// Priority went up to `priority`.
    PriorityGained { seat: Seat, priority: u32 },
    /// Priority stayed at `priority` and will not decay this round.
    PriorityRetained { seat: Seat, priority: u32 },
    /// The guard held but the attacker's priority dampened any gain.
    PriorityDenied { seat: Seat, attacker: Seat },
    /// Guard with nothing to block.
    GuardIdle { seat: Seat },
    /// Heal applied.
    Healed {
        seat: Seat,
        amount: u32,
        hp: u32,
        overheal: bool,
        through_priority: bool,
    },
    /// Heal at or above the ceiling.
    HealWasted { seat: Seat, through_priority: bool },

    // === Sudden death ===
    /// Both knocked out on equal HP; both continue at `hp`.
    Endured { hp: u32 },
    /// Both knocked out; `winner` ended with higher HP.
    SuddenDeathVictory { winner: Seat },

    // === Deferred middle-phase events ===
    /// The attacker's strike was nullified by a prioritized counterattack.
    AttackCountered {
        attacker: Seat,
        defender: Seat,
        boosted: bool,
    },
    /// Heal was interrupted by an attack.
    HealInterrupted { healer: Seat, attacker: Seat },

    // === End phase ===
    /// Boost reset to 0 after a round without Boost.
    BoostExpended { seat: Seat },
    /// Priority decayed to `priority`.
    PriorityDecayed { seat: Seat, priority: u32 },
    /// Shield counter reached zero.
    ShieldRepaired { seat: Seat },
    /// Shield still broken; next round's mend chance is 1 in `one_in`.
    MendOdds { seat: Seat, one_in: u32 },

    // === Verdicts ===
    /// Game won.
    Victory { seat: Seat },
    /// Game drawn.
    Draw,
    /// Running match score after a game.
    Score { challenger_wins: u32, challengee_wins: u32 },
    /// Match won.
    MatchVictory { seat: Seat },
    /// Both reached the win threshold together.
    MatchDrawn,
}

impl RoundEvent {
    /// Same event with challenger and challengee swapped.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        use RoundEvent::*;
        let m = Seat::opponent;
        match *self {
            ShieldMended { seat } => ShieldMended { seat: m(seat) },
            ShieldStillBroken { seat } => ShieldStillBroken { seat: m(seat) },
            Boosted { seat, boost } => Boosted { seat: m(seat), boost },
            BoostHeld { seat, boost } => BoostHeld { seat: m(seat), boost },
            AttackHit {
                attacker,
                defender,
                damage,
                boosted,
                with_priority,
            } => AttackHit {
                attacker: m(attacker),
                defender: m(defender),
                damage,
                boosted,
                with_priority,
            },
            AttackBlocked {
                attacker,
                defender,
                attacker_boost,
                defender_boost,
            } => AttackBlocked {
                attacker: m(attacker),
                defender: m(defender),
                attacker_boost,
                defender_boost,
            },
            GuardBroken { attacker, defender } => GuardBroken {
                attacker: m(attacker),
                defender: m(defender),
            },
            ShieldBroken { seat, counter } => ShieldBroken { seat: m(seat), counter },
            PriorityGained { seat, priority } => PriorityGained { seat: m(seat), priority },
            PriorityRetained { seat, priority } => PriorityRetained { seat: m(seat), priority },
            PriorityDenied { seat, attacker } => PriorityDenied {
                seat: m(seat),
                attacker: m(attacker),
            },
            GuardIdle { seat } => GuardIdle { seat: m(seat) },
            Healed {
                seat,
                amount,
                hp,
                overheal,
                through_priority,
            } => Healed {
                seat: m(seat),
                amount,
                hp,
                overheal,
                through_priority,
            },
            HealWasted { seat, through_priority } => HealWasted {
                seat: m(seat),
                through_priority,
            },
            Endured { hp } => Endured { hp },
            SuddenDeathVictory { winner } => SuddenDeathVictory { winner: m(winner) },
            AttackCountered {
                attacker,
                defender,
                boosted,
            } => AttackCountered {
                attacker: m(attacker),
                defender: m(defender),
                boosted,
            },
            HealInterrupted { healer, attacker } => HealInterrupted {
                healer: m(healer),
                attacker: m(attacker),
            },
            BoostExpended { seat } => BoostExpended { seat: m(seat) },
            PriorityDecayed { seat, priority } => PriorityDecayed { seat: m(seat), priority },
            ShieldRepaired { seat } => ShieldRepaired { seat: m(seat) },
            MendOdds { seat, one_in } => MendOdds { seat: m(seat), one_in },
            Victory { seat } => Victory { seat: m(seat) },
            Draw => Draw,
            Score {
                challenger_wins,
                challengee_wins,
            } => Score {
                challenger_wins: challengee_wins,
                challengee_wins: challenger_wins,
            },
            MatchVictory { seat } => MatchVictory { seat: m(seat) },
            MatchDrawn => MatchDrawn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirrored_swaps_seats() {
        let event = RoundEvent::AttackHit {
            attacker: Seat::Challenger,
            defender: Seat::Challengee,
            damage: 3,
            boosted: true,
            with_priority: false,
        };
        let mirrored = event.mirrored();
        assert_eq!(
            mirrored,
            RoundEvent::AttackHit {
                attacker: Seat::Challengee,
                defender: Seat::Challenger,
                damage: 3,
                boosted: true,
                with_priority: false,
            }
        );
        assert_eq!(mirrored.mirrored(), event);
    }

    #[test]
    fn test_mirrored_score() {
        let event = RoundEvent::Score {
            challenger_wins: 2,
            challengee_wins: 1,
        };
        assert_eq!(
            event.mirrored(),
            RoundEvent::Score {
                challenger_wins: 1,
                challengee_wins: 2,
            }
        );
    }
}
