//! Markdown rendering of round events and match status.
//!
//! Wording is a display concern; callers pass a function that names each
//! seat (a platform mention, "p1", ...).

use std::fmt::Write;

use super::event::RoundEvent;
use crate::core::{Action, Seat};
use crate::game::MatchView;

/// Render events as a Markdown bullet list, one line per event.
pub fn render_events(events: &[RoundEvent], name: impl Fn(Seat) -> String) -> String {
    let mut out = String::new();
    for event in events {
        out.push_str("- ");
        out.push_str(&describe(event, &name));
        out.push('\n');
    }
    out
}

/// One event as a sentence.
pub fn describe(event: &RoundEvent, name: &impl Fn(Seat) -> String) -> String {
    use RoundEvent::*;
    let attack = Action::Attack.label();
    let guard = Action::Guard.label();
    let heal = Action::Heal.label();

    match *event {
        ShieldMended { seat } => format!("{}'s shield is **mended**!", name(seat)),
        ShieldStillBroken { seat } => format!("{}'s shield remains **broken**.", name(seat)),
        Boosted { seat, boost } => format!("{} {}s to **{}**.", name(seat), Action::Boost.label(), boost),
        BoostHeld { seat, boost } => format!(
            "{} {}s, holding at the maximum of **{}**.",
            name(seat),
            Action::Boost.label(),
            boost
        ),
        AttackHit {
            attacker,
            damage,
            boosted,
            with_priority,
            ..
        } => {
            let mut line = format!("{} {}s for ", name(attacker), attack);
            if boosted {
                line.push_str("a boosted ");
            }
            let _ = write!(line, "**{}** damage", damage);
            if with_priority {
                line.push_str(" with priority");
            }
            line.push('.');
            line
        }
        AttackBlocked {
            attacker,
            defender,
            attacker_boost,
            defender_boost,
        } => format!(
            "{} {}s{}, but {} {}s{} and **prevents damage**.",
            name(attacker),
            attack,
            with_boost(attacker_boost),
            name(defender),
            guard,
            with_boost(defender_boost)
        ),
        GuardBroken { attacker, defender } => format!(
            "{} attacks, and {} {}s, but the shield is **broken**.",
            name(attacker),
            name(defender),
            guard
        ),
        ShieldBroken { seat, counter } => format!(
            "{}'s shield **breaks**! It is damaged to {}.",
            name(seat),
            counter
        ),
        PriorityGained { seat, priority } => format!("{} gains priority up to **{}**.", name(seat), priority),
        PriorityRetained { seat, priority } => format!("{} retains priority at **{}**.", name(seat), priority),
        PriorityDenied { seat, attacker } => format!(
            "Because {} holds priority, {} gains none.",
            name(attacker),
            name(seat)
        ),
        GuardIdle { seat } => format!("{} {}s to **no effect**.", name(seat), guard),
        Healed {
            seat,
            amount,
            hp,
            overheal,
            through_priority,
        } => format!(
            "{} {}s{} by **{}** to {}**{}**.",
            name(seat),
            heal,
            if through_priority {
                ", with **priority preventing interruption**,"
            } else {
                ""
            },
            amount,
            if overheal { "an overheal of " } else { "" },
            hp
        ),
        HealWasted { seat, through_priority } => format!(
            "{} {}s{} to no effect.",
            name(seat),
            heal,
            if through_priority {
                ", with **priority preventing interruption**,"
            } else {
                ""
            }
        ),
        Endured { hp } => format!(
            "Both players lost all their HP in the same round with the same final HP. They endure with {}HP each.",
            hp
        ),
        SuddenDeathVictory { winner } => format!(
            "Both players lost all their HP in the same round, but {}'s health was ultimately higher, securing **victory**!",
            name(winner)
        ),
        AttackCountered {
            attacker,
            defender,
            boosted,
        } => format!(
            "{}'s counterattack renders {}'s {}{} **impotent**.",
            name(defender),
            name(attacker),
            if boosted { "boosted " } else { "" },
            attack
        ),
        HealInterrupted { healer, attacker } => format!(
            "{}'s {}ing is **interrupted** by {}'s attack.",
            name(healer),
            heal,
            name(attacker)
        ),
        BoostExpended { seat } => format!("{}'s boost is **expended to 0**.", name(seat)),
        PriorityDecayed { seat, priority } => format!("{}'s priority **falls to {}**.", name(seat), priority),
        ShieldRepaired { seat } => format!("{}'s shield is **mended**!", name(seat)),
        MendOdds { seat, one_in } => format!(
            "The chance of {}'s shield mending next round is **1 in {}**.",
            name(seat),
            one_in
        ),
        Victory { seat } => format!("{} secures **victory**!", name(seat)),
        Draw => "Both players lost all health in the same round, resulting in a **draw**.".to_string(),
        Score {
            challenger_wins,
            challengee_wins,
        } => format!(
            "Score: {} **{}** – **{}** {}",
            name(Seat::Challenger),
            challenger_wins,
            challengee_wins,
            name(Seat::Challengee)
        ),
        MatchVictory { seat } => format!("{} wins the **match**!", name(seat)),
        MatchDrawn => "The match ends in a **draw**.".to_string(),
    }
}

fn with_boost(boost: u32) -> String {
    if boost > 0 {
        format!(" with a boost of {}", boost)
    } else {
        String::new()
    }
}

/// Status block shown before each round.
pub fn render_status(view: &MatchView, name: impl Fn(Seat) -> String) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Game {}, Round {}", view.game_number, view.round);

    for (seat, player) in view.players.iter() {
        let _ = writeln!(out, "🤺 {} ({} wins)", name(seat), player.wins);
        let _ = writeln!(out, "- ❤️x{}", player.hp);
        if let Some(one_in) = player.mend_odds() {
            let _ = writeln!(out, "- 🛡️❌ (chance of mending: 1 in {})", one_in);
        }
        if player.boost > 0 {
            out.push_str("- ⬆️");
            if player.boost > 1 {
                let _ = write!(out, "x{}", player.boost);
            }
            out.push('\n');
        }
        if player.priority > 0 {
            out.push_str("- [Priority");
            if player.priority > 1 {
                let _ = write!(out, " x{}", player.priority);
            }
            out.push_str("]\n");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MatchConfig, ParticipantId, Player, SeatMap};
    use crate::game::PlayerView;

    fn name(seat: Seat) -> String {
        match seat {
            Seat::Challenger => "A".to_string(),
            Seat::Challengee => "B".to_string(),
        }
    }

    #[test]
    fn test_render_events_one_line_each() {
        let events = vec![
            RoundEvent::Boosted {
                seat: Seat::Challenger,
                boost: 1,
            },
            RoundEvent::GuardIdle { seat: Seat::Challengee },
        ];
        let text = render_events(&events, name);
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("- A"));
        assert!(text.contains("**1**"));
        assert!(text.contains("B 🛡️ **GUARD** 🛡️s to **no effect**."));
    }

    #[test]
    fn test_describe_attack_hit() {
        let line = describe(
            &RoundEvent::AttackHit {
                attacker: Seat::Challengee,
                defender: Seat::Challenger,
                damage: 3,
                boosted: true,
                with_priority: true,
            },
            &name,
        );
        assert!(line.starts_with("B "));
        assert!(line.contains("a boosted **3** damage with priority."));
    }

    #[test]
    fn test_describe_countered_names_defender_first() {
        let line = describe(
            &RoundEvent::AttackCountered {
                attacker: Seat::Challenger,
                defender: Seat::Challengee,
                boosted: false,
            },
            &name,
        );
        assert!(line.starts_with("B's counterattack renders A's"));
    }

    #[test]
    fn test_describe_score() {
        let line = describe(
            &RoundEvent::Score {
                challenger_wins: 2,
                challengee_wins: 1,
            },
            &name,
        );
        assert!(line.contains("A **2**"));
        assert!(line.contains("**1** B"));
    }

    #[test]
    fn test_render_status() {
        let config = MatchConfig::default();
        let mut players = SeatMap::new(|s| Player::new(ParticipantId::new(s.index() as u64), &config));
        players[Seat::Challenger].boost = 2;
        players[Seat::Challengee].shield_break_counter = 1;
        players[Seat::Challengee].priority = 1;

        let view = MatchView {
            players: players.map(|_, p| PlayerView::from(p)),
            round: 4,
            game_number: 2,
            win_threshold: 3,
        };
        let text = render_status(&view, name);

        assert!(text.starts_with("# Game 2, Round 4"));
        assert!(text.contains("⬆️x2"));
        assert!(text.contains("1 in 2"));
        assert!(text.contains("[Priority]"));
    }
}
