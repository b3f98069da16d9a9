//! Round resolution.
//!
//! `resolve_round` takes both players with committed actions and applies
//! one round in three phases:
//!
//! 1. **Initial**: shield-mend rolls, then boost stacking.
//! 2. **Middle**: each seat acts against the other (challenger first).
//!    Blocks, shield breaks, priority and heals apply immediately; attack
//!    damage is queued and applied once both seats have acted, so the
//!    result does not depend on seat order.
//! 3. **End**: boost expiry, priority decay, shield countdown.
//!
//! Between the middle and end phases, sudden death settles simultaneous
//! knockouts: equal final HP means both endure at 1, otherwise the higher
//! HP wins. HP is tracked unclamped until then.

use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, error};

use super::event::RoundEvent;
use super::transaction::RoundTransaction;
use crate::core::{Action, MatchConfig, Player, RandomSource, Seat, SeatMap};
use crate::game::GameResult;

/// HP both players are set to when they fall on the same, equal value.
pub const ENDURE_HP: u32 = 1;

/// Reasons a round cannot be resolved.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CombatError {
    /// A seat has not committed an action yet.
    #[error("{seat} has not committed an action")]
    MissingAction { seat: Seat },
}

/// Whether the game goes on after a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundVerdict {
    /// Both players are still standing.
    Continue,
    /// The game ended with this result.
    GameOver(GameResult),
}

impl RoundVerdict {
    /// Check if the game ended.
    #[must_use]
    pub fn is_game_over(self) -> bool {
        matches!(self, RoundVerdict::GameOver(_))
    }
}

/// Everything a resolved round produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundResolution {
    /// The actions that were resolved.
    pub actions: SeatMap<Action>,
    /// Narration events in display order.
    pub events: Vec<RoundEvent>,
    /// Game continuation or result.
    pub verdict: RoundVerdict,
}

impl RoundResolution {
    /// The game result, if the game ended this round.
    #[must_use]
    pub fn game_result(&self) -> Option<GameResult> {
        match self.verdict {
            RoundVerdict::GameOver(result) => Some(result),
            RoundVerdict::Continue => None,
        }
    }
}

/// Round-scoped markers that suppress end-phase decay.
#[derive(Clone, Copy, Debug, Default)]
struct RoundFlags {
    /// Shield was broken when the round started, before any mend.
    entered_broken: bool,
    /// Priority was gained or retained; skip decay.
    priority_held: bool,
    /// Shield broke this round; skip countdown.
    shield_just_broke: bool,
}

/// Event buffers, concatenated in display order at the end.
#[derive(Default)]
struct RoundLog {
    main: Vec<RoundEvent>,
    deferred: Vec<RoundEvent>,
    expiries: Vec<RoundEvent>,
    decays: Vec<RoundEvent>,
    shields: Vec<RoundEvent>,
}

impl RoundLog {
    fn finish(self, verdict: RoundVerdict) -> Vec<RoundEvent> {
        let mut events = self.main;
        events.extend(self.deferred);
        events.extend(self.expiries);
        events.extend(self.decays);
        events.extend(self.shields);
        match verdict {
            RoundVerdict::GameOver(GameResult::Winner(seat)) => events.push(RoundEvent::Victory { seat }),
            RoundVerdict::GameOver(GameResult::Draw) => events.push(RoundEvent::Draw),
            RoundVerdict::Continue => {}
        }
        events
    }
}

/// Resolve one round between two players who have both committed.
///
/// On success both players' actions are cleared and unlocked, draw votes
/// are reset, and their stats reflect the round. On error nothing changes.
pub fn resolve_round<R>(
    players: &mut SeatMap<Player>,
    config: &MatchConfig,
    rng: &mut R,
) -> Result<RoundResolution, CombatError>
where
    R: RandomSource + ?Sized,
{
    let actions = players.map(|_, p| p.action());
    for seat in Seat::BOTH {
        if !actions[seat].is_chosen() {
            return Err(CombatError::MissingAction { seat });
        }
    }

    debug!(
        challenger = %actions[Seat::Challenger],
        challengee = %actions[Seat::Challengee],
        "resolving round"
    );

    let mut round = RoundTransaction::begin(players);
    let mut log = RoundLog::default();
    let mut flags = SeatMap::with_value(RoundFlags::default());

    initial_phase(&mut round, &actions, config, rng, &mut flags, &mut log);
    let mut hp = middle_phase(&mut round, &actions, config, &mut flags, &mut log);
    sudden_death(&mut hp, &mut log);
    let verdict = judge(&hp);

    for (seat, player) in round.iter_mut() {
        player.hp = u32::try_from(hp[seat].max(0)).unwrap_or(u32::MAX);
    }

    end_phase(&mut round, &actions, &flags, verdict, &mut log);

    debug!(?verdict, "round resolved");

    Ok(RoundResolution {
        actions,
        events: log.finish(verdict),
        verdict,
    })
}

fn initial_phase<R>(
    players: &mut SeatMap<Player>,
    actions: &SeatMap<Action>,
    config: &MatchConfig,
    rng: &mut R,
    flags: &mut SeatMap<RoundFlags>,
    log: &mut RoundLog,
) where
    R: RandomSource + ?Sized,
{
    for seat in Seat::BOTH {
        let player = &mut players[seat];

        if player.shield_break_counter > 0 {
            flags[seat].entered_broken = true;
            let odds = 1.0 / f64::from(player.shield_break_counter + 1);
            if rng.roll_unit() < odds {
                player.shield_break_counter = 0;
                log.main.push(RoundEvent::ShieldMended { seat });
            } else {
                log.main.push(RoundEvent::ShieldStillBroken { seat });
            }
        }

        if actions[seat] == Action::Boost {
            if player.boost < config.max_boost {
                player.boost += 1;
                log.main.push(RoundEvent::Boosted {
                    seat,
                    boost: player.boost,
                });
            } else {
                log.main.push(RoundEvent::BoostHeld {
                    seat,
                    boost: player.boost,
                });
            }
        }
    }
}

/// Returns unclamped HP after all heals and queued damage.
fn middle_phase(
    players: &mut SeatMap<Player>,
    actions: &SeatMap<Action>,
    config: &MatchConfig,
    flags: &mut SeatMap<RoundFlags>,
    log: &mut RoundLog,
) -> SeatMap<i64> {
    let mut hp = players.map(|_, p| i64::from(p.hp));
    let mut strikes: SmallVec<[(Seat, u32); 2]> = SmallVec::new();

    for agent in Seat::BOTH {
        let patient = agent.opponent();
        let patient_action = actions[patient];
        let (a, p) = players.pair_mut(agent);

        let agent_has_priority = a.priority > p.priority;
        let patient_has_priority = p.priority > a.priority;

        match actions[agent] {
            Action::Attack => {
                let mut lands = true;

                match patient_action {
                    Action::Attack if patient_has_priority => {
                        lands = false;
                        log.deferred.push(RoundEvent::AttackCountered {
                            attacker: agent,
                            defender: patient,
                            boosted: a.boost > 0,
                        });
                    }
                    // a shield mended this round still fails against this round's attack
                    Action::Guard if flags[patient].entered_broken => {
                        log.main.push(RoundEvent::GuardBroken {
                            attacker: agent,
                            defender: patient,
                        });
                    }
                    Action::Guard => {
                        lands = false;
                        log.main.push(RoundEvent::AttackBlocked {
                            attacker: agent,
                            defender: patient,
                            attacker_boost: a.boost,
                            defender_boost: p.boost,
                        });
                        guard_holds(a, p, agent, patient, &mut flags[patient], log);
                    }
                    Action::Heal if !patient_has_priority => {
                        log.deferred.push(RoundEvent::HealInterrupted {
                            healer: patient,
                            attacker: agent,
                        });
                    }
                    _ => {}
                }

                if lands {
                    let damage = 1 + a.boost;
                    strikes.push((patient, damage));
                    log.main.push(RoundEvent::AttackHit {
                        attacker: agent,
                        defender: patient,
                        damage,
                        boosted: a.boost > 0,
                        with_priority: agent_has_priority,
                    });
                }
            }
            Action::Guard => {
                if patient_action != Action::Attack {
                    log.main.push(RoundEvent::GuardIdle { seat: agent });
                }
            }
            Action::Heal => {
                let attacked = patient_action == Action::Attack;
                if !attacked || agent_has_priority {
                    let ceiling = i64::from(config.heal_ceiling(a.boost));
                    let current = hp[agent];
                    let healed = (current + 1 + i64::from(a.boost)).min(ceiling);
                    let through_priority = attacked && agent_has_priority;

                    if current >= healed {
                        log.main.push(RoundEvent::HealWasted {
                            seat: agent,
                            through_priority,
                        });
                    } else {
                        hp[agent] = healed;
                        log.main.push(RoundEvent::Healed {
                            seat: agent,
                            amount: u32::try_from(healed - current).unwrap_or(0),
                            hp: u32::try_from(healed).unwrap_or(0),
                            overheal: healed > i64::from(config.base_max_health),
                            through_priority,
                        });
                    }
                }
            }
            Action::Boost | Action::Unchosen => {}
        }
    }

    for (defender, damage) in strikes {
        hp[defender] -= i64::from(damage);
    }

    hp
}

/// An intact guard stopped the attack: break the shield or grant priority.
fn guard_holds(
    attacker: &Player,
    defender: &mut Player,
    attacker_seat: Seat,
    defender_seat: Seat,
    defender_flags: &mut RoundFlags,
    log: &mut RoundLog,
) {
    let boost_diff = i64::from(attacker.boost) - i64::from(defender.boost);

    if boost_diff > 0 {
        defender.shield_break_counter = u32::try_from(boost_diff).unwrap_or(u32::MAX);
        defender_flags.shield_just_broke = true;
        log.main.push(RoundEvent::ShieldBroken {
            seat: defender_seat,
            counter: defender.shield_break_counter,
        });
        return;
    }

    // An attacker already holding priority blunts the gain by one.
    let dampening = i64::from(attacker.priority > 0);
    let target = u32::try_from((1 - boost_diff - dampening).max(0)).unwrap_or(u32::MAX);
    let previous = defender.priority;
    defender.priority = previous.max(target);
    defender_flags.priority_held = true;

    let event = if defender.priority > previous {
        RoundEvent::PriorityGained {
            seat: defender_seat,
            priority: defender.priority,
        }
    } else if previous > 0 {
        RoundEvent::PriorityRetained {
            seat: defender_seat,
            priority: previous,
        }
    } else {
        RoundEvent::PriorityDenied {
            seat: defender_seat,
            attacker: attacker_seat,
        }
    };
    log.main.push(event);
}

fn sudden_death(hp: &mut SeatMap<i64>, log: &mut RoundLog) {
    let challenger = hp[Seat::Challenger];
    let challengee = hp[Seat::Challengee];
    if challenger > 0 || challengee > 0 {
        return;
    }

    if challenger == challengee {
        hp[Seat::Challenger] = i64::from(ENDURE_HP);
        hp[Seat::Challengee] = i64::from(ENDURE_HP);
        log.main.push(RoundEvent::Endured { hp: ENDURE_HP });
    } else {
        let winner = if challenger > challengee {
            Seat::Challenger
        } else {
            Seat::Challengee
        };
        log.main.push(RoundEvent::SuddenDeathVictory { winner });
    }
}

fn judge(hp: &SeatMap<i64>) -> RoundVerdict {
    let challenger = hp[Seat::Challenger];
    let challengee = hp[Seat::Challengee];

    if challenger > 0 && challengee > 0 {
        RoundVerdict::Continue
    } else if challenger > challengee {
        RoundVerdict::GameOver(GameResult::Winner(Seat::Challenger))
    } else if challengee > challenger {
        RoundVerdict::GameOver(GameResult::Winner(Seat::Challengee))
    } else {
        error!(
            challenger,
            challengee, "both players down on equal HP after sudden death; recording a draw"
        );
        RoundVerdict::GameOver(GameResult::Draw)
    }
}

fn end_phase(
    players: &mut SeatMap<Player>,
    actions: &SeatMap<Action>,
    flags: &SeatMap<RoundFlags>,
    verdict: RoundVerdict,
    log: &mut RoundLog,
) {
    let continuing = !verdict.is_game_over();

    for seat in Seat::BOTH {
        let player = &mut players[seat];

        if actions[seat] != Action::Boost && player.boost > 0 {
            player.boost = 0;
            if continuing {
                log.expiries.push(RoundEvent::BoostExpended { seat });
            }
        }

        if continuing && !flags[seat].priority_held && player.priority > 0 {
            player.priority -= 1;
            log.decays.push(RoundEvent::PriorityDecayed {
                seat,
                priority: player.priority,
            });
        }

        if continuing && player.shield_break_counter > 0 {
            if !flags[seat].shield_just_broke {
                player.shield_break_counter -= 1;
            }
            if player.shield_break_counter == 0 {
                log.shields.push(RoundEvent::ShieldRepaired { seat });
            } else {
                log.shields.push(RoundEvent::MendOdds {
                    seat,
                    one_in: player.shield_break_counter + 1,
                });
            }
        }

        player.set_draw_vote(false);
    }
}
