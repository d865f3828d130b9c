//! Rule-based move selection
//!
//! Three strategies, one per personality. Each is a pure function of the
//! ready abilities, both HP fractions and the other side's last move name,
//! plus an injected RNG for tie-breaks and probability gates. Every random
//! pick is uniform over the qualifying subset and every gate is rolled fresh.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::ai::personality::Personality;
use crate::core::config::{AdaptiveTuning, AggressiveTuning, CautiousTuning, PolicyConfig};
use crate::monster::catalog::{AbilityDefinition, AbilityKind};

/// Why a strategy landed on its pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rationale {
    /// Low HP, chose to block
    DesperateDefense,
    /// SPECIAL or heavy hitter
    HeavyPressure,
    /// Nothing heavy was ready, highest damage instead
    RawDamage,
    /// Opponent low, going for the kill
    Finisher,
    /// Own HP under the caution line
    CarefulDefense,
    /// Ordinary attack above the damage floor
    SteadyOffense,
    /// First turn with nothing observed yet
    Opening,
    /// Answering an attack-named move with a block
    BraceAgainstAggression,
    /// Opponent just defended, hit hard
    PunishDefense,
    /// Default adaptive attack
    DefaultOffense,
    /// No category matched
    FirstReady,
}

/// A strategy's pick
#[derive(Debug, Clone, Copy)]
pub struct Choice<'a> {
    pub ability: &'a AbilityDefinition,
    pub rationale: Rationale,
}

/// Inputs shared by all strategies
#[derive(Debug, Clone, Copy)]
pub struct Situation<'s> {
    pub acting_hp: f32,
    pub opposing_hp: f32,
    pub last_opposing_move: Option<&'s str>,
}

fn roll<R: Rng + ?Sized>(rng: &mut R, chance: f32) -> bool {
    rng.gen::<f32>() < chance
}

fn pick_uniform<'a, R: Rng + ?Sized>(
    rng: &mut R,
    candidates: &[&'a AbilityDefinition],
) -> Option<&'a AbilityDefinition> {
    candidates.choose(rng).copied()
}

fn first_defensive<'a>(ready: &[&'a AbilityDefinition]) -> Option<&'a AbilityDefinition> {
    ready.iter().copied().find(|a| a.kind == AbilityKind::Defensive)
}

/// Highest damage, earliest wins ties
fn strongest<'a>(ready: &[&'a AbilityDefinition]) -> Option<&'a AbilityDefinition> {
    ready.iter().copied().fold(None, |best, a| match best {
        Some(b) if b.damage >= a.damage => Some(b),
        _ => Some(a),
    })
}

fn filtered<'a>(
    ready: &[&'a AbilityDefinition],
    keep: impl Fn(&AbilityDefinition) -> bool,
) -> Vec<&'a AbilityDefinition> {
    ready.iter().copied().filter(|a| keep(a)).collect()
}

/// Dispatch to the personality's strategy
///
/// None when `ready` is empty.
pub fn choose<'a, R: Rng + ?Sized>(
    personality: Personality,
    ready: &[&'a AbilityDefinition],
    situation: &Situation<'_>,
    tuning: &PolicyConfig,
    rng: &mut R,
) -> Option<Choice<'a>> {
    if ready.is_empty() {
        return None;
    }
    let choice = match personality {
        Personality::Aggressive => choose_aggressively(ready, situation, &tuning.aggressive, rng),
        Personality::Cautious => choose_cautiously(ready, situation, &tuning.cautious, rng),
        Personality::Adaptive => choose_adaptively(ready, situation, &tuning.adaptive, rng),
    };
    Some(choice)
}

pub fn choose_aggressively<'a, R: Rng + ?Sized>(
    ready: &[&'a AbilityDefinition],
    situation: &Situation<'_>,
    tuning: &AggressiveTuning,
    rng: &mut R,
) -> Choice<'a> {
    if situation.acting_hp < tuning.low_hp_threshold {
        if let Some(defensive) = first_defensive(ready) {
            if roll(rng, tuning.defend_chance) {
                return Choice {
                    ability: defensive,
                    rationale: Rationale::DesperateDefense,
                };
            }
        }
    }

    let heavy = filtered(ready, |a| {
        a.kind == AbilityKind::Special || (a.damage > 0 && a.damage >= tuning.high_damage)
    });
    if let Some(ability) = pick_uniform(rng, &heavy) {
        return Choice {
            ability,
            rationale: Rationale::HeavyPressure,
        };
    }

    match strongest(ready) {
        Some(ability) => Choice {
            ability,
            rationale: Rationale::RawDamage,
        },
        None => Choice {
            ability: ready[0],
            rationale: Rationale::FirstReady,
        },
    }
}

pub fn choose_cautiously<'a, R: Rng + ?Sized>(
    ready: &[&'a AbilityDefinition],
    situation: &Situation<'_>,
    tuning: &CautiousTuning,
    rng: &mut R,
) -> Choice<'a> {
    if situation.opposing_hp < tuning.finish_threshold {
        let finishers = filtered(ready, |a| a.damage > 0 && a.damage >= tuning.finish_damage);
        if let Some(ability) = pick_uniform(rng, &finishers) {
            return Choice {
                ability,
                rationale: Rationale::Finisher,
            };
        }
    }

    if situation.acting_hp < tuning.defend_threshold {
        if let Some(defensive) = first_defensive(ready) {
            if roll(rng, tuning.defend_chance) {
                return Choice {
                    ability: defensive,
                    rationale: Rationale::CarefulDefense,
                };
            }
        }
    }

    let offensive = filtered(ready, |a| {
        a.kind != AbilityKind::Defensive && a.damage > 0 && a.damage >= tuning.min_damage
    });
    if let Some(ability) = pick_uniform(rng, &offensive) {
        return Choice {
            ability,
            rationale: Rationale::SteadyOffense,
        };
    }

    Choice {
        ability: ready[0],
        rationale: Rationale::FirstReady,
    }
}

fn mentions_any(move_name: &str, markers: &[String]) -> bool {
    let name = move_name.to_lowercase();
    markers
        .iter()
        .any(|m| !m.is_empty() && name.contains(&m.to_lowercase()))
}

pub fn choose_adaptively<'a, R: Rng + ?Sized>(
    ready: &[&'a AbilityDefinition],
    situation: &Situation<'_>,
    tuning: &AdaptiveTuning,
    rng: &mut R,
) -> Choice<'a> {
    let last_move = match situation.last_opposing_move.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => {
            let moderate = filtered(ready, |a| {
                a.damage > 0
                    && a.damage >= tuning.opening_min_damage
                    && a.damage <= tuning.opening_max_damage
            });
            let ability = pick_uniform(rng, &moderate)
                .or_else(|| pick_uniform(rng, ready))
                .unwrap_or(ready[0]);
            return Choice {
                ability,
                rationale: Rationale::Opening,
            };
        }
    };

    if mentions_any(last_move, &tuning.aggressive_markers)
        && situation.acting_hp < tuning.defend_threshold
    {
        if let Some(defensive) = first_defensive(ready) {
            if roll(rng, tuning.defend_chance) {
                return Choice {
                    ability: defensive,
                    rationale: Rationale::BraceAgainstAggression,
                };
            }
        }
    }

    if mentions_any(last_move, &tuning.defensive_markers) {
        let counters = filtered(ready, |a| {
            a.kind == AbilityKind::Special || (a.damage > 0 && a.damage >= tuning.counter_damage)
        });
        if let Some(ability) = pick_uniform(rng, &counters) {
            return Choice {
                ability,
                rationale: Rationale::PunishDefense,
            };
        }
    }

    if situation.opposing_hp < tuning.finish_threshold {
        let finishers = filtered(ready, |a| a.damage > 0 && a.damage >= tuning.finish_damage);
        if let Some(ability) = pick_uniform(rng, &finishers) {
            return Choice {
                ability,
                rationale: Rationale::Finisher,
            };
        }
    }

    let offensive = filtered(ready, |a| a.kind != AbilityKind::Defensive && a.damage > 0);
    match strongest(&offensive) {
        Some(ability) => Choice {
            ability,
            rationale: Rationale::DefaultOffense,
        },
        None => Choice {
            ability: ready[0],
            rationale: Rationale::FirstReady,
        },
    }
}
