//! Move resolution
//!
//! A defensive move with a shield overwrites the attacker's block. Anything
//! else hits the defender, with the defender's block absorbing first.

use serde::{Deserialize, Serialize};

use crate::monster::catalog::AbilityDefinition;
use crate::monster::instance::{HitReport, MonsterInstance};

/// What a resolved move did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveEffect {
    /// Attacker's block set to `amount`
    Block { amount: u32 },
    Hit(HitReport),
}

impl MoveEffect {
    pub fn hp_lost(&self) -> u32 {
        match self {
            MoveEffect::Block { .. } => 0,
            MoveEffect::Hit(report) => report.hp_lost,
        }
    }
}

/// Apply one ability from `attacker` to `defender`
pub fn apply_move(
    attacker: &mut MonsterInstance,
    defender: &mut MonsterInstance,
    ability: &AbilityDefinition,
) -> MoveEffect {
    if let Some(amount) = ability.shield() {
        attacker.raise_block(amount);
        return MoveEffect::Block { amount };
    }
    MoveEffect::Hit(defender.take_hit(ability.damage))
}

/// One-line description of a resolved move
pub fn describe(actor: &str, ability: &AbilityDefinition, effect: &MoveEffect) -> String {
    match effect {
        MoveEffect::Block { amount } => {
            format!("{} used {} and raised a {} point block", actor, ability.name, amount)
        }
        MoveEffect::Hit(report) if report.absorbed > 0 => format!(
            "{} used {}: {} damage, {} blocked",
            actor, ability.name, report.hp_lost, report.absorbed
        ),
        MoveEffect::Hit(report) => {
            format!("{} used {}: {} damage", actor, ability.name, report.hp_lost)
        }
    }
}
