//! The acting side's view of the battle when it picks a move

use crate::battle::ai::personality::Personality;
use crate::battle::cooldown::CooldownTable;
use crate::core::types::TurnNumber;
use crate::monster::catalog::AbilityDefinition;
use crate::monster::instance::MonsterInstance;

/// Everything a policy may look at
///
/// The other side's cooldowns are not visible; the only signal
/// crossing sides is the name of the move the other side used last.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub acting: &'a MonsterInstance,
    pub opposing: &'a MonsterInstance,
    pub personality: Personality,
    pub cooldowns: &'a CooldownTable,
    /// Display name of the opposing side's most recent move
    pub last_opposing_move: Option<&'a str>,
    pub turn_number: TurnNumber,
}

impl<'a> DecisionContext<'a> {
    pub fn new(
        acting: &'a MonsterInstance,
        opposing: &'a MonsterInstance,
        personality: Personality,
        cooldowns: &'a CooldownTable,
        last_opposing_move: Option<&'a str>,
        turn_number: TurnNumber,
    ) -> Self {
        Self {
            acting,
            opposing,
            personality,
            cooldowns,
            last_opposing_move,
            turn_number,
        }
    }

    pub fn abilities(&self) -> &'a [AbilityDefinition] {
        &self.acting.abilities
    }

    /// Abilities with no remaining cooldown, in kit order
    pub fn ready_abilities(&self) -> Vec<&'a AbilityDefinition> {
        let cooldowns = self.cooldowns;
        self.abilities()
            .iter()
            .filter(|a| cooldowns.is_ready(&a.id))
            .collect()
    }

    pub fn acting_hp_fraction(&self) -> f32 {
        self.acting.hp_fraction()
    }

    pub fn opposing_hp_fraction(&self) -> f32 {
        self.opposing.hp_fraction()
    }
}
