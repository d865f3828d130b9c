//! Runtime monster state
//!
//! Built from a catalog template or a generated payload at battle start,
//! mutated only through move resolution, and reset in place between rounds.

use serde::{Deserialize, Serialize};

use crate::monster::catalog::{lookup_template, AbilityDefinition, Archetype, MonsterTemplate};
use crate::monster::generation::{backfill_abilities, GeneratedMonster};

/// Damage bookkeeping for a single hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitReport {
    /// Raw damage of the move
    pub incoming: u32,
    /// Portion soaked up by the active block
    pub absorbed: u32,
    /// HP actually lost
    pub hp_lost: u32,
}

/// A monster taking part in a battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterInstance {
    pub archetype: Archetype,
    pub name: String,
    pub max_hp: u32,
    pub hp: u32,
    /// Damage absorbed before HP loss
    pub active_block: u32,
    /// Reserved; cleared at round reset
    pub stunned: bool,
    pub color: u32,
    pub icon: String,
    pub abilities: Vec<AbilityDefinition>,
    /// Built from a generated payload rather than the plain template
    pub generated: bool,
}

impl MonsterInstance {
    /// Fresh instance from a catalog template
    pub fn from_template(template: &MonsterTemplate) -> Self {
        Self {
            archetype: template.archetype,
            name: template.name.clone(),
            max_hp: template.max_hp,
            hp: template.max_hp,
            active_block: 0,
            stunned: false,
            color: template.color,
            icon: template.icon.clone(),
            abilities: template.abilities.to_vec(),
            generated: false,
        }
    }

    pub fn from_archetype(archetype: Archetype) -> Self {
        Self::from_template(lookup_template(archetype))
    }

    /// Fresh instance from a generated payload
    ///
    /// Name, max HP and abilities come from the payload where present and
    /// valid; everything else (and anything invalid) comes from the
    /// archetype's template. Archetype, color and icon always come from the
    /// template.
    pub fn from_generated(archetype: Archetype, payload: &GeneratedMonster) -> Self {
        let template = lookup_template(archetype);

        let name = payload
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| template.name.clone());

        let max_hp = payload
            .max_hp
            .and_then(|hp| u32::try_from(hp).ok())
            .filter(|hp| *hp > 0)
            .unwrap_or(template.max_hp);

        let abilities = backfill_abilities(template, payload.abilities.as_deref());

        Self {
            archetype,
            name,
            max_hp,
            hp: max_hp,
            active_block: 0,
            stunned: false,
            color: template.color,
            icon: template.icon.clone(),
            abilities: abilities.to_vec(),
            generated: true,
        }
    }

    /// Restore round-start values without replacing the instance
    pub fn reset_for_new_round(&mut self) {
        self.hp = self.max_hp;
        self.active_block = 0;
        self.stunned = false;
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.hp as f32 / self.max_hp as f32
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    pub fn ability(&self, id: &str) -> Option<&AbilityDefinition> {
        self.abilities.iter().find(|a| a.id == id)
    }

    /// Find an ability by id, falling back to a case-insensitive display-name match
    pub fn find_ability(&self, reference: &str) -> Option<&AbilityDefinition> {
        let reference = reference.trim();
        self.ability(reference).or_else(|| {
            self.abilities
                .iter()
                .find(|a| a.name.eq_ignore_ascii_case(reference))
        })
    }

    /// Overwrite (not add to) the active block
    pub fn raise_block(&mut self, block: u32) {
        self.active_block = block;
    }

    /// Apply incoming damage through the active block
    pub fn take_hit(&mut self, damage: u32) -> HitReport {
        let absorbed = damage.min(self.active_block);
        self.active_block -= absorbed;
        let effective = damage - absorbed;
        let before = self.hp;
        self.hp = self.hp.saturating_sub(effective);
        HitReport {
            incoming: damage,
            absorbed,
            hp_lost: before - self.hp,
        }
    }
}
