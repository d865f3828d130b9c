//! Per-side ability cooldowns

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::monster::catalog::AbilityDefinition;

/// Remaining turns per ability id; absent or 0 means ready
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CooldownTable {
    remaining: AHashMap<String, u32>,
}

impl CooldownTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remaining(&self, ability_id: &str) -> u32 {
        self.remaining.get(ability_id).copied().unwrap_or(0)
    }

    pub fn is_ready(&self, ability_id: &str) -> bool {
        self.remaining(ability_id) == 0
    }

    /// Put an ability on its declared cooldown right after use
    pub fn start(&mut self, ability: &AbilityDefinition) {
        self.remaining.insert(ability.id.clone(), ability.cooldown);
    }

    /// One turn passes for this side
    pub fn tick(&mut self) {
        for turns in self.remaining.values_mut() {
            *turns = turns.saturating_sub(1);
        }
    }

    pub fn clear(&mut self) {
        self.remaining.clear();
    }

    /// True when nothing is cooling down
    pub fn all_ready(&self) -> bool {
        self.remaining.values().all(|t| *t == 0)
    }
}
