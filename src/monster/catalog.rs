//! Static monster catalog
//!
//! Three archetypes, each with a fixed two-ability kit. The table is built
//! once and handed out by shared reference; nothing mutates it afterwards.

use std::str::FromStr;
use std::sync::OnceLock;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::ArenaError;

/// Monster archetype tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Archetype {
    Striker,
    Tank,
    Speedster,
}

impl Archetype {
    pub const ALL: [Archetype; 3] = [Archetype::Striker, Archetype::Tank, Archetype::Speedster];

    pub fn tag(self) -> &'static str {
        match self {
            Archetype::Striker => "STRIKER",
            Archetype::Tank => "TANK",
            Archetype::Speedster => "SPEEDSTER",
        }
    }

    fn index(self) -> usize {
        match self {
            Archetype::Striker => 0,
            Archetype::Tank => 1,
            Archetype::Speedster => 2,
        }
    }
}

impl FromStr for Archetype {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STRIKER" => Ok(Archetype::Striker),
            "TANK" => Ok(Archetype::Tank),
            "SPEEDSTER" => Ok(Archetype::Speedster),
            _ => Err(ArenaError::UnknownArchetype(s.to_string())),
        }
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// What an ability does when used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AbilityKind {
    Offensive,
    Defensive,
    Special,
}

impl FromStr for AbilityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OFFENSIVE" => Ok(AbilityKind::Offensive),
            "DEFENSIVE" => Ok(AbilityKind::Defensive),
            "SPECIAL" => Ok(AbilityKind::Special),
            other => Err(format!("Unknown ability kind: {}", other)),
        }
    }
}

/// A usable move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityDefinition {
    /// Unique within one monster's kit
    pub id: String,
    pub name: String,
    /// 0 for pure defence
    pub damage: u32,
    /// Turns before the ability can be used again
    pub cooldown: u32,
    #[serde(rename = "type")]
    pub kind: AbilityKind,
    /// Damage absorbed when a DEFENSIVE ability is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<u32>,
    /// Reserved; carried but not consumed by resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stun: Option<u32>,
    pub description: String,
}

impl AbilityDefinition {
    pub fn offensive(id: &str, name: &str, damage: u32, cooldown: u32) -> Self {
        Self::attack(id, name, damage, cooldown, AbilityKind::Offensive)
    }

    pub fn special(id: &str, name: &str, damage: u32, cooldown: u32) -> Self {
        Self::attack(id, name, damage, cooldown, AbilityKind::Special)
    }

    pub fn defensive(id: &str, name: &str, block: u32, cooldown: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            damage: 0,
            cooldown,
            kind: AbilityKind::Defensive,
            block: Some(block),
            stun: None,
            description: format!("Block {} damage", block),
        }
    }

    fn attack(id: &str, name: &str, damage: u32, cooldown: u32, kind: AbilityKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            damage,
            cooldown,
            kind,
            block: None,
            stun: None,
            description: format!("{} damage", damage),
        }
    }

    pub fn with_stun(mut self, turns: u32) -> Self {
        self.stun = Some(turns);
        self.description = format!("{} + stun", self.description);
        self
    }

    pub fn is_defensive(&self) -> bool {
        self.kind == AbilityKind::Defensive
    }

    /// Block applied on use, only for DEFENSIVE abilities that declare one
    pub fn shield(&self) -> Option<u32> {
        if self.is_defensive() {
            self.block
        } else {
            None
        }
    }
}

/// Immutable archetype definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    #[serde(rename = "type")]
    pub archetype: Archetype,
    pub name: String,
    #[serde(rename = "maxHP")]
    pub max_hp: u32,
    pub color: u32,
    pub icon: String,
    pub abilities: [AbilityDefinition; 2],
}

static CATALOG: OnceLock<[MonsterTemplate; 3]> = OnceLock::new();

fn build_catalog() -> [MonsterTemplate; 3] {
    [
        MonsterTemplate {
            archetype: Archetype::Striker,
            name: "Blaze".into(),
            max_hp: 100,
            color: 0xff4444,
            icon: "🔥".into(),
            abilities: [
                AbilityDefinition::offensive("flame_rush", "Flame Rush", 25, 1),
                AbilityDefinition::special("inferno_blast", "Inferno Blast", 40, 2),
            ],
        },
        MonsterTemplate {
            archetype: Archetype::Tank,
            name: "Terra".into(),
            max_hp: 120,
            color: 0x888888,
            icon: "🛡️".into(),
            abilities: [
                AbilityDefinition::defensive("stone_shield", "Stone Shield", 30, 1),
                AbilityDefinition::offensive("earthquake", "Earthquake", 30, 2),
            ],
        },
        MonsterTemplate {
            archetype: Archetype::Speedster,
            name: "Volt".into(),
            max_hp: 80,
            color: 0xffff44,
            icon: "⚡".into(),
            abilities: [
                AbilityDefinition::offensive("thunder_dash", "Thunder Dash", 20, 0),
                AbilityDefinition::special("shock_wave", "Shock Wave", 35, 3).with_stun(1),
            ],
        },
    ]
}

/// All catalog templates in archetype order
pub fn catalog() -> &'static [MonsterTemplate; 3] {
    CATALOG.get_or_init(build_catalog)
}

/// Template for an archetype; total over the enum
pub fn lookup_template(archetype: Archetype) -> &'static MonsterTemplate {
    &catalog()[archetype.index()]
}

/// Template for a textual archetype tag
pub fn lookup_template_by_tag(tag: &str) -> Result<&'static MonsterTemplate, ArenaError> {
    tag.parse::<Archetype>().map(lookup_template)
}

/// Random opponent archetype, never the player's own
pub fn pick_opponent_archetype<R: Rng + ?Sized>(rng: &mut R, player: Archetype) -> Archetype {
    let others: Vec<Archetype> = Archetype::ALL.into_iter().filter(|&a| a != player).collect();
    others.choose(rng).copied().unwrap_or(player)
}
