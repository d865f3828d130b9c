//! Generated monsters
//!
//! A generated monster arrives as a loosely-typed payload (from the remote
//! generation service or the offline forge). Everything in it is optional;
//! missing or invalid fields are backfilled from the archetype's template
//! and a total failure falls back to the template unmodified.

use std::sync::Mutex;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{ArenaError, Result};
use crate::monster::catalog::{AbilityDefinition, AbilityKind, Archetype, MonsterTemplate};
use crate::monster::instance::MonsterInstance;
use crate::service::generation::MonsterService;

/// Request body for the generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(rename = "monsterType")]
    pub monster_type: Archetype,
}

/// Monster payload as returned by a generator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedMonster {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "maxHP")]
    pub max_hp: Option<i64>,
    #[serde(default)]
    pub abilities: Option<Vec<GeneratedAbility>>,
}

/// Ability payload as returned by a generator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedAbility {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub damage: Option<i64>,
    #[serde(default)]
    pub cooldown: Option<i64>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub block: Option<i64>,
    #[serde(default)]
    pub stun: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

fn non_negative(value: Option<i64>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// "Magma Cannon" -> "magma_cannon"
pub fn ability_slug(name: &str) -> String {
    name.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

fn describe(kind: AbilityKind, damage: u32, block: Option<u32>, stun: Option<u32>) -> String {
    let mut text = match (kind, block) {
        (AbilityKind::Defensive, Some(block)) => format!("Block {} damage", block),
        _ => format!("{} damage", damage),
    };
    if stun.is_some() {
        text.push_str(" + stun");
    }
    text
}

fn backfill_ability(fallback: &AbilityDefinition, raw: &GeneratedAbility) -> AbilityDefinition {
    let name = non_blank(raw.name.as_deref());
    let id = non_blank(raw.id.as_deref())
        .or_else(|| name.as_deref().map(ability_slug))
        .unwrap_or_else(|| fallback.id.clone());
    let name = name.unwrap_or_else(|| fallback.name.clone());

    let kind = raw
        .kind
        .as_deref()
        .and_then(|k| k.parse::<AbilityKind>().ok())
        .unwrap_or(fallback.kind);
    let damage = non_negative(raw.damage).unwrap_or(fallback.damage);
    let cooldown = non_negative(raw.cooldown).unwrap_or(fallback.cooldown);

    let block = match kind {
        AbilityKind::Defensive => non_negative(raw.block).or(fallback.shield()),
        _ => None,
    };
    let stun = non_negative(raw.stun).filter(|s| *s > 0);

    let description = non_blank(raw.description.as_deref())
        .unwrap_or_else(|| describe(kind, damage, block, stun));

    AbilityDefinition {
        id,
        name,
        damage,
        cooldown,
        kind,
        block,
        stun,
        description,
    }
}

/// Merge generated abilities with the template's kit
///
/// Anything other than exactly two abilities keeps the template kit. With two,
/// each field is validated and backfilled from the template ability in the
/// same slot; a duplicate id on the second slot gets a suffix.
pub fn backfill_abilities(
    template: &MonsterTemplate,
    generated: Option<&[GeneratedAbility]>,
) -> [AbilityDefinition; 2] {
    let raw = match generated {
        Some(raw) if raw.len() == 2 => raw,
        _ => return template.abilities.clone(),
    };

    let first = backfill_ability(&template.abilities[0], &raw[0]);
    let mut second = backfill_ability(&template.abilities[1], &raw[1]);
    if second.id == first.id {
        second.id = format!("{}_2", second.id);
    }
    [first, second]
}

/// Build an opponent, asking the generator first and falling back to the template
pub async fn generate_monster<S: MonsterService>(service: &S, archetype: Archetype) -> MonsterInstance {
    match service.generate(archetype).await {
        Ok(payload) => {
            let monster = MonsterInstance::from_generated(archetype, &payload);
            tracing::info!(
                archetype = %archetype,
                name = %monster.name,
                max_hp = monster.max_hp,
                "Generated opponent"
            );
            monster
        }
        Err(e) => {
            tracing::warn!(archetype = %archetype, error = %e, "Monster generation failed, using template");
            MonsterInstance::from_archetype(archetype)
        }
    }
}

// =========================================================================
//  OFFLINE FORGE
// =========================================================================

const STRIKER_NAMES: [&str; 5] = ["Blazefang", "Pyrowing", "Infernox", "Flameclaw", "Emberax"];
const TANK_NAMES: [&str; 5] = ["Stoneguard", "Terravolt", "Rockshield", "Granithor", "Boulderax"];
const SPEEDSTER_NAMES: [&str; 5] = ["Voltstream", "Sparkdash", "Thunderpaw", "Zapster", "Electrixx"];

const STRIKER_MOVES: [[&str; 4]; 2] = [
    ["Flame Rush", "Fire Blast", "Ember Strike", "Blaze Kick"],
    ["Inferno Burst", "Magma Cannon", "Heat Wave", "Dragon Rage"],
];
const TANK_MOVES: [[&str; 4]; 2] = [
    ["Rock Shield", "Stone Wall", "Iron Defense", "Barrier"],
    ["Earthquake", "Boulder Smash", "Tremor Strike", "Ground Pound"],
];
const SPEEDSTER_MOVES: [[&str; 4]; 2] = [
    ["Thunder Dash", "Quick Attack", "Volt Rush", "Speed Burst"],
    ["Shock Wave", "Lightning Bolt", "Thunder Strike", "Zap Cannon"],
];

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, options: &[&'a str]) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

/// Offline monster generator with archetype-flavoured names and stats
pub struct LocalForge {
    rng: Mutex<ChaCha8Rng>,
}

impl LocalForge {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Roll a complete payload
    pub fn forge<R: Rng + ?Sized>(rng: &mut R, archetype: Archetype) -> GeneratedMonster {
        let (names, moves, hp_range) = match archetype {
            Archetype::Striker => (&STRIKER_NAMES, &STRIKER_MOVES, 90..=110),
            Archetype::Tank => (&TANK_NAMES, &TANK_MOVES, 110..=130),
            Archetype::Speedster => (&SPEEDSTER_NAMES, &SPEEDSTER_MOVES, 70..=90),
        };

        let light_name = pick(rng, &moves[0]);
        let light = if archetype == Archetype::Tank && rng.gen_bool(0.5) {
            GeneratedAbility {
                id: Some(ability_slug(light_name)),
                name: Some(light_name.into()),
                damage: Some(0),
                cooldown: Some(rng.gen_range(0..=1)),
                kind: Some("DEFENSIVE".into()),
                block: Some(30),
                stun: None,
                description: Some("Block 30 damage".into()),
            }
        } else {
            let damage = rng.gen_range(20..=30);
            GeneratedAbility {
                id: Some(ability_slug(light_name)),
                name: Some(light_name.into()),
                damage: Some(damage),
                cooldown: Some(rng.gen_range(0..=1)),
                kind: Some("OFFENSIVE".into()),
                block: None,
                stun: None,
                description: Some(format!("{} damage", damage)),
            }
        };

        let heavy_name = pick(rng, &moves[1]);
        let heavy_damage = rng.gen_range(30..=45);
        let heavy = GeneratedAbility {
            id: Some(ability_slug(heavy_name)),
            name: Some(heavy_name.into()),
            damage: Some(heavy_damage),
            cooldown: Some(rng.gen_range(1..=3)),
            kind: Some("SPECIAL".into()),
            block: None,
            stun: None,
            description: Some(format!("{} damage", heavy_damage)),
        };

        GeneratedMonster {
            name: Some(pick(rng, names).into()),
            max_hp: Some(rng.gen_range(hp_range)),
            abilities: Some(vec![light, heavy]),
        }
    }
}

impl Default for LocalForge {
    fn default() -> Self {
        Self::new()
    }
}

impl MonsterService for LocalForge {
    async fn generate(&self, archetype: Archetype) -> Result<GeneratedMonster> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| ArenaError::Service("forge rng poisoned".into()))?;
        Ok(Self::forge(&mut *rng, archetype))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monster::catalog::lookup_template;

    fn ability(name: &str, damage: i64, kind: &str) -> GeneratedAbility {
        GeneratedAbility {
            name: Some(name.into()),
            damage: Some(damage),
            cooldown: Some(1),
            kind: Some(kind.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_slug() {
        assert_eq!(ability_slug("Magma Cannon"), "magma_cannon");
        assert_eq!(ability_slug("  Zap   Cannon "), "zap_cannon");
    }

    #[test]
    fn test_wrong_count_keeps_template_kit() {
        let template = lookup_template(Archetype::Striker);
        let one = vec![ability("Heat Wave", 33, "SPECIAL")];
        assert_eq!(backfill_abilities(template, Some(&one)), template.abilities);
        assert_eq!(backfill_abilities(template, None), template.abilities);
    }

    #[test]
    fn test_fields_backfilled_per_slot() {
        let template = lookup_template(Archetype::Tank);
        let raw = vec![
            GeneratedAbility {
                name: Some("Iron Defense".into()),
                kind: Some("DEFENSIVE".into()),
                cooldown: Some(-1),
                ..Default::default()
            },
            ability("Boulder Smash", 38, "nonsense"),
        ];
        let [first, second] = backfill_abilities(template, Some(&raw));

        assert_eq!(first.id, "iron_defense");
        assert_eq!(first.cooldown, 1);
        assert_eq!(first.block, Some(30));
        assert_eq!(first.description, "Block 30 damage");

        assert_eq!(second.damage, 38);
        assert_eq!(second.kind, AbilityKind::Offensive);
        assert_eq!(second.description, "38 damage");
    }

    #[test]
    fn test_duplicate_ids_are_separated() {
        let template = lookup_template(Archetype::Speedster);
        let raw = vec![
            ability("Volt Rush", 22, "OFFENSIVE"),
            ability("Volt Rush", 40, "SPECIAL"),
        ];
        let [first, second] = backfill_abilities(template, Some(&raw));
        assert_eq!(first.id, "volt_rush");
        assert_eq!(second.id, "volt_rush_2");
    }

    #[test]
    fn test_block_dropped_on_non_defensive() {
        let template = lookup_template(Archetype::Striker);
        let mut raw = vec![
            ability("Ember Strike", 24, "OFFENSIVE"),
            ability("Heat Wave", 31, "SPECIAL"),
        ];
        raw[0].block = Some(15);
        let [first, _] = backfill_abilities(template, Some(&raw));
        assert_eq!(first.block, None);
    }

    #[test]
    fn test_payload_parses_service_json() {
        let json = r#"{
            "name": "Pyrowing",
            "maxHP": 104,
            "abilities": [
                {"id": "fire_blast", "name": "Fire Blast", "damage": 26, "cooldown": 1, "type": "OFFENSIVE", "description": "26 damage"},
                {"id": "dragon_rage", "name": "Dragon Rage", "damage": 41, "cooldown": 2, "type": "SPECIAL", "description": "41 damage"}
            ]
        }"#;
        let payload: GeneratedMonster = serde_json::from_str(json).unwrap();
        let monster = MonsterInstance::from_generated(Archetype::Striker, &payload);
        assert_eq!(monster.name, "Pyrowing");
        assert_eq!(monster.max_hp, 104);
        assert_eq!(monster.abilities[1].name, "Dragon Rage");
        assert_eq!(monster.abilities[1].damage, 41);
    }

    #[test]
    fn test_forge_respects_archetype_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..50 {
            let payload = LocalForge::forge(&mut rng, Archetype::Speedster);
            let hp = payload.max_hp.unwrap();
            assert!((70..=90).contains(&hp));
            let abilities = payload.abilities.unwrap();
            assert_eq!(abilities.len(), 2);
            assert_eq!(abilities[1].kind.as_deref(), Some("SPECIAL"));
            let cooldown = abilities[1].cooldown.unwrap();
            assert!((1..=3).contains(&cooldown));
        }
    }

    #[test]
    fn test_forged_tank_defence_is_coherent() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let payload = LocalForge::forge(&mut rng, Archetype::Tank);
            let monster = MonsterInstance::from_generated(Archetype::Tank, &payload);
            let light = &monster.abilities[0];
            if light.is_defensive() {
                assert_eq!(light.damage, 0);
                assert_eq!(light.block, Some(30));
            } else {
                assert!((20..=30).contains(&light.damage));
            }
        }
    }

    fn template_payload(archetype: Archetype) -> GeneratedMonster {
        let template = lookup_template(archetype);
        GeneratedMonster {
            name: Some(template.name.clone()),
            max_hp: Some(template.max_hp as i64),
            abilities: Some(
                template
                    .abilities
                    .iter()
                    .map(|a| GeneratedAbility {
                        id: Some(a.id.clone()),
                        name: Some(a.name.clone()),
                        damage: Some(a.damage as i64),
                        cooldown: Some(a.cooldown as i64),
                        kind: serde_json::to_value(a.kind)
                            .ok()
                            .and_then(|v| v.as_str().map(str::to_string)),
                        block: a.block.map(i64::from),
                        stun: a.stun.map(i64::from),
                        description: Some(a.description.clone()),
                    })
                    .collect(),
            ),
        }
    }

    #[test]
    fn test_template_payload_round_trips_to_template_kit() {
        let payload = template_payload(Archetype::Tank);
        let monster = MonsterInstance::from_generated(Archetype::Tank, &payload);
        assert_eq!(monster.abilities, lookup_template(Archetype::Tank).abilities.to_vec());
    }

    struct BrokenService;

    impl MonsterService for BrokenService {
        async fn generate(&self, _archetype: Archetype) -> Result<GeneratedMonster> {
            Err(ArenaError::Service("503".into()))
        }
    }

    #[tokio::test]
    async fn test_generation_failure_returns_template() {
        let monster = generate_monster(&BrokenService, Archetype::Tank).await;
        assert_eq!(monster, MonsterInstance::from_archetype(Archetype::Tank));
    }

    #[tokio::test]
    async fn test_local_forge_generates() {
        let forge = LocalForge::with_seed(5);
        let monster = generate_monster(&forge, Archetype::Striker).await;
        assert!(monster.generated);
        assert!(STRIKER_NAMES.contains(&monster.name.as_str()));
    }
}
