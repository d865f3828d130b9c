//! Monster catalog, runtime instances and generated variants

pub mod catalog;
pub mod generation;
pub mod instance;

pub use catalog::{
    catalog, lookup_template, lookup_template_by_tag, pick_opponent_archetype, AbilityDefinition,
    AbilityKind, Archetype, MonsterTemplate,
};
pub use generation::{
    backfill_abilities, generate_monster, GeneratedAbility, GeneratedMonster, GenerationRequest,
    LocalForge,
};
pub use instance::{HitReport, MonsterInstance};
