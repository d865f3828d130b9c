//! Arena configuration with documented constants
//!
//! All tunable numbers for the opponent policies, personality assignment,
//! remote services and match rules are collected here. Every section is
//! optional in TOML; missing sections and fields fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{ArenaError, Result};

/// Tuning for the AGGRESSIVE policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggressiveTuning {
    /// Own HP fraction below which defending is considered at all
    pub low_hp_threshold: f32,
    /// Chance to defend once below `low_hp_threshold`
    pub defend_chance: f32,
    /// Damage at or above which a non-SPECIAL ability counts as a heavy hitter
    pub high_damage: u32,
}

impl Default for AggressiveTuning {
    fn default() -> Self {
        Self {
            low_hp_threshold: 0.25,
            defend_chance: 0.6,
            high_damage: 30,
        }
    }
}

/// Tuning for the CAUTIOUS policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CautiousTuning {
    /// Opponent HP fraction below which the policy goes for the kill
    pub finish_threshold: f32,
    /// Minimum damage for a finishing move
    pub finish_damage: u32,
    /// Own HP fraction below which defending is considered
    pub defend_threshold: f32,
    /// Chance to defend once below `defend_threshold`
    pub defend_chance: f32,
    /// Damage floor for the default offensive pick
    pub min_damage: u32,
}

impl Default for CautiousTuning {
    fn default() -> Self {
        Self {
            finish_threshold: 0.4,
            finish_damage: 30,
            defend_threshold: 0.5,
            defend_chance: 0.7,
            min_damage: 20,
        }
    }
}

/// Tuning for the ADAPTIVE policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveTuning {
    /// Own HP fraction below which aggression from the other side is answered with a block
    pub defend_threshold: f32,
    /// Chance to defend when the defend rule applies
    pub defend_chance: f32,
    /// Damage at or above which a move counts as a counter to a defensive opponent
    pub counter_damage: u32,
    /// Opponent HP fraction below which finishing moves are preferred
    pub finish_threshold: f32,
    /// Minimum damage for a finishing move
    pub finish_damage: u32,
    /// Damage window for the opening move when nothing has been observed yet
    pub opening_min_damage: u32,
    pub opening_max_damage: u32,
    /// Substrings of a move name that read as an attack
    pub aggressive_markers: Vec<String>,
    /// Substrings of a move name that read as a defence
    pub defensive_markers: Vec<String>,
}

impl Default for AdaptiveTuning {
    fn default() -> Self {
        Self {
            defend_threshold: 0.6,
            defend_chance: 0.6,
            counter_damage: 35,
            finish_threshold: 0.35,
            finish_damage: 25,
            opening_min_damage: 20,
            opening_max_damage: 30,
            aggressive_markers: ["Blast", "Rush", "Dash", "Strike", "Burst", "Smash"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            defensive_markers: ["Shield", "Block", "Wall", "Barrier", "Defense"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Per-personality policy tuning
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub aggressive: AggressiveTuning,
    pub cautious: CautiousTuning,
    pub adaptive: AdaptiveTuning,
}

/// Selection weights for assigning a personality at battle start
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityWeights {
    pub aggressive: f32,
    pub cautious: f32,
    pub adaptive: f32,
}

impl Default for PersonalityWeights {
    fn default() -> Self {
        Self {
            aggressive: 0.4,
            cautious: 0.3,
            adaptive: 0.3,
        }
    }
}

impl PersonalityWeights {
    pub fn total(&self) -> f32 {
        self.aggressive + self.cautious + self.adaptive
    }
}

/// Remote decision / generation service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// When false the opponent never leaves the local policy
    pub enabled: bool,
    pub decision_url: String,
    pub generation_url: String,
    /// Budget for a single remote call
    ///
    /// A decision that has not arrived within this window is abandoned and
    /// the local policy answers instead.
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            decision_url: "http://localhost:3001/api/opponent-move".into(),
            generation_url: "http://localhost:3001/api/generate-monster".into(),
            timeout_ms: 2500,
        }
    }
}

impl ServiceConfig {
    /// Apply environment overrides
    ///
    /// Optional: ARENA_SERVICE_URL (base URL, both endpoints are derived from it)
    /// Optional: ARENA_SERVICE_TIMEOUT_MS
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base) = std::env::var("ARENA_SERVICE_URL") {
            let base = base.trim_end_matches('/');
            self.decision_url = format!("{}/api/opponent-move", base);
            self.generation_url = format!("{}/api/generate-monster", base);
            self.enabled = true;
        }
        if let Some(ms) = std::env::var("ARENA_SERVICE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.timeout_ms = ms;
        }
        self
    }
}

/// Match structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    /// Round wins needed to take the match (2 = best of three)
    pub rounds_to_win: u32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self { rounds_to_win: 2 }
    }
}

/// Complete arena configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub policy: PolicyConfig,
    pub personalities: PersonalityWeights,
    pub service: ServiceConfig,
    pub match_rules: MatchRules,
    /// Seed for every random choice; entropy when absent
    pub seed: Option<u64>,
}

impl ArenaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from a TOML string and validate it
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: ArenaConfig =
            toml::from_str(content).map_err(|e| ArenaError::Config(e.to_string()))?;
        config.validate().map_err(ArenaError::Config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        let fractions = [
            ("aggressive.low_hp_threshold", self.policy.aggressive.low_hp_threshold),
            ("aggressive.defend_chance", self.policy.aggressive.defend_chance),
            ("cautious.finish_threshold", self.policy.cautious.finish_threshold),
            ("cautious.defend_threshold", self.policy.cautious.defend_threshold),
            ("cautious.defend_chance", self.policy.cautious.defend_chance),
            ("adaptive.defend_threshold", self.policy.adaptive.defend_threshold),
            ("adaptive.defend_chance", self.policy.adaptive.defend_chance),
            ("adaptive.finish_threshold", self.policy.adaptive.finish_threshold),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} ({}) must be within 0.0..=1.0", name, value));
            }
        }

        let weights = &self.personalities;
        if weights.aggressive < 0.0 || weights.cautious < 0.0 || weights.adaptive < 0.0 {
            return Err("Personality weights must not be negative".into());
        }
        if weights.total() <= 0.0 {
            return Err("Personality weights must sum to a positive value".into());
        }

        let adaptive = &self.policy.adaptive;
        if adaptive.opening_min_damage > adaptive.opening_max_damage {
            return Err(format!(
                "adaptive.opening_min_damage ({}) should be <= opening_max_damage ({})",
                adaptive.opening_min_damage, adaptive.opening_max_damage
            ));
        }

        if self.match_rules.rounds_to_win == 0 {
            return Err("match_rules.rounds_to_win must be at least 1".into());
        }

        if self.service.enabled && self.service.timeout_ms == 0 {
            return Err("service.timeout_ms must be positive when the service is enabled".into());
        }

        Ok(())
    }
}
