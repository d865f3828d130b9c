//! Opponent personalities
//!
//! A personality is rolled once at battle start (weighted by config) and
//! governs every decision the opponent makes for the rest of the match.

use std::str::FromStr;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::PersonalityWeights;
use crate::core::error::ArenaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Personality {
    Aggressive,
    Cautious,
    Adaptive,
}

impl Personality {
    pub const ALL: [Personality; 3] = [
        Personality::Aggressive,
        Personality::Cautious,
        Personality::Adaptive,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Personality::Aggressive => "AGGRESSIVE",
            Personality::Cautious => "CAUTIOUS",
            Personality::Adaptive => "ADAPTIVE",
        }
    }

    pub fn weight(self, weights: &PersonalityWeights) -> f32 {
        match self {
            Personality::Aggressive => weights.aggressive,
            Personality::Cautious => weights.cautious,
            Personality::Adaptive => weights.adaptive,
        }
    }

    /// Weighted random pick; AGGRESSIVE if the weights are unusable
    pub fn roll<R: Rng + ?Sized>(rng: &mut R, weights: &PersonalityWeights) -> Self {
        let table = Self::ALL.map(|p| p.weight(weights).max(0.0));
        match WeightedIndex::new(table) {
            Ok(dist) => Self::ALL[dist.sample(rng)],
            Err(e) => {
                tracing::warn!(error = %e, "Unusable personality weights, defaulting to AGGRESSIVE");
                Personality::Aggressive
            }
        }
    }
}

impl FromStr for Personality {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AGGRESSIVE" => Ok(Personality::Aggressive),
            "CAUTIOUS" => Ok(Personality::Cautious),
            "ADAPTIVE" => Ok(Personality::Adaptive),
            _ => Err(ArenaError::UnknownPersonality(s.to_string())),
        }
    }
}

impl std::fmt::Display for Personality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
