//! Decision service gateway
//!
//! Adapters between the battle and the remote decision service.
//! Defines the request the service receives (DecisionRequest) and the
//! response it must send back (DecisionResponse), and validates the latter
//! against the acting monster's kit.

use serde::{Deserialize, Serialize};

use crate::battle::ai::decision_context::DecisionContext;
use crate::battle::ai::personality::Personality;
use crate::core::error::{ArenaError, Result};
use crate::core::types::TurnNumber;
use crate::monster::catalog::{AbilityDefinition, Archetype};

// =========================================================================
//  INPUT SCHEMA (battle -> service)
// =========================================================================

/// Serialized decision context
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    /// Acting monster's archetype
    pub opponent_monster: Archetype,
    pub opponent_personality: Personality,
    #[serde(rename = "opponentHP")]
    pub opponent_hp: u32,
    /// Opposing monster's archetype
    pub player_monster: Archetype,
    #[serde(rename = "playerHP")]
    pub player_hp: u32,
    pub player_last_move: Option<String>,
    pub turn_number: TurnNumber,
    pub available_abilities: Vec<AbilityStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityStatus {
    pub id: String,
    pub name: String,
    /// Remaining turns, 0 = ready
    pub cooldown: u32,
}

impl DecisionRequest {
    pub fn from_context(ctx: &DecisionContext<'_>) -> Self {
        Self {
            opponent_monster: ctx.acting.archetype,
            opponent_personality: ctx.personality,
            opponent_hp: ctx.acting.hp,
            player_monster: ctx.opposing.archetype,
            player_hp: ctx.opposing.hp,
            player_last_move: ctx.last_opposing_move.map(str::to_string),
            turn_number: ctx.turn_number,
            available_abilities: ctx
                .abilities()
                .iter()
                .map(|a| AbilityStatus {
                    id: a.id.clone(),
                    name: a.name.clone(),
                    cooldown: ctx.cooldowns.remaining(&a.id),
                })
                .collect(),
        }
    }
}

// =========================================================================
//  OUTPUT SCHEMA (service -> battle)
// =========================================================================

/// How the service may name its chosen ability
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AbilityReference {
    /// Bare id or display name
    Named(String),
    /// Ability object (only id / name are read)
    Detailed {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

/// The expected JSON body from the decision service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResponse {
    #[serde(default)]
    pub ability: Option<AbilityReference>,
    #[serde(default)]
    pub narration: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// A validated remote decision
#[derive(Debug, Clone)]
pub struct RemoteDecision {
    pub ability: AbilityDefinition,
    pub narration: String,
    pub reasoning: String,
}

fn required_text(value: Option<String>, field: &str) -> Result<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ArenaError::MalformedResponse(format!("missing {}", field)))
}

impl DecisionResponse {
    /// Resolve the response against the acting monster's kit
    ///
    /// Fails if the ability is unknown, still cooling down, or if narration
    /// or reasoning is missing.
    pub fn validate(self, ctx: &DecisionContext<'_>) -> Result<RemoteDecision> {
        let candidates: Vec<String> = match self.ability {
            Some(AbilityReference::Named(reference)) => vec![reference],
            Some(AbilityReference::Detailed { id, name }) => id.into_iter().chain(name).collect(),
            None => Vec::new(),
        };

        let ability = candidates
            .iter()
            .find_map(|reference| ctx.acting.find_ability(reference))
            .ok_or_else(|| {
                ArenaError::MalformedResponse(format!("unknown ability {:?}", candidates))
            })?;

        let remaining = ctx.cooldowns.remaining(&ability.id);
        if remaining > 0 {
            return Err(ArenaError::MalformedResponse(format!(
                "{} still cooling down ({} turns)",
                ability.id, remaining
            )));
        }

        Ok(RemoteDecision {
            ability: ability.clone(),
            narration: required_text(self.narration, "narration")?,
            reasoning: required_text(self.reasoning, "reasoning")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::cooldown::CooldownTable;
    use crate::monster::instance::MonsterInstance;

    fn fixtures() -> (MonsterInstance, MonsterInstance, CooldownTable) {
        (
            MonsterInstance::from_archetype(Archetype::Tank),
            MonsterInstance::from_archetype(Archetype::Striker),
            CooldownTable::new(),
        )
    }

    #[test]
    fn test_request_shape() {
        let (tank, mut striker, mut cooldowns) = fixtures();
        striker.hp = 75;
        cooldowns.start(&tank.abilities[1]);
        let ctx = DecisionContext::new(
            &tank,
            &striker,
            Personality::Adaptive,
            &cooldowns,
            Some("Flame Rush"),
            3,
        );
        let json = serde_json::to_value(DecisionRequest::from_context(&ctx)).unwrap();
        assert_eq!(json["opponentMonster"], "TANK");
        assert_eq!(json["opponentPersonality"], "ADAPTIVE");
        assert_eq!(json["opponentHP"], 120);
        assert_eq!(json["playerMonster"], "STRIKER");
        assert_eq!(json["playerHP"], 75);
        assert_eq!(json["playerLastMove"], "Flame Rush");
        assert_eq!(json["turnNumber"], 3);
        assert_eq!(json["availableAbilities"][1]["name"], "Earthquake");
        assert_eq!(json["availableAbilities"][1]["cooldown"], 2);
    }

    #[test]
    fn test_response_by_name() {
        let (tank, striker, cooldowns) = fixtures();
        let ctx = DecisionContext::new(&tank, &striker, Personality::Cautious, &cooldowns, None, 1);
        let response: DecisionResponse = serde_json::from_str(
            r#"{"ability": "Stone Shield", "narration": "Terra hunkers down.", "reasoning": "bracing"}"#,
        )
        .unwrap();
        let decision = response.validate(&ctx).unwrap();
        assert_eq!(decision.ability.id, "stone_shield");
        assert_eq!(decision.narration, "Terra hunkers down.");
    }

    #[test]
    fn test_response_by_object() {
        let (tank, striker, cooldowns) = fixtures();
        let ctx = DecisionContext::new(&tank, &striker, Personality::Cautious, &cooldowns, None, 1);
        let response: DecisionResponse = serde_json::from_str(
            r#"{"ability": {"id": "earthquake", "damage": 30}, "narration": "Rumble.", "reasoning": "pressure"}"#,
        )
        .unwrap();
        assert_eq!(response.validate(&ctx).unwrap().ability.name, "Earthquake");
    }

    #[test]
    fn test_response_unknown_ability_rejected() {
        let (tank, striker, cooldowns) = fixtures();
        let ctx = DecisionContext::new(&tank, &striker, Personality::Cautious, &cooldowns, None, 1);
        let response: DecisionResponse = serde_json::from_str(
            r#"{"ability": "Hyper Beam", "narration": "x", "reasoning": "y"}"#,
        )
        .unwrap();
        assert!(matches!(
            response.validate(&ctx),
            Err(ArenaError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_response_on_cooldown_rejected() {
        let (tank, striker, mut cooldowns) = fixtures();
        cooldowns.start(&tank.abilities[1]);
        let ctx = DecisionContext::new(&tank, &striker, Personality::Cautious, &cooldowns, None, 1);
        let response: DecisionResponse = serde_json::from_str(
            r#"{"ability": "earthquake", "narration": "x", "reasoning": "y"}"#,
        )
        .unwrap();
        assert!(response.validate(&ctx).is_err());
    }

    #[test]
    fn test_response_missing_narration_rejected() {
        let (tank, striker, cooldowns) = fixtures();
        let ctx = DecisionContext::new(&tank, &striker, Personality::Cautious, &cooldowns, None, 1);
        let response: DecisionResponse =
            serde_json::from_str(r#"{"ability": "earthquake", "narration": "  "}"#).unwrap();
        assert!(response.validate(&ctx).is_err());
    }
}
