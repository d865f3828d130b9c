//! Opponent decision engine
//!
//! Asks the remote decision service first (when one is configured) and
//! falls back to the personality policy on any failure. The fallback is
//! synchronous and always produces a decision, so an opponent turn never
//! stalls on the network.

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::battle::ai::decision_context::DecisionContext;
use crate::battle::ai::llm_gateway::DecisionRequest;
use crate::battle::ai::narration;
use crate::battle::ai::policy::{self, Situation};
use crate::core::config::{ArenaConfig, PolicyConfig};
use crate::core::error::{ArenaError, Result};
use crate::monster::catalog::AbilityDefinition;
use crate::service::client::ServiceClient;
use crate::service::decision::DecisionService;

/// Where a decision came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionSource {
    Remote,
    Policy,
    /// Nothing was ready; first ability with a waiting line
    Waiting,
}

/// A chosen move with its flavour text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub ability: AbilityDefinition,
    pub narration: String,
    pub reasoning: String,
    pub source: DecisionSource,
}

/// Opponent move selection
pub struct OpponentEngine<S = ServiceClient> {
    service: Option<S>,
    policy: PolicyConfig,
    timeout: Duration,
    rng: ChaCha8Rng,
}

fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

impl OpponentEngine<ServiceClient> {
    /// Policy-only engine; never touches the network
    pub fn local(config: &ArenaConfig) -> Self {
        Self {
            service: None,
            policy: config.policy.clone(),
            timeout: Duration::from_millis(config.service.timeout_ms),
            rng: seeded_rng(config.seed),
        }
    }

    /// Engine wired to the HTTP service when the config enables it
    pub fn from_config(config: &ArenaConfig) -> Result<Self> {
        let mut engine = Self::local(config);
        if config.service.enabled {
            engine.service = Some(ServiceClient::new(&config.service)?);
        }
        Ok(engine)
    }
}

impl<S: DecisionService> OpponentEngine<S> {
    /// Engine backed by an arbitrary decision service
    pub fn with_service(service: S, config: &ArenaConfig) -> Self {
        Self {
            service: Some(service),
            policy: config.policy.clone(),
            timeout: Duration::from_millis(config.service.timeout_ms),
            rng: seeded_rng(config.seed),
        }
    }

    /// Reseed for deterministic runs
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn has_remote(&self) -> bool {
        self.service.is_some()
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Pick the acting side's move
    ///
    /// Never returns an ability that is cooling down unless nothing at all
    /// is ready, in which case the first ability comes back with a waiting
    /// narration.
    pub async fn decide_move(&mut self, ctx: &DecisionContext<'_>) -> Decision {
        if let Some(service) = &self.service {
            match decide_remotely(service, self.timeout, ctx).await {
                Ok(decision) => {
                    tracing::debug!(ability = %decision.ability.id, "Remote decision accepted");
                    return decision;
                }
                Err(e) => {
                    tracing::warn!(error = %e, turn = ctx.turn_number, "Remote decision failed, using fallback");
                }
            }
        }
        self.decide_locally(ctx)
    }

    /// Rule-based decision from the personality policy
    pub fn decide_locally(&mut self, ctx: &DecisionContext<'_>) -> Decision {
        let ready = ctx.ready_abilities();
        let situation = Situation {
            acting_hp: ctx.acting_hp_fraction(),
            opposing_hp: ctx.opposing_hp_fraction(),
            last_opposing_move: ctx.last_opposing_move,
        };

        match policy::choose(ctx.personality, &ready, &situation, &self.policy, &mut self.rng) {
            Some(choice) => {
                tracing::debug!(
                    personality = %ctx.personality,
                    ability = %choice.ability.id,
                    rationale = ?choice.rationale,
                    "Policy decision"
                );
                Decision {
                    ability: choice.ability.clone(),
                    narration: narration::narrate(
                        &mut self.rng,
                        ctx.personality,
                        &ctx.acting.name,
                        choice.ability,
                    ),
                    reasoning: narration::reasoning(ctx.personality, choice.rationale, choice.ability),
                    source: DecisionSource::Policy,
                }
            }
            None => self.waiting_decision(ctx),
        }
    }

    fn waiting_decision(&self, ctx: &DecisionContext<'_>) -> Decision {
        tracing::warn!(monster = %ctx.acting.name, "No ability ready");
        let ability = ctx.abilities().first().cloned().unwrap_or_else(|| {
            AbilityDefinition::offensive("wait", "Wait", 0, 0)
        });
        Decision {
            ability,
            narration: narration::waiting_narration(&ctx.acting.name),
            reasoning: narration::WAITING_REASONING.to_string(),
            source: DecisionSource::Waiting,
        }
    }
}

async fn decide_remotely<S: DecisionService>(
    service: &S,
    timeout: Duration,
    ctx: &DecisionContext<'_>,
) -> Result<Decision> {
    let request = DecisionRequest::from_context(ctx);
    let response = tokio::time::timeout(timeout, service.request_decision(&request))
        .await
        .map_err(|_| ArenaError::Timeout(timeout.as_millis() as u64))??;
    let remote = response.validate(ctx)?;
    Ok(Decision {
        ability: remote.ability,
        narration: remote.narration,
        reasoning: remote.reasoning,
        source: DecisionSource::Remote,
    })
}
