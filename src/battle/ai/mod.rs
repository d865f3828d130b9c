//! Opponent AI for battle decision-making
//!
//! Architecture: remote service first, deterministic policy second
//! - Personality fixes the strategy for the whole match
//! - DecisionContext is the acting side's read-only view of the battle
//! - OpponentEngine tries the decision service, then falls back to policy

pub mod decision_context;
pub mod llm_gateway;
pub mod narration;
pub mod opponent;
pub mod personality;
pub mod policy;

pub use decision_context::DecisionContext;
pub use llm_gateway::{AbilityReference, AbilityStatus, DecisionRequest, DecisionResponse, RemoteDecision};
pub use opponent::{Decision, DecisionSource, OpponentEngine};
pub use personality::Personality;
pub use policy::{Choice, Rationale, Situation};
