//! Battle system - turn-based monster duels, best of three rounds
//!
//! The machine owns all mutable battle state. The opponent engine only ever
//! sees a borrowed DecisionContext and answers with a Decision.

pub mod ai;
pub mod cooldown;
pub mod events;
pub mod machine;
pub mod resolution;
pub mod turn;

// Re-exports for convenient access
pub use cooldown::CooldownTable;
pub use events::{BattleEvent, BattleEventLog, BattleEventType};
pub use machine::{
    cooldown_label, BattleMachine, BattlePhase, IgnoreReason, InputOutcome, MoveReport,
    RoundConclusion, RoundWins,
};
pub use resolution::{apply_move, MoveEffect};
pub use turn::{run_match, run_opponent_turn, run_player_turn};
