//! Async turn drivers
//!
//! Glue between the state machine and the opponent engine. The machine
//! itself never awaits; these helpers do the one await per turn.

use crate::battle::ai::opponent::{DecisionSource, OpponentEngine};
use crate::battle::ai::personality::Personality;
use crate::battle::machine::{BattleMachine, BattlePhase, InputOutcome, MoveReport, RoundConclusion};
use crate::core::types::Side;
use crate::service::decision::DecisionService;

/// Begin the opponent turn, ask the engine, resolve the answer
///
/// Returns None when the machine is not waiting on the opponent.
pub async fn run_opponent_turn<S: DecisionService>(
    machine: &mut BattleMachine,
    engine: &mut OpponentEngine<S>,
) -> Option<MoveReport> {
    if !machine.begin_opponent_turn() {
        return None;
    }
    let decision = {
        let ctx = machine.opponent_context()?;
        engine.decide_move(&ctx).await
    };
    machine.apply_opponent_decision(&decision)
}

/// Let an engine play the player's side for one turn
///
/// Passes the turn when nothing is ready. Returns None if no move was made.
pub async fn run_player_turn<S: DecisionService>(
    machine: &mut BattleMachine,
    engine: &mut OpponentEngine<S>,
    personality: Personality,
) -> Option<MoveReport> {
    let decision = {
        let ctx = machine.player_context(personality)?;
        engine.decide_move(&ctx).await
    };
    if decision.source == DecisionSource::Waiting {
        machine.skip_turn();
        return None;
    }
    match machine.select_ability(&decision.ability.id) {
        InputOutcome::Resolved(report) => Some(report),
        InputOutcome::Ignored(reason) => {
            tracing::warn!(?reason, ability = %decision.ability.id, "Player-side decision ignored");
            None
        }
    }
}

/// Play a whole match with both sides driven by engines
///
/// Gives up (None) after `turn_limit` opponent turns or if a side cannot
/// make progress.
pub async fn run_match<P: DecisionService, O: DecisionService>(
    machine: &mut BattleMachine,
    player: &mut OpponentEngine<P>,
    player_personality: Personality,
    opponent: &mut OpponentEngine<O>,
    turn_limit: u32,
) -> Option<Side> {
    while !machine.is_over() {
        if machine.turn_number() > turn_limit {
            tracing::warn!(turn_limit, "Match abandoned at turn limit");
            return None;
        }
        match machine.phase() {
            BattlePhase::AwaitingPlayerInput => {
                run_player_turn(machine, player, player_personality).await;
                if machine.phase() == BattlePhase::AwaitingPlayerInput {
                    return None;
                }
            }
            BattlePhase::AwaitingOpponentDecision => {
                if run_opponent_turn(machine, opponent).await.is_none() {
                    return None;
                }
            }
            BattlePhase::RoundOver => {
                if let Some(RoundConclusion::NextRound { winner, round }) = machine.conclude_round() {
                    tracing::debug!(%winner, round, "Next round");
                }
            }
            BattlePhase::ResolvingPlayerMove
            | BattlePhase::ResolvingOpponentMove
            | BattlePhase::MatchOver => return machine.match_winner(),
        }
    }
    machine.match_winner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{ArenaConfig, MatchRules};
    use crate::monster::catalog::Archetype;
    use crate::monster::instance::MonsterInstance;

    fn config(seed: u64) -> ArenaConfig {
        ArenaConfig {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_opponent_turn_resolves() {
        let mut machine = BattleMachine::new(
            MonsterInstance::from_archetype(Archetype::Striker),
            MonsterInstance::from_archetype(Archetype::Tank),
            Personality::Cautious,
            &MatchRules::default(),
        );
        let mut engine = OpponentEngine::local(&config(9));

        assert!(run_opponent_turn(&mut machine, &mut engine).await.is_none());

        machine.select_ability("flame_rush");
        let report = run_opponent_turn(&mut machine, &mut engine).await.unwrap();
        assert_eq!(report.side, Side::Opponent);
        assert_eq!(machine.phase(), BattlePhase::AwaitingPlayerInput);
        assert_eq!(machine.turn_number(), 1);
        assert!(!machine.is_input_locked());
    }

    #[tokio::test]
    async fn test_full_match_terminates() {
        for seed in 0..20 {
            let cfg = config(seed);
            let mut machine = BattleMachine::new(
                MonsterInstance::from_archetype(Archetype::ALL[(seed % 3) as usize]),
                MonsterInstance::from_archetype(Archetype::ALL[((seed + 1) % 3) as usize]),
                Personality::ALL[(seed % 3) as usize],
                &cfg.match_rules,
            );
            let mut player = OpponentEngine::local(&config(seed + 1000));
            let mut opponent = OpponentEngine::local(&cfg);

            let winner = run_match(&mut machine, &mut player, Personality::Aggressive, &mut opponent, 500)
                .await
                .unwrap();
            assert!(machine.is_over());
            assert_eq!(machine.wins().get(winner), 2);
            assert!(machine.wins().get(winner.other()) < 2);
        }
    }
}
