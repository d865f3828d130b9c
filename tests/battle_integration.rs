//! Battle system integration tests

use monster_arena::battle::ai::*;
use monster_arena::battle::*;
use monster_arena::core::config::{ArenaConfig, MatchRules};
use monster_arena::core::types::Side;
use monster_arena::monster::*;

fn seeded(seed: u64) -> ArenaConfig {
    ArenaConfig {
        seed: Some(seed),
        ..Default::default()
    }
}

fn new_machine(player: Archetype, opponent: Archetype, personality: Personality) -> BattleMachine {
    BattleMachine::new(
        MonsterInstance::from_archetype(player),
        MonsterInstance::from_archetype(opponent),
        personality,
        &MatchRules::default(),
    )
}

#[tokio::test]
async fn test_full_match_against_policy_opponent() {
    let mut machine = new_machine(Archetype::Striker, Archetype::Tank, Personality::Cautious);
    let mut engine = OpponentEngine::local(&seeded(42));

    // Intro is the first log entry
    assert!(machine.log().events[0].description.starts_with("You face CAUTIOUS Terra."));

    let mut player_moves = 0;
    while !machine.is_over() {
        match machine.phase() {
            BattlePhase::AwaitingPlayerInput => {
                let choice = if machine.player_cooldown("inferno_blast") == 0 {
                    "inferno_blast"
                } else {
                    "flame_rush"
                };
                assert!(matches!(machine.select_ability(choice), InputOutcome::Resolved(_)));
                player_moves += 1;
            }
            BattlePhase::AwaitingOpponentDecision => {
                let report = run_opponent_turn(&mut machine, &mut engine).await.unwrap();
                assert_eq!(report.side, Side::Opponent);
            }
            BattlePhase::RoundOver => {
                machine.conclude_round().unwrap();
            }
            phase => panic!("machine left in transient phase {:?}", phase),
        }
        assert!(player_moves < 200, "match did not finish");
    }

    let wins = machine.wins();
    assert!(wins.player == 2 || wins.opponent == 2);
    assert!(machine.summary().is_some());
    let last = machine.log().last().unwrap();
    assert!(matches!(last.event_type, BattleEventType::MatchEnded { .. }));
}

#[test]
fn test_locked_input_changes_nothing() {
    let mut machine = new_machine(Archetype::Speedster, Archetype::Striker, Personality::Aggressive);
    machine.select_ability("thunder_dash");
    assert_eq!(machine.opponent().hp, 80);

    for id in ["thunder_dash", "shock_wave", "nonsense"] {
        assert!(matches!(
            machine.select_ability(id),
            InputOutcome::Ignored(IgnoreReason::Locked)
        ));
    }
    assert_eq!(machine.opponent().hp, 80);
    assert_eq!(machine.player_cooldown("shock_wave"), 0);
    assert_eq!(machine.phase(), BattlePhase::AwaitingOpponentDecision);
}

#[test]
fn test_round_reset_restores_everything() {
    let mut machine = new_machine(Archetype::Striker, Archetype::Speedster, Personality::Adaptive);
    let mut engine = OpponentEngine::local(&seeded(7));

    // Blaze out-damages Volt; keep swinging until a round ends
    while machine.phase() != BattlePhase::RoundOver {
        let pick = if machine.player_cooldown("inferno_blast") == 0 {
            "inferno_blast"
        } else {
            "flame_rush"
        };
        machine.select_ability(pick);
        if machine.begin_opponent_turn() {
            let decision = engine.decide_locally(&machine.opponent_context().unwrap());
            machine.apply_opponent_decision(&decision).unwrap();
        }
    }

    let conclusion = machine.conclude_round().unwrap();
    assert!(matches!(conclusion, RoundConclusion::NextRound { round: 2, .. }));
    assert_eq!(machine.player().hp, machine.player().max_hp);
    assert_eq!(machine.opponent().hp, machine.opponent().max_hp);
    assert_eq!(machine.player().active_block, 0);
    assert_eq!(machine.opponent().active_block, 0);
    assert!(!machine.player().stunned && !machine.opponent().stunned);
    assert!(machine.player_cooldowns().all_ready());
    assert!(machine.opponent_cooldowns().all_ready());
    assert_eq!(machine.whose_turn(), Side::Player);
    assert!(!machine.is_input_locked());
    assert_eq!(machine.log().last().unwrap().description, "Next round begins!");
}

#[test]
fn test_tank_block_soaks_special() {
    let mut machine = new_machine(Archetype::Striker, Archetype::Tank, Personality::Cautious);

    machine.select_ability("flame_rush");
    assert_eq!(machine.opponent().hp, 95);

    machine.begin_opponent_turn();
    let shield = machine.opponent().ability("stone_shield").cloned().unwrap();
    let decision = Decision {
        ability: shield,
        narration: "Terra braces.".into(),
        reasoning: "test".into(),
        source: DecisionSource::Policy,
    };
    machine.apply_opponent_decision(&decision).unwrap();
    assert_eq!(machine.opponent().active_block, 30);

    let InputOutcome::Resolved(report) = machine.select_ability("inferno_blast") else {
        panic!("inferno blast should be ready");
    };
    assert_eq!(
        report.effect,
        MoveEffect::Hit(HitReport {
            incoming: 40,
            absorbed: 30,
            hp_lost: 10
        })
    );
    assert_eq!(machine.opponent().hp, 85);
    assert_eq!(machine.opponent().active_block, 0);
}

#[test]
fn test_rolled_personality_follows_weights() {
    let mut config = seeded(1);
    config.personalities.aggressive = 0.0;
    config.personalities.cautious = 1.0;
    config.personalities.adaptive = 0.0;
    let mut engine = OpponentEngine::local(&config);

    for _ in 0..20 {
        let machine = BattleMachine::with_rolled_personality(
            MonsterInstance::from_archetype(Archetype::Tank),
            MonsterInstance::from_archetype(Archetype::Speedster),
            &config,
            engine.rng(),
        );
        assert_eq!(machine.personality(), Personality::Cautious);
    }
}

#[tokio::test]
async fn test_ai_vs_ai_is_reproducible() {
    async fn play(seed: u64) -> (Option<Side>, u32, Vec<String>) {
        let mut machine = new_machine(Archetype::Tank, Archetype::Striker, Personality::Adaptive);
        let mut player = OpponentEngine::local(&seeded(seed));
        let mut opponent = OpponentEngine::local(&seeded(seed + 1));
        let winner = run_match(&mut machine, &mut player, Personality::Cautious, &mut opponent, 500).await;
        let lines = machine.log().iter().map(|e| e.description.clone()).collect();
        (winner, machine.turn_number(), lines)
    }

    let a = play(11).await;
    let b = play(11).await;
    assert!(a.0.is_some());
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_generated_monsters_fight() {
    let forge = LocalForge::with_seed(5);
    let player = generate_monster(&forge, Archetype::Speedster).await;
    let opponent = generate_monster(&forge, Archetype::Tank).await;
    assert!(player.generated && opponent.generated);

    let mut machine = BattleMachine::new(player, opponent, Personality::Aggressive, &MatchRules::default());
    let mut player_engine = OpponentEngine::local(&seeded(8));
    let mut opponent_engine = OpponentEngine::local(&seeded(9));
    let winner = run_match(
        &mut machine,
        &mut player_engine,
        Personality::Adaptive,
        &mut opponent_engine,
        1000,
    )
    .await;
    assert!(winner.is_some());
    assert_eq!(machine.match_winner(), winner);
}
