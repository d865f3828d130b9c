//! Monster Arena - Entry Point
//!
//! Text-mode match against the AI opponent. Sets up the async runtime for
//! the optional decision/generation services and runs a stdin loop.

use monster_arena::battle::ai::opponent::OpponentEngine;
use monster_arena::battle::machine::{
    cooldown_label, BattleMachine, BattlePhase, IgnoreReason, InputOutcome,
};
use monster_arena::battle::turn::run_opponent_turn;
use monster_arena::core::config::ArenaConfig;
use monster_arena::core::error::Result;
use monster_arena::monster::catalog::{pick_opponent_archetype, Archetype};
use monster_arena::monster::generation::generate_monster;
use monster_arena::monster::instance::MonsterInstance;
use monster_arena::service::client::ServiceClient;

use std::io::{self, Write};
use std::path::Path;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("monster_arena=info")),
        )
        .init();

    let mut config = match std::env::var("ARENA_CONFIG") {
        Ok(path) => ArenaConfig::load(Path::new(&path))?,
        Err(_) => ArenaConfig::default(),
    };
    config.service = config.service.with_env_overrides();

    // Runtime for the remote decision / generation calls
    let rt = Runtime::new()?;

    let mut engine = OpponentEngine::from_config(&config)?;
    let generator = if config.service.enabled {
        Some(ServiceClient::new(&config.service)?)
    } else {
        tracing::warn!("Decision service disabled - opponent uses the built-in personalities");
        None
    };

    println!("\n=== MONSTER ARENA ===");
    println!("Best of three. Pick abilities by number.");
    println!();

    let Some(player_archetype) = prompt_archetype()? else {
        return Ok(());
    };
    let opponent_archetype = pick_opponent_archetype(engine.rng(), player_archetype);

    // Only the opponent goes through the generation service
    let player = MonsterInstance::from_archetype(player_archetype);
    let opponent = match &generator {
        Some(service) => rt.block_on(generate_monster(service, opponent_archetype)),
        None => MonsterInstance::from_archetype(opponent_archetype),
    };

    let mut machine = BattleMachine::with_rolled_personality(player, opponent, &config, engine.rng());
    let mut seen = print_new_events(&machine, 0);

    println!();
    println!("Commands:");
    println!("  1 / 2           - Use an ability");
    println!("  status / s      - Show both monsters");
    println!("  quit / q        - Leave the arena");

    // Main battle loop
    while !machine.is_over() {
        match machine.phase() {
            BattlePhase::AwaitingOpponentDecision => {
                rt.block_on(run_opponent_turn(&mut machine, &mut engine));
                seen = print_new_events(&machine, seen);
                continue;
            }
            BattlePhase::RoundOver => {
                machine.conclude_round();
                seen = print_new_events(&machine, seen);
                continue;
            }
            _ => {}
        }

        if machine.skip_turn() {
            seen = print_new_events(&machine, seen);
            continue;
        }

        display_status(&machine);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "status" || input == "s" {
            display_detailed_status(&machine);
            continue;
        }

        let Some(ability_id) = input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| machine.player().abilities.get(i))
            .map(|a| a.id.clone())
        else {
            println!("Unknown command. Available: 1, 2, status, quit");
            continue;
        };

        match machine.select_ability(&ability_id) {
            InputOutcome::Resolved(_) => {
                seen = print_new_events(&machine, seen);
            }
            InputOutcome::Ignored(IgnoreReason::OnCooldown) => {
                println!("That ability is still cooling down.");
            }
            InputOutcome::Ignored(reason) => {
                println!("Can't do that right now ({:?}).", reason);
            }
        }
    }

    if let Some(winner) = machine.match_winner() {
        let wins = machine.wins();
        println!();
        println!("=== {} ===", if winner.is_player() { "VICTORY" } else { "DEFEAT" });
        println!("Rounds - You: {} | {}: {}", wins.player, machine.opponent().name, wins.opponent);
    }
    println!("\nGoodbye!");

    Ok(())
}

/// Ask for an archetype until a valid one (or quit) is entered
fn prompt_archetype() -> Result<Option<Archetype>> {
    loop {
        print!("Choose your monster (striker / tank / speedster): ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        let input = input.trim();
        if input == "quit" || input == "q" {
            return Ok(None);
        }
        match input.parse::<Archetype>() {
            Ok(archetype) => return Ok(Some(archetype)),
            Err(e) => println!("{}", e),
        }
    }
}

/// Print log entries added since `seen`, returning the new high-water mark
fn print_new_events(machine: &BattleMachine, seen: usize) -> usize {
    for event in machine.log().since(seen) {
        println!("  {}", event.description);
    }
    machine.log().len()
}

/// Display a brief status summary
fn display_status(machine: &BattleMachine) {
    let player = machine.player();
    let opponent = machine.opponent();
    println!();
    println!(
        "--- Round {} | {} {}/{} vs {} {}/{} ---",
        machine.round(),
        player.name,
        player.hp,
        player.max_hp,
        opponent.name,
        opponent.hp,
        opponent.max_hp
    );
    for (i, status) in machine.player_ability_status().iter().enumerate() {
        println!("  {}. {} [{}]", i + 1, status.name, cooldown_label(status.cooldown));
    }
}

/// Display detailed status for both monsters
fn display_detailed_status(machine: &BattleMachine) {
    println!();
    println!("=== STATUS ===");
    println!(
        "Turn {} | Round {} | Wins - You: {} Opponent: {}",
        machine.turn_number(),
        machine.round(),
        machine.wins().player,
        machine.wins().opponent
    );
    for monster in [machine.player(), machine.opponent()] {
        let marker = if monster.generated { " *" } else { "" };
        println!(
            "{} {}{} ({}) HP {}/{} Block {}",
            monster.icon,
            monster.name,
            marker,
            monster.archetype,
            monster.hp,
            monster.max_hp,
            monster.active_block
        );
        for ability in &monster.abilities {
            println!("    - {}: {}", ability.name, ability.description);
        }
    }
    println!("Opponent personality: {}", machine.personality());
    if let Some(last) = machine.last_opponent_move() {
        println!("Opponent's last move: {}", last);
    }
}
