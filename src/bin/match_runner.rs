//! Headless Match Runner
//!
//! Runs AI vs AI matches (the player side is driven by a personality too)
//! and outputs JSON results for balancing the personalities.

use monster_arena::battle::ai::opponent::OpponentEngine;
use monster_arena::battle::ai::personality::Personality;
use monster_arena::battle::events::BattleEvent;
use monster_arena::battle::machine::BattleMachine;
use monster_arena::battle::turn::run_match;
use monster_arena::core::config::ArenaConfig;
use monster_arena::core::types::Side;
use monster_arena::monster::catalog::{pick_opponent_archetype, Archetype};
use monster_arena::monster::generation::{generate_monster, LocalForge};
use monster_arena::monster::instance::MonsterInstance;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Headless Match Runner - AI vs AI monster matches
#[derive(Parser, Debug)]
#[command(name = "match_runner")]
#[command(about = "Run AI vs AI monster matches and output results as JSON")]
struct Args {
    /// Player-side archetype (STRIKER, TANK, SPEEDSTER)
    #[arg(long, default_value = "STRIKER")]
    player: String,

    /// Opponent archetype; a random different archetype per match when omitted
    #[arg(long)]
    opponent: Option<String>,

    /// Personality driving the player side
    #[arg(long, default_value = "ADAPTIVE")]
    player_personality: String,

    /// Opponent personality; rolled from the configured weights when omitted
    #[arg(long)]
    opponent_personality: Option<String>,

    /// Number of matches to play
    #[arg(long, default_value_t = 1)]
    matches: u32,

    /// Maximum opponent turns before a match is abandoned
    #[arg(long, default_value_t = 500)]
    max_turns: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Arena config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Generate the opponent offline instead of using its plain template
    #[arg(long)]
    forge: bool,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Include the full event log in the output
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct MatchResult {
    index: u32,
    seed: u64,
    player: Combatant,
    opponent: Combatant,
    /// None when the match hit the turn limit
    winner: Option<Side>,
    player_rounds: u32,
    opponent_rounds: u32,
    turns: u32,
    summary: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    events: Vec<BattleEvent>,
}

#[derive(Serialize)]
struct Combatant {
    name: String,
    archetype: Archetype,
    personality: Personality,
    generated: bool,
}

#[derive(Serialize, Default)]
struct Tally {
    matches: u32,
    player_wins: u32,
    opponent_wins: u32,
    abandoned: u32,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("monster_arena=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ArenaConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config '{}': {}", path.display(), e);
            eprintln!("Using default config");
            ArenaConfig::default()
        }),
        None => ArenaConfig::default(),
    };
    config.service = config.service.with_env_overrides();
    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {}", e);
        std::process::exit(2);
    }

    let player_archetype = parse_or_exit::<Archetype>(&args.player);
    let opponent_archetype = args.opponent.as_deref().map(parse_or_exit::<Archetype>);
    let player_personality = parse_or_exit::<Personality>(&args.player_personality);
    let opponent_personality = args
        .opponent_personality
        .as_deref()
        .map(parse_or_exit::<Personality>);

    // Determine seed
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    let mut opponent_engine = match OpponentEngine::from_config(&config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Warning: {} - falling back to local personalities", e);
            OpponentEngine::local(&config)
        }
    };
    let mut player_engine = OpponentEngine::local(&config);

    let mut results = Vec::new();
    let mut tally = Tally::default();

    for index in 0..args.matches {
        let match_seed = seed.wrapping_add(u64::from(index));
        player_engine.reseed(match_seed);
        opponent_engine.reseed(match_seed.wrapping_add(1));

        let opponent_kind = opponent_archetype
            .unwrap_or_else(|| pick_opponent_archetype(&mut rng, player_archetype));

        let player = MonsterInstance::from_archetype(player_archetype);
        let opponent = if args.forge {
            let forge = LocalForge::with_seed(match_seed);
            rt.block_on(generate_monster(&forge, opponent_kind))
        } else {
            MonsterInstance::from_archetype(opponent_kind)
        };

        let mut machine = match opponent_personality {
            Some(personality) => BattleMachine::new(player, opponent, personality, &config.match_rules),
            None => BattleMachine::with_rolled_personality(player, opponent, &config, &mut rng),
        };

        let winner = rt.block_on(run_match(
            &mut machine,
            &mut player_engine,
            player_personality,
            &mut opponent_engine,
            args.max_turns,
        ));

        tally.matches += 1;
        match winner {
            Some(Side::Player) => tally.player_wins += 1,
            Some(Side::Opponent) => tally.opponent_wins += 1,
            None => tally.abandoned += 1,
        }

        results.push(MatchResult {
            index,
            seed: match_seed,
            player: Combatant {
                name: machine.player().name.clone(),
                archetype: machine.player().archetype,
                personality: player_personality,
                generated: machine.player().generated,
            },
            opponent: Combatant {
                name: machine.opponent().name.clone(),
                archetype: machine.opponent().archetype,
                personality: machine.personality(),
                generated: machine.opponent().generated,
            },
            winner,
            player_rounds: machine.wins().player,
            opponent_rounds: machine.wins().opponent,
            turns: machine.turn_number(),
            summary: machine.summary().map(str::to_string),
            events: if args.verbose {
                machine.log().events.clone()
            } else {
                Vec::new()
            },
        });
    }

    match args.format.as_str() {
        "text" => print_text(&results, &tally),
        "json" => print_json(&results, &tally),
        _ => {
            eprintln!("Unknown format '{}', defaulting to json", args.format);
            print_json(&results, &tally);
        }
    }
}

fn parse_or_exit<T>(value: &str) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(2);
    })
}

fn print_json(results: &[MatchResult], tally: &Tally) {
    let output = serde_json::json!({
        "matches": results,
        "tally": tally,
    });
    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Failed to serialize results: {}", e),
    }
}

fn print_text(results: &[MatchResult], tally: &Tally) {
    println!("Match Results");
    println!("=============");
    for result in results {
        let outcome = match result.winner {
            Some(Side::Player) => "player wins",
            Some(Side::Opponent) => "opponent wins",
            None => "abandoned",
        };
        println!(
            "#{} {} ({}, {}) vs {} ({}, {}): {} {}-{} in {} turns [seed {}]",
            result.index,
            result.player.name,
            result.player.archetype,
            result.player.personality,
            result.opponent.name,
            result.opponent.archetype,
            result.opponent.personality,
            outcome,
            result.player_rounds,
            result.opponent_rounds,
            result.turns,
            result.seed
        );
        if let Some(summary) = &result.summary {
            println!("    {}", summary);
        }
        for event in &result.events {
            println!("    [{}:{}] {}", event.round, event.turn, event.description);
        }
    }
    println!();
    println!(
        "Total: {} matches, player {} / opponent {} / abandoned {}",
        tally.matches, tally.player_wins, tally.opponent_wins, tally.abandoned
    );
}
