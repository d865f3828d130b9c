//! Battle narration
//!
//! Cosmetic text only: per-personality phrase sets for each move, reasoning
//! lines derived from the strategy's rationale, the intro line and the
//! end-of-match summary.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::battle::ai::personality::Personality;
use crate::battle::ai::policy::Rationale;
use crate::core::types::Side;
use crate::monster::catalog::AbilityDefinition;

const AGGRESSIVE_PHRASES: [&str; 4] = [
    "{monster} charges forward recklessly with {ability}!",
    "{monster} attacks without hesitation using {ability}!",
    "{monster} launches an aggressive {ability}!",
    "{monster} refuses to back down and unleashes {ability}!",
];

const CAUTIOUS_PHRASES: [&str; 3] = [
    "{monster} cautiously executes {ability}.",
    "{monster} carefully positions for {ability}.",
    "{monster} strategically uses {ability}.",
];

const CAUTIOUS_GUARD_PHRASES: [&str; 2] = [
    "{monster} carefully raises a {ability}, preparing to defend!",
    "{monster} digs in behind {ability}, waiting for an opening.",
];

const ADAPTIVE_PHRASES: [&str; 4] = [
    "{monster} recognizes your pattern and adapts with {ability}!",
    "{monster} counters your strategy using {ability}!",
    "{monster} adjusts their approach with {ability}!",
    "{monster} responds intelligently with {ability}!",
];

pub const WAITING_REASONING: &str = "waiting for abilities to cool down";

fn fill(template: &str, monster: &str, ability: &str) -> String {
    template
        .replace("{monster}", monster)
        .replace("{ability}", ability)
}

/// One narration line for a move, chosen uniformly from the personality's phrases
pub fn narrate<R: Rng + ?Sized>(
    rng: &mut R,
    personality: Personality,
    monster_name: &str,
    ability: &AbilityDefinition,
) -> String {
    let phrases: &[&str] = match personality {
        Personality::Aggressive => &AGGRESSIVE_PHRASES,
        Personality::Cautious if ability.is_defensive() => &CAUTIOUS_GUARD_PHRASES,
        Personality::Cautious => &CAUTIOUS_PHRASES,
        Personality::Adaptive => &ADAPTIVE_PHRASES,
    };
    let template = phrases.choose(rng).copied().unwrap_or("{monster} uses {ability}!");
    fill(template, monster_name, &ability.name)
}

/// Short explanation of a pick
pub fn reasoning(personality: Personality, rationale: Rationale, ability: &AbilityDefinition) -> String {
    let why = match rationale {
        Rationale::DesperateDefense => "critically wounded, bracing",
        Rationale::HeavyPressure => "maintaining aggressive pressure",
        Rationale::RawDamage => "hitting as hard as possible",
        Rationale::Finisher => "going for the finish",
        Rationale::CarefulDefense => "protecting a weakened position",
        Rationale::SteadyOffense => "balancing offense and defense",
        Rationale::Opening => "probing with a measured opening",
        Rationale::BraceAgainstAggression => "expecting another heavy attack",
        Rationale::PunishDefense => "punishing a defensive stance",
        Rationale::DefaultOffense => "adapting to your strategy",
        Rationale::FirstReady => "taking what is available",
    };
    format!("{} ({}) with {}", why, personality.tag().to_lowercase(), ability.name)
}

/// Narration when nothing is ready
pub fn waiting_narration(monster_name: &str) -> String {
    format!("{} is recovering...", monster_name)
}

/// Intro line shown when the battle starts
pub fn battle_intro(personality: Personality, monster_name: &str) -> String {
    let flavour = match personality {
        Personality::Aggressive => "They favor overwhelming offense and rarely defend.",
        Personality::Cautious => "They carefully balance attack and defense.",
        Personality::Adaptive => "They study your moves and adapt their strategy.",
    };
    format!("You face {} {}. {}", personality, monster_name, flavour)
}

/// End-of-match summary, one template per personality per outcome
pub fn battle_summary(winner: Side, personality: Personality, opponent_name: &str) -> String {
    match (winner, personality) {
        (Side::Player, Personality::Aggressive) => format!(
            "You exploited {}'s aggressive nature by timing your defenses carefully.",
            opponent_name
        ),
        (Side::Player, Personality::Cautious) => format!(
            "You overcame {}'s defensive strategy with persistent pressure.",
            opponent_name
        ),
        (Side::Player, Personality::Adaptive) => format!(
            "You stayed unpredictable and outmaneuvered {}'s adaptations.",
            opponent_name
        ),
        (Side::Opponent, Personality::Aggressive) => format!(
            "{}'s relentless aggression overwhelmed you this time.",
            opponent_name
        ),
        (Side::Opponent, Personality::Cautious) => format!(
            "{}'s patient defense wore you down this time.",
            opponent_name
        ),
        (Side::Opponent, Personality::Adaptive) => format!(
            "{} read your every move and turned it against you.",
            opponent_name
        ),
    }
}
