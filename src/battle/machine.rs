//! Battle state machine
//!
//! Player turn -> opponent decision -> opponent move -> back to the player,
//! until one monster drops to 0 HP. Rounds repeat until a side has enough
//! round wins. Every transition is an explicit method call so the machine
//! can be driven by a terminal loop, a headless runner or a test.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::ai::decision_context::DecisionContext;
use crate::battle::ai::llm_gateway::AbilityStatus;
use crate::battle::ai::narration;
use crate::battle::ai::opponent::Decision;
use crate::battle::ai::personality::Personality;
use crate::battle::cooldown::CooldownTable;
use crate::battle::events::{BattleEventLog, BattleEventType};
use crate::battle::resolution::{apply_move, describe, MoveEffect};
use crate::core::config::{ArenaConfig, MatchRules};
use crate::core::types::{MatchId, Side, TurnNumber};
use crate::monster::catalog::AbilityDefinition;
use crate::monster::instance::MonsterInstance;

/// Battle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    AwaitingPlayerInput,
    ResolvingPlayerMove,
    AwaitingOpponentDecision,
    ResolvingOpponentMove,
    RoundOver,
    MatchOver,
}

/// Round wins per side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundWins {
    pub player: u32,
    pub opponent: u32,
}

impl RoundWins {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player,
            Side::Opponent => self.opponent,
        }
    }

    fn add(&mut self, side: Side) {
        match side {
            Side::Player => self.player += 1,
            Side::Opponent => self.opponent += 1,
        }
    }
}

/// Why player input was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// Not the player's turn, or a move is still resolving
    Locked,
    UnknownAbility,
    OnCooldown,
}

/// A move that went through
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveReport {
    pub side: Side,
    pub ability: AbilityDefinition,
    pub effect: MoveEffect,
    /// The move ended the round
    pub round_over: bool,
}

#[derive(Debug, Clone)]
pub enum InputOutcome {
    Resolved(MoveReport),
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundConclusion {
    NextRound { winner: Side, round: u32 },
    MatchOver { winner: Side, summary: String },
}

/// "Ready" or "Cooldown: N turn(s)"
pub fn cooldown_label(remaining: u32) -> String {
    match remaining {
        0 => "Ready".to_string(),
        1 => "Cooldown: 1 turn".to_string(),
        n => format!("Cooldown: {} turns", n),
    }
}

/// One best-of-N match between the player and the AI opponent
#[derive(Debug, Clone)]
pub struct BattleMachine {
    id: MatchId,
    phase: BattlePhase,
    round: u32,
    wins: RoundWins,
    turn_number: TurnNumber,
    turn: Side,
    input_locked: bool,
    /// Opponent cooldowns already ticked for the pending decision
    opponent_turn_open: bool,
    last_player_move: Option<String>,
    last_opponent_move: Option<String>,
    player: MonsterInstance,
    opponent: MonsterInstance,
    player_cooldowns: CooldownTable,
    opponent_cooldowns: CooldownTable,
    personality: Personality,
    rounds_to_win: u32,
    round_winner: Option<Side>,
    match_winner: Option<Side>,
    summary: Option<String>,
    log: BattleEventLog,
}

impl BattleMachine {
    pub fn new(
        player: MonsterInstance,
        opponent: MonsterInstance,
        personality: Personality,
        rules: &MatchRules,
    ) -> Self {
        let mut machine = Self {
            id: MatchId::new(),
            phase: BattlePhase::AwaitingPlayerInput,
            round: 1,
            wins: RoundWins::default(),
            turn_number: 0,
            turn: Side::Player,
            input_locked: false,
            opponent_turn_open: false,
            last_player_move: None,
            last_opponent_move: None,
            player,
            opponent,
            player_cooldowns: CooldownTable::new(),
            opponent_cooldowns: CooldownTable::new(),
            personality,
            rounds_to_win: rules.rounds_to_win.max(1),
            round_winner: None,
            match_winner: None,
            summary: None,
            log: BattleEventLog::new(),
        };

        tracing::info!(
            match_id = %machine.id,
            player = %machine.player.name,
            opponent = %machine.opponent.name,
            personality = %personality,
            "Match started"
        );
        let intro = narration::battle_intro(personality, &machine.opponent.name);
        machine.log_event(BattleEventType::MatchStarted, intro);
        machine
    }

    /// New match with the opponent personality drawn from the configured weights
    pub fn with_rolled_personality<R: Rng + ?Sized>(
        player: MonsterInstance,
        opponent: MonsterInstance,
        config: &ArenaConfig,
        rng: &mut R,
    ) -> Self {
        let personality = Personality::roll(rng, &config.personalities);
        Self::new(player, opponent, personality, &config.match_rules)
    }

    // Player turn

    /// Player picks an ability by id
    ///
    /// Input while locked, for an unknown ability, or for one still cooling
    /// down leaves the machine untouched.
    pub fn select_ability(&mut self, ability_id: &str) -> InputOutcome {
        if self.phase != BattlePhase::AwaitingPlayerInput || self.input_locked {
            tracing::debug!(phase = ?self.phase, ability_id, "Input ignored while locked");
            return InputOutcome::Ignored(IgnoreReason::Locked);
        }
        let Some(ability) = self.player.ability(ability_id).cloned() else {
            return InputOutcome::Ignored(IgnoreReason::UnknownAbility);
        };
        if !self.player_cooldowns.is_ready(&ability.id) {
            return InputOutcome::Ignored(IgnoreReason::OnCooldown);
        }

        self.input_locked = true;
        self.phase = BattlePhase::ResolvingPlayerMove;

        let effect = apply_move(&mut self.player, &mut self.opponent, &ability);
        self.player_cooldowns.start(&ability);
        self.last_player_move = Some(ability.name.clone());
        self.log_move(Side::Player, &ability, effect);

        let round_over = self.check_round_end();
        if !round_over {
            self.turn = Side::Opponent;
            self.phase = BattlePhase::AwaitingOpponentDecision;
        }

        InputOutcome::Resolved(MoveReport {
            side: Side::Player,
            ability,
            effect,
            round_over,
        })
    }

    /// Hand the turn over when none of the player's abilities is ready
    ///
    /// Returns false (and changes nothing) if any ability could be used.
    pub fn skip_turn(&mut self) -> bool {
        if self.phase != BattlePhase::AwaitingPlayerInput || self.input_locked {
            return false;
        }
        if self
            .player
            .abilities
            .iter()
            .any(|a| self.player_cooldowns.is_ready(&a.id))
        {
            return false;
        }
        self.input_locked = true;
        let line = narration::waiting_narration(&self.player.name);
        self.log_event(BattleEventType::Narration { side: Side::Player }, line);
        self.turn = Side::Opponent;
        self.phase = BattlePhase::AwaitingOpponentDecision;
        true
    }

    /// Context for an AI playing the player's side
    pub fn player_context(&self, personality: Personality) -> Option<DecisionContext<'_>> {
        if self.phase != BattlePhase::AwaitingPlayerInput || self.input_locked {
            return None;
        }
        Some(DecisionContext::new(
            &self.player,
            &self.opponent,
            personality,
            &self.player_cooldowns,
            self.last_opponent_move.as_deref(),
            self.turn_number,
        ))
    }

    // Opponent turn

    /// Start the opponent's turn: bump the turn counter and tick its cooldowns
    ///
    /// Safe to call repeatedly; the tick happens once per turn. Returns
    /// whether a decision is now expected.
    pub fn begin_opponent_turn(&mut self) -> bool {
        if self.phase != BattlePhase::AwaitingOpponentDecision {
            return false;
        }
        if !self.opponent_turn_open {
            self.turn_number += 1;
            self.opponent_cooldowns.tick();
            self.opponent_turn_open = true;
        }
        true
    }

    /// What the opponent engine decides from
    pub fn opponent_context(&self) -> Option<DecisionContext<'_>> {
        if self.phase != BattlePhase::AwaitingOpponentDecision || !self.opponent_turn_open {
            return None;
        }
        Some(DecisionContext::new(
            &self.opponent,
            &self.player,
            self.personality,
            &self.opponent_cooldowns,
            self.last_player_move.as_deref(),
            self.turn_number,
        ))
    }

    /// Resolve the opponent's decided move
    ///
    /// Returns None if no decision is pending or the ability is not in the
    /// opponent's kit.
    pub fn apply_opponent_decision(&mut self, decision: &Decision) -> Option<MoveReport> {
        if self.phase != BattlePhase::AwaitingOpponentDecision || !self.opponent_turn_open {
            return None;
        }
        let Some(ability) = self.opponent.ability(&decision.ability.id).cloned() else {
            tracing::warn!(ability = %decision.ability.id, "Decision names an ability outside the opponent's kit");
            return None;
        };

        self.phase = BattlePhase::ResolvingOpponentMove;
        self.opponent_turn_open = false;
        self.log_event(
            BattleEventType::Narration { side: Side::Opponent },
            decision.narration.clone(),
        );

        let effect = apply_move(&mut self.opponent, &mut self.player, &ability);
        self.opponent_cooldowns.start(&ability);
        self.last_opponent_move = Some(ability.name.clone());
        self.log_move(Side::Opponent, &ability, effect);

        let round_over = self.check_round_end();
        if !round_over {
            self.player_cooldowns.tick();
            self.turn = Side::Player;
            self.input_locked = false;
            self.phase = BattlePhase::AwaitingPlayerInput;
        }

        Some(MoveReport {
            side: Side::Opponent,
            ability,
            effect,
            round_over,
        })
    }

    // Rounds

    fn check_round_end(&mut self) -> bool {
        let winner = if self.opponent.is_defeated() {
            Side::Player
        } else if self.player.is_defeated() {
            Side::Opponent
        } else {
            return false;
        };

        self.round_winner = Some(winner);
        self.phase = BattlePhase::RoundOver;
        let winner_name = match winner {
            Side::Player => format!("Your {}", self.player.archetype),
            Side::Opponent => self.opponent.name.clone(),
        };
        tracing::info!(round = self.round, winner = %winner, "Round over");
        self.log_event(
            BattleEventType::RoundWon { winner },
            format!("{} wins this round!", winner_name),
        );
        true
    }

    /// Credit the round winner, then either end the match or reset for the next round
    pub fn conclude_round(&mut self) -> Option<RoundConclusion> {
        if self.phase != BattlePhase::RoundOver {
            return None;
        }
        let winner = self.round_winner.take()?;
        self.wins.add(winner);

        if self.wins.get(winner) >= self.rounds_to_win {
            let summary = narration::battle_summary(winner, self.personality, &self.opponent.name);
            self.phase = BattlePhase::MatchOver;
            self.match_winner = Some(winner);
            self.summary = Some(summary.clone());
            tracing::info!(
                match_id = %self.id,
                winner = %winner,
                player_wins = self.wins.player,
                opponent_wins = self.wins.opponent,
                "Match over"
            );
            self.log_event(BattleEventType::MatchEnded { winner }, summary.clone());
            return Some(RoundConclusion::MatchOver { winner, summary });
        }

        self.round += 1;
        self.player.reset_for_new_round();
        self.opponent.reset_for_new_round();
        self.player_cooldowns.clear();
        self.opponent_cooldowns.clear();
        self.last_player_move = None;
        self.last_opponent_move = None;
        self.opponent_turn_open = false;
        self.turn = Side::Player;
        self.input_locked = false;
        self.phase = BattlePhase::AwaitingPlayerInput;
        self.log_event(BattleEventType::RoundStarted, "Next round begins!".into());

        Some(RoundConclusion::NextRound {
            winner,
            round: self.round,
        })
    }

    // Views

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == BattlePhase::MatchOver
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn wins(&self) -> RoundWins {
        self.wins
    }

    pub fn rounds_to_win(&self) -> u32 {
        self.rounds_to_win
    }

    pub fn turn_number(&self) -> TurnNumber {
        self.turn_number
    }

    pub fn whose_turn(&self) -> Side {
        self.turn
    }

    pub fn is_input_locked(&self) -> bool {
        self.input_locked
    }

    pub fn last_player_move(&self) -> Option<&str> {
        self.last_player_move.as_deref()
    }

    pub fn last_opponent_move(&self) -> Option<&str> {
        self.last_opponent_move.as_deref()
    }

    pub fn player(&self) -> &MonsterInstance {
        &self.player
    }

    pub fn opponent(&self) -> &MonsterInstance {
        &self.opponent
    }

    pub fn player_cooldowns(&self) -> &CooldownTable {
        &self.player_cooldowns
    }

    pub fn opponent_cooldowns(&self) -> &CooldownTable {
        &self.opponent_cooldowns
    }

    pub fn player_cooldown(&self, ability_id: &str) -> u32 {
        self.player_cooldowns.remaining(ability_id)
    }

    /// Per-ability readiness for the player's buttons
    pub fn player_ability_status(&self) -> Vec<AbilityStatus> {
        self.player
            .abilities
            .iter()
            .map(|a| AbilityStatus {
                id: a.id.clone(),
                name: a.name.clone(),
                cooldown: self.player_cooldowns.remaining(&a.id),
            })
            .collect()
    }

    pub fn personality(&self) -> Personality {
        self.personality
    }

    pub fn match_winner(&self) -> Option<Side> {
        self.match_winner
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn log(&self) -> &BattleEventLog {
        &self.log
    }

    fn log_move(&mut self, side: Side, ability: &AbilityDefinition, effect: MoveEffect) {
        let actor = match side {
            Side::Player => &self.player.name,
            Side::Opponent => &self.opponent.name,
        };
        let description = describe(actor, ability, &effect);
        tracing::debug!(
            side = %side,
            ability = %ability.id,
            player_hp = self.player.hp,
            opponent_hp = self.opponent.hp,
            "{}",
            description
        );
        self.log_event(
            BattleEventType::MoveResolved {
                side,
                ability_id: ability.id.clone(),
                effect,
            },
            description,
        );
    }

    fn log_event(&mut self, event_type: BattleEventType, description: String) {
        self.log.push(event_type, description, self.turn_number, self.round);
    }
}
