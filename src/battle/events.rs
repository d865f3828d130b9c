//! Battle event log
//!
//! Front-ends render narration and status lines from here rather than from
//! tracing output.

use serde::{Deserialize, Serialize};

use crate::battle::resolution::MoveEffect;
use crate::core::types::{Side, TurnNumber};

/// Log entry for battle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleEvent {
    pub turn: TurnNumber,
    pub round: u32,
    pub event_type: BattleEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEventType {
    MatchStarted,
    /// Opponent narration for the move that follows
    Narration { side: Side },
    MoveResolved {
        side: Side,
        ability_id: String,
        effect: MoveEffect,
    },
    RoundWon { winner: Side },
    RoundStarted,
    MatchEnded { winner: Side },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleEventLog {
    pub events: Vec<BattleEvent>,
}

impl BattleEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event_type: BattleEventType, description: String, turn: TurnNumber, round: u32) {
        self.events.push(BattleEvent {
            turn,
            round,
            event_type,
            description,
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&BattleEvent> {
        self.events.last()
    }

    /// Events appended after the first `start` entries
    pub fn since(&self, start: usize) -> &[BattleEvent] {
        self.events.get(start..).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_since() {
        let mut log = BattleEventLog::new();
        log.push(BattleEventType::MatchStarted, "start".into(), 0, 1);
        log.push(BattleEventType::RoundStarted, "next".into(), 3, 2);
        assert_eq!(log.len(), 2);
        assert_eq!(log.since(1).len(), 1);
        assert_eq!(log.since(1)[0].description, "next");
        assert!(log.since(5).is_empty());
    }
}
