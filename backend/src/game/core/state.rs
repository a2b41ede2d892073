use super::scoreboard::{RoundResult, ScoreBoard};
use super::settings::GameSettings;
use super::word_queue::WordQueue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Why a round stopped
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundEndReason {
    /// The clock ran out
    TimedOut,
    /// Every word of the draw order was resolved
    Exhausted,
    /// Ended by the players
    Manual,
}

/// Where the session is in its round lifecycle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum RoundPhase {
    /// Between rounds; the current team is about to play
    Idle,
    Active {
        started_at: u64,
        paused_once: bool,
        cheat_flagged: bool,
    },
    /// Clock frozen with this many seconds left. A round pauses at most once.
    Paused { remaining_secs: u32 },
    /// Results wait for confirmation
    Ended { reason: RoundEndReason, ended_at: u64 },
    GameOver { winners: Vec<String> },
}

impl RoundPhase {
    pub fn name(&self) -> &'static str {
        match self {
            RoundPhase::Idle => "idle",
            RoundPhase::Active { .. } => "active",
            RoundPhase::Paused { .. } => "paused",
            RoundPhase::Ended { .. } => "ended",
            RoundPhase::GameOver { .. } => "game_over",
        }
    }
}

/// Mutable root of a session. Serialized as-is for persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    pub settings: GameSettings,
    pub current_team_index: usize,
    pub current_round: u32,
    pub scores: ScoreBoard,
    pub words_used: BTreeSet<String>,
    pub queue: WordQueue,
    pub round_results: Vec<RoundResult>,
    pub phase: RoundPhase,
}

impl GameState {
    pub fn new(settings: GameSettings) -> Self {
        let scores = ScoreBoard::new(settings.teams());
        Self {
            settings,
            current_team_index: 0,
            current_round: 1,
            scores,
            words_used: BTreeSet::new(),
            queue: WordQueue::default(),
            round_results: Vec::new(),
            phase: RoundPhase::Idle,
        }
    }

    pub fn current_team(&self) -> &str {
        &self.settings.teams()[self.current_team_index]
    }

    pub fn round_started_at(&self) -> Option<u64> {
        match self.phase {
            RoundPhase::Active { started_at, .. } => Some(started_at),
            _ => None,
        }
    }

    pub fn round_ended_at(&self) -> Option<u64> {
        match self.phase {
            RoundPhase::Ended { ended_at, .. } => Some(ended_at),
            _ => None,
        }
    }

    pub fn guessed_count(&self) -> usize {
        self.round_results.iter().filter(|r| r.guessed).count()
    }
}
