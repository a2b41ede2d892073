use super::scoreboard::{RoundResult, TeamScore};
use super::state::RoundEndReason;
use serde::{Deserialize, Serialize};

/// Lifecycle events emitted by a session for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    RoundStarted {
        team: String,
        round: u32,
        duration_secs: u32,
        word: String,
    },
    WordAdvanced {
        index: usize,
        word: String,
    },
    RoundPaused {
        remaining_secs: u32,
    },
    RoundResumed {
        remaining_secs: u32,
        word: Option<String>,
    },
    CheatFlagged {
        team: String,
    },
    RoundEnded {
        team: String,
        timed_out: bool,
        reason: RoundEndReason,
        results: Vec<RoundResult>,
    },
    ResultsConfirmed {
        team: String,
        delta: i32,
        scores: Vec<TeamScore>,
    },
    TurnChanged {
        team: String,
        round: u32,
    },
    GameOver {
        winners: Vec<String>,
        scores: Vec<TeamScore>,
    },
}
