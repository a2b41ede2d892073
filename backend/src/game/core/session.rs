use super::cheat_guard;
use super::error::{ConfigError, SnapshotError, TransitionError};
use super::events::SessionEvent;
use super::scoreboard::{RoundResult, TeamScore, round_delta};
use super::settings::GameSettings;
use super::snapshot;
use super::state::{GameState, RoundEndReason, RoundPhase};
use super::theme::Theme;
use super::timer::RoundTimer;
use super::word_queue::{self, WordQueue};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Outcome of a player action: the emitted events, or why it was refused
pub type Transition = Result<Vec<SessionEvent>, TransitionError>;

/// What a client needs to render the game at a given instant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameView {
    pub phase: String,
    pub team: String,
    pub round: u32,
    pub scores: Vec<TeamScore>,
    pub word: Option<String>,
    pub remaining_secs: Option<u32>,
    pub provisional_score: Option<i32>,
    pub results: Vec<RoundResult>,
    pub words_left: usize,
    pub cheat_flagged: bool,
    pub winners: Vec<String>,
}

/// A team word-guessing game (pure logic, no I/O).
///
/// Every action takes the current instant in milliseconds since the Unix
/// epoch. Illegal actions return a `TransitionError` and leave the state as it
/// was.
pub struct GameSession {
    theme: Theme,
    state: GameState,
    timer: RoundTimer,
    rng: StdRng,
}

impl GameSession {
    pub fn new(
        settings: GameSettings,
        theme: Theme,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        if settings.theme_id() != theme.id {
            return Err(ConfigError::ThemeMismatch {
                expected: settings.theme_id().to_string(),
                actual: theme.id,
            });
        }
        if theme.words.is_empty() {
            return Err(ConfigError::EmptyTheme(theme.id));
        }

        Ok(Self {
            timer: RoundTimer::new(settings.round_duration_secs()),
            state: GameState::new(settings),
            theme,
            rng,
        })
    }

    pub fn with_seed(
        settings: GameSettings,
        theme: Theme,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::new(settings, theme, StdRng::seed_from_u64(seed))
    }

    /// Rebuild a session from persisted state. Invalid state is rejected.
    pub fn restore(state: GameState, theme: Theme, rng: StdRng) -> Result<Self, SnapshotError> {
        snapshot::validate(&state, &theme)?;
        Ok(Self {
            timer: RoundTimer::new(state.settings.round_duration_secs()),
            state,
            theme,
            rng,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn phase(&self) -> &RoundPhase {
        &self.state.phase
    }

    pub fn current_team(&self) -> &str {
        self.state.current_team()
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state.phase, RoundPhase::GameOver { .. })
    }

    pub fn winners(&self) -> Option<&[String]> {
        match &self.state.phase {
            RoundPhase::GameOver { winners } => Some(winners),
            _ => None,
        }
    }

    /// The word on screen. Hidden while paused or blocked.
    pub fn current_word(&self) -> Option<&str> {
        match self.state.phase {
            RoundPhase::Active {
                cheat_flagged: false,
                ..
            } => self.state.queue.current(),
            _ => None,
        }
    }

    pub fn available_words(&self) -> Vec<String> {
        word_queue::available_words(&self.theme.words, &self.state.words_used)
    }

    pub fn remaining_secs(&self, now: u64) -> Option<u32> {
        match self.state.phase {
            RoundPhase::Active { started_at, .. } => Some(self.timer.remaining(started_at, now)),
            RoundPhase::Paused { remaining_secs } => Some(remaining_secs),
            _ => None,
        }
    }

    /// Acting team's score if the current results were confirmed now. Display only.
    pub fn provisional_score(&self) -> Option<i32> {
        match self.state.phase {
            RoundPhase::Active { .. } | RoundPhase::Paused { .. } | RoundPhase::Ended { .. } => {
                let score = self.state.scores.score_at(self.state.current_team_index)?;
                Some(score + round_delta(&self.state.round_results, self.skip_penalty()))
            }
            _ => None,
        }
    }

    pub fn view(&self, now: u64) -> GameView {
        GameView {
            phase: self.state.phase.name().to_string(),
            team: self.current_team().to_string(),
            round: self.state.current_round,
            scores: self.state.scores.entries().to_vec(),
            word: self.current_word().map(str::to_string),
            remaining_secs: self.remaining_secs(now),
            provisional_score: self.provisional_score(),
            results: self.state.round_results.clone(),
            words_left: self.available_words().len(),
            cheat_flagged: matches!(
                self.state.phase,
                RoundPhase::Active {
                    cheat_flagged: true,
                    ..
                }
            ),
            winners: self.winners().map(<[String]>::to_vec).unwrap_or_default(),
        }
    }

    /// Start the current team's round. With no words left the game ends instead.
    pub fn start_round(&mut self, now: u64) -> Transition {
        match self.state.phase {
            RoundPhase::Idle => {}
            RoundPhase::GameOver { .. } => return Err(TransitionError::GameOver),
            _ => return Err(TransitionError::RoundInProgress),
        }

        let available = self.available_words();
        if available.is_empty() {
            let winners = self.state.scores.evaluate_exhaustion_win();
            return Ok(vec![self.finish(winners)]);
        }

        self.state.queue = WordQueue::shuffled(available, &mut self.rng);
        self.state.round_results.clear();
        self.state.phase = RoundPhase::Active {
            started_at: self.timer.start(now),
            paused_once: false,
            cheat_flagged: false,
        };

        Ok(vec![SessionEvent::RoundStarted {
            team: self.current_team().to_string(),
            round: self.state.current_round,
            duration_secs: self.timer.duration_secs(),
            word: self.state.queue.current().unwrap_or_default().to_string(),
        }])
    }

    pub fn guess(&mut self, now: u64) -> Transition {
        self.resolve_word(now, true)
    }

    pub fn skip(&mut self, now: u64) -> Transition {
        self.resolve_word(now, false)
    }

    fn resolve_word(&mut self, now: u64, guessed: bool) -> Transition {
        let started_at = match self.state.phase {
            RoundPhase::Active {
                cheat_flagged: true,
                ..
            } => return Err(TransitionError::CheatBlocked),
            RoundPhase::Active { started_at, .. } => started_at,
            RoundPhase::Paused { .. } => return Err(TransitionError::RoundPaused),
            RoundPhase::GameOver { .. } => return Err(TransitionError::GameOver),
            RoundPhase::Idle | RoundPhase::Ended { .. } => {
                return Err(TransitionError::NoActiveRound);
            }
        };
        // The word still on screen when the clock hits zero never counts
        if self.timer.is_expired(started_at, now) {
            return Err(TransitionError::TimeExpired);
        }
        let Some(word) = self.state.queue.current().map(str::to_string) else {
            return Err(TransitionError::NoActiveRound);
        };

        self.state
            .round_results
            .push(RoundResult::new(word.clone(), guessed));
        self.state.words_used.insert(word);

        if guessed && cheat_guard::is_cheating(started_at, now, self.state.guessed_count()) {
            if let RoundPhase::Active { cheat_flagged, .. } = &mut self.state.phase {
                *cheat_flagged = true;
            }
            return Ok(vec![SessionEvent::CheatFlagged {
                team: self.current_team().to_string(),
            }]);
        }

        if !self.state.queue.advance() {
            return Ok(vec![self.end_round_with(RoundEndReason::Exhausted, now)]);
        }

        Ok(vec![SessionEvent::WordAdvanced {
            index: self.state.queue.cursor(),
            word: self.state.queue.current().unwrap_or_default().to_string(),
        }])
    }

    /// Freeze the clock and reshuffle the words not yet shown
    pub fn pause(&mut self, now: u64) -> Transition {
        let started_at = match self.state.phase {
            RoundPhase::Active {
                cheat_flagged: true,
                ..
            } => return Err(TransitionError::CheatBlocked),
            RoundPhase::Active {
                paused_once: true, ..
            } => return Err(TransitionError::PauseUsed),
            RoundPhase::Active { started_at, .. } => started_at,
            RoundPhase::Paused { .. } => return Err(TransitionError::RoundPaused),
            RoundPhase::GameOver { .. } => return Err(TransitionError::GameOver),
            RoundPhase::Idle | RoundPhase::Ended { .. } => {
                return Err(TransitionError::NoActiveRound);
            }
        };

        let remaining_secs = self.timer.pause(started_at, now);
        if remaining_secs == 0 {
            return Err(TransitionError::TimeExpired);
        }

        self.state.queue.reshuffle_remaining(&mut self.rng);
        self.state.phase = RoundPhase::Paused { remaining_secs };

        Ok(vec![SessionEvent::RoundPaused { remaining_secs }])
    }

    pub fn resume(&mut self, now: u64) -> Transition {
        let remaining_secs = match self.state.phase {
            RoundPhase::Paused { remaining_secs } => remaining_secs,
            RoundPhase::GameOver { .. } => return Err(TransitionError::GameOver),
            _ => return Err(TransitionError::NotPaused),
        };

        self.state.phase = RoundPhase::Active {
            started_at: self.timer.resume(remaining_secs, now),
            paused_once: true,
            cheat_flagged: false,
        };

        Ok(vec![SessionEvent::RoundResumed {
            remaining_secs,
            word: self.state.queue.current().map(str::to_string),
        }])
    }

    /// Poll the clock. Ends an active round whose time ran out; otherwise does nothing.
    pub fn tick(&mut self, now: u64) -> Vec<SessionEvent> {
        let RoundPhase::Active { started_at, .. } = self.state.phase else {
            return Vec::new();
        };
        if !self.timer.is_expired(started_at, now) {
            return Vec::new();
        }
        vec![self.end_round_with(RoundEndReason::TimedOut, now)]
    }

    /// End the round early, keeping what was resolved so far
    pub fn end_round(&mut self, now: u64) -> Transition {
        match self.state.phase {
            RoundPhase::Active { .. } | RoundPhase::Paused { .. } => {
                Ok(vec![self.end_round_with(RoundEndReason::Manual, now)])
            }
            RoundPhase::GameOver { .. } => Err(TransitionError::GameOver),
            RoundPhase::Idle | RoundPhase::Ended { .. } => Err(TransitionError::NoActiveRound),
        }
    }

    /// Score the finished round and move on.
    ///
    /// `overrides` may flip the guessed flag of any result but must list the
    /// same words in the same order. A target-score win ends the game before
    /// the turn rotates. A round that timed out leads straight into the next
    /// team's round.
    pub fn confirm_results(&mut self, now: u64, overrides: Option<Vec<RoundResult>>) -> Transition {
        let reason = match self.state.phase {
            RoundPhase::Ended { reason, .. } => reason,
            RoundPhase::GameOver { .. } => return Err(TransitionError::GameOver),
            _ => return Err(TransitionError::NothingToConfirm),
        };

        if let Some(overrides) = overrides {
            let same_words = overrides.len() == self.state.round_results.len()
                && overrides
                    .iter()
                    .zip(&self.state.round_results)
                    .all(|(a, b)| a.word == b.word);
            if !same_words {
                return Err(TransitionError::ResultsMismatch);
            }
            self.state.round_results = overrides;
        }

        let team = self.current_team().to_string();
        let skip_penalty = self.skip_penalty();
        let delta = round_delta(&self.state.round_results, skip_penalty);
        self.state.scores.apply_round_results(
            self.state.current_team_index,
            &self.state.round_results,
            skip_penalty,
        );

        let mut events = vec![SessionEvent::ResultsConfirmed {
            team,
            delta,
            scores: self.state.scores.entries().to_vec(),
        }];

        let winners = self
            .state
            .scores
            .evaluate_win(self.state.settings.target_score());
        if !winners.is_empty() {
            events.push(self.finish(winners));
            return Ok(events);
        }

        self.rotate_turn();
        events.push(SessionEvent::TurnChanged {
            team: self.current_team().to_string(),
            round: self.state.current_round,
        });

        if reason == RoundEndReason::TimedOut {
            events.extend(self.start_round(now)?);
        }

        Ok(events)
    }

    fn skip_penalty(&self) -> bool {
        self.state.settings.skip_penalty()
    }

    fn end_round_with(&mut self, reason: RoundEndReason, now: u64) -> SessionEvent {
        self.state.phase = RoundPhase::Ended {
            reason,
            ended_at: now,
        };
        SessionEvent::RoundEnded {
            team: self.current_team().to_string(),
            timed_out: reason == RoundEndReason::TimedOut,
            reason,
            results: self.state.round_results.clone(),
        }
    }

    fn rotate_turn(&mut self) {
        let team_count = self.state.settings.teams().len();
        self.state.current_team_index = (self.state.current_team_index + 1) % team_count;
        if self.state.current_team_index == 0 {
            self.state.current_round += 1;
        }
        self.state.round_results.clear();
        self.state.queue = WordQueue::default();
        self.state.phase = RoundPhase::Idle;
    }

    fn finish(&mut self, winners: Vec<String>) -> SessionEvent {
        self.state.phase = RoundPhase::GameOver {
            winners: winners.clone(),
        };
        SessionEvent::GameOver {
            winners,
            scores: self.state.scores.entries().to_vec(),
        }
    }
}
