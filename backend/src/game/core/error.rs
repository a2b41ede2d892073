use thiserror::Error;

/// Invalid game settings, rejected before a session exists
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("at least {min} teams are required, got {count}")]
    TooFewTeams { min: usize, count: usize },
    #[error("team names must not be empty")]
    EmptyTeamName,
    #[error("duplicate team name: {0}")]
    DuplicateTeam(String),
    #[error("target score {0} is outside {min}..={max}", min = super::settings::MIN_TARGET_SCORE, max = super::settings::MAX_TARGET_SCORE)]
    TargetOutOfRange(u32),
    #[error("round duration {0}s is outside {min}..={max}", min = super::settings::MIN_ROUND_SECS, max = super::settings::MAX_ROUND_SECS)]
    DurationOutOfRange(u32),
    #[error("round duration {0}s is not a multiple of {step}", step = super::settings::ROUND_SECS_STEP)]
    DurationOffStep(u32),
    #[error("theme {0} has no words")]
    EmptyTheme(String),
    #[error("settings reference theme {expected}, got {actual}")]
    ThemeMismatch { expected: String, actual: String },
}

/// An action that is not legal in the current phase. The session is left untouched.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("no round is active")]
    NoActiveRound,
    #[error("a round is already in progress")]
    RoundInProgress,
    #[error("the round is paused")]
    RoundPaused,
    #[error("the round is not paused")]
    NotPaused,
    #[error("this round has already been paused once")]
    PauseUsed,
    #[error("the round clock has already run out")]
    TimeExpired,
    #[error("the round is blocked after a cheat flag")]
    CheatBlocked,
    #[error("no finished round is waiting for confirmation")]
    NothingToConfirm,
    #[error("confirmed results do not match the round's words")]
    ResultsMismatch,
    #[error("the game is over")]
    GameOver,
}

/// A persisted snapshot that cannot be trusted. Callers treat it as absent.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Settings(#[from] ConfigError),
    #[error("score entries do not match the configured teams")]
    ScoreTeamsMismatch,
    #[error("team index {0} out of range")]
    TeamIndexOutOfRange(usize),
    #[error("round number must start at 1")]
    InvalidRound,
    #[error("word cursor {cursor} beyond draw order of {len}")]
    CursorOutOfRange { cursor: usize, len: usize },
    #[error("{results} round results for a draw order of {len}")]
    TooManyResults { results: usize, len: usize },
    #[error("winner {0} is not a team in this game")]
    UnknownWinner(String),
    #[error("round in progress has no word left to show")]
    NoCurrentWord,
}

/// Theme lookup failure from the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("theme {0} not found")]
    NotFound(String),
    #[error("theme fetch failed: {0}")]
    FetchFailed(#[from] sqlx::Error),
}
