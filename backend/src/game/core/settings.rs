use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MIN_TEAMS: usize = 2;
pub const MIN_TARGET_SCORE: u32 = 10;
pub const MAX_TARGET_SCORE: u32 = 100;
pub const MIN_ROUND_SECS: u32 = 15;
pub const MAX_ROUND_SECS: u32 = 120;
pub const ROUND_SECS_STEP: u32 = 5;

/// Session configuration, validated once and never changed afterwards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSettings {
    theme_id: String,
    teams: Vec<String>,
    target_score: u32,
    round_duration_secs: u32,
    skip_penalty: bool,
}

impl GameSettings {
    pub fn new(
        theme_id: impl Into<String>,
        teams: Vec<String>,
        target_score: u32,
        round_duration_secs: u32,
        skip_penalty: bool,
    ) -> Result<Self, ConfigError> {
        let settings = Self {
            theme_id: theme_id.into(),
            teams: teams.into_iter().map(|t| t.trim().to_string()).collect(),
            target_score,
            round_duration_secs,
            skip_penalty,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Check every bound. Also run on deserialized settings from a snapshot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.teams.len() < MIN_TEAMS {
            return Err(ConfigError::TooFewTeams {
                min: MIN_TEAMS,
                count: self.teams.len(),
            });
        }

        let mut seen = HashSet::new();
        for team in &self.teams {
            if team.trim().is_empty() {
                return Err(ConfigError::EmptyTeamName);
            }
            if !seen.insert(team.as_str()) {
                return Err(ConfigError::DuplicateTeam(team.clone()));
            }
        }

        if !(MIN_TARGET_SCORE..=MAX_TARGET_SCORE).contains(&self.target_score) {
            return Err(ConfigError::TargetOutOfRange(self.target_score));
        }

        if !(MIN_ROUND_SECS..=MAX_ROUND_SECS).contains(&self.round_duration_secs) {
            return Err(ConfigError::DurationOutOfRange(self.round_duration_secs));
        }
        if self.round_duration_secs % ROUND_SECS_STEP != 0 {
            return Err(ConfigError::DurationOffStep(self.round_duration_secs));
        }

        Ok(())
    }

    pub fn theme_id(&self) -> &str {
        &self.theme_id
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn target_score(&self) -> u32 {
        self.target_score
    }

    pub fn round_duration_secs(&self) -> u32 {
        self.round_duration_secs
    }

    pub fn skip_penalty(&self) -> bool {
        self.skip_penalty
    }
}
