use super::error::{ConfigError, SnapshotError};
use super::state::{GameState, RoundPhase};
use super::theme::Theme;

pub fn encode(state: &GameState) -> Result<String, serde_json::Error> {
    serde_json::to_string(state)
}

/// Parse a persisted state. Structural checks happen in [`validate`].
pub fn decode(json: &str) -> Result<GameState, SnapshotError> {
    Ok(serde_json::from_str(json)?)
}

/// Reject persisted state that the session could not safely continue from
pub fn validate(state: &GameState, theme: &Theme) -> Result<(), SnapshotError> {
    state.settings.validate()?;

    if state.settings.theme_id() != theme.id {
        return Err(ConfigError::ThemeMismatch {
            expected: state.settings.theme_id().to_string(),
            actual: theme.id.clone(),
        }
        .into());
    }

    let teams = state.settings.teams();
    if !state.scores.matches_teams(teams) {
        return Err(SnapshotError::ScoreTeamsMismatch);
    }
    if state.current_team_index >= teams.len() {
        return Err(SnapshotError::TeamIndexOutOfRange(state.current_team_index));
    }
    if state.current_round == 0 {
        return Err(SnapshotError::InvalidRound);
    }

    let len = state.queue.len();
    if state.queue.cursor() > len {
        return Err(SnapshotError::CursorOutOfRange {
            cursor: state.queue.cursor(),
            len,
        });
    }
    if state.round_results.len() > len {
        return Err(SnapshotError::TooManyResults {
            results: state.round_results.len(),
            len,
        });
    }

    let round_running = matches!(
        state.phase,
        RoundPhase::Active { .. } | RoundPhase::Paused { .. }
    );
    if round_running && state.queue.current().is_none() {
        return Err(SnapshotError::NoCurrentWord);
    }

    if let RoundPhase::GameOver { winners } = &state.phase
        && let Some(unknown) = winners.iter().find(|w| !teams.contains(*w))
    {
        return Err(SnapshotError::UnknownWinner(unknown.clone()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::core::scoreboard::{RoundResult, ScoreBoard};
    use crate::game::core::settings::GameSettings;
    use crate::game::core::word_queue::WordQueue;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn theme() -> Theme {
        Theme {
            id: "animals".to_string(),
            name: "Animals".to_string(),
            language: "en".to_string(),
            difficulty: "easy".to_string(),
            words: vec!["cat".to_string(), "dog".to_string()],
            teams: vec![],
        }
    }

    fn state() -> GameState {
        let settings = GameSettings::new(
            "animals",
            vec!["Red".to_string(), "Blue".to_string()],
            20,
            60,
            false,
        )
        .unwrap();
        GameState::new(settings)
    }

    #[test]
    fn fresh_state_round_trips_and_validates() {
        let original = state();
        let decoded = decode(&encode(&original).unwrap()).unwrap();

        assert_eq!(decoded, original);
        assert!(validate(&decoded, &theme()).is_ok());
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(decode("{not json"), Err(SnapshotError::Malformed(_))));
        assert!(matches!(decode(r#"{"settings":{}}"#), Err(SnapshotError::Malformed(_))));
    }

    #[test]
    fn rejects_missing_team_scores() {
        let mut state = state();
        state.scores = ScoreBoard::new(&["Red".to_string()]);
        assert!(matches!(
            validate(&state, &theme()),
            Err(SnapshotError::ScoreTeamsMismatch)
        ));
    }

    #[test]
    fn rejects_team_index_out_of_range() {
        let mut state = state();
        state.current_team_index = 2;
        assert!(matches!(
            validate(&state, &theme()),
            Err(SnapshotError::TeamIndexOutOfRange(2))
        ));
    }

    #[test]
    fn rejects_results_beyond_draw_order() {
        let mut state = state();
        state.round_results = vec![RoundResult::new("cat", true)];
        assert!(matches!(
            validate(&state, &theme()),
            Err(SnapshotError::TooManyResults { results: 1, len: 0 })
        ));
    }

    #[test]
    fn rejects_invalid_settings_from_tampered_json() {
        let json = encode(&state()).unwrap().replace(r#""target_score":20"#, r#""target_score":5"#);
        let decoded = decode(&json).unwrap();
        assert!(matches!(
            validate(&decoded, &theme()),
            Err(SnapshotError::Settings(ConfigError::TargetOutOfRange(5)))
        ));
    }

    #[test]
    fn rejects_unknown_winner() {
        let mut state = state();
        state.phase = RoundPhase::GameOver {
            winners: vec!["Green".to_string()],
        };
        assert!(matches!(
            validate(&state, &theme()),
            Err(SnapshotError::UnknownWinner(_))
        ));
    }

    #[test]
    fn paused_round_needs_a_word_on_screen() {
        let mut state = state();
        state.phase = RoundPhase::Paused { remaining_secs: 20 };
        assert!(matches!(
            validate(&state, &theme()),
            Err(SnapshotError::NoCurrentWord)
        ));

        let mut rng = StdRng::seed_from_u64(1);
        state.queue = WordQueue::shuffled(vec!["cat".to_string()], &mut rng);
        assert!(validate(&state, &theme()).is_ok());

        state.queue.advance();
        state.round_results = vec![RoundResult::new("cat", true)];
        assert!(matches!(
            validate(&state, &theme()),
            Err(SnapshotError::NoCurrentWord)
        ));
    }

    #[test]
    fn rejects_other_theme() {
        let mut other = theme();
        other.id = "food".to_string();
        assert!(matches!(
            validate(&state(), &other),
            Err(SnapshotError::Settings(ConfigError::ThemeMismatch { .. }))
        ));
    }
}
