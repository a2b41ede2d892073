pub use super::events::SessionEvent;
pub use super::scoreboard::{RoundResult, TeamScore};
pub use super::session::GameView;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    // Session setup
    CreateGame {
        theme_id: String,
        /// Empty to use the theme's first two suggestions
        #[serde(default)]
        teams: Vec<String>,
        target_score: u32,
        round_duration_secs: u32,
        #[serde(default)]
        skip_penalty: bool,
        /// Fixed shuffle seed, for reproducible games
        #[serde(default)]
        seed: Option<u64>,
    },
    Watch {
        game_id: String,
    },
    ResumeGame {
        game_id: String,
    },

    // Round play
    StartRound,
    Guess,
    Skip,
    Pause,
    Resume,
    EndRound,
    ConfirmResults {
        #[serde(default)]
        results: Option<Vec<RoundResult>>,
    },
    Abandon,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    GameCreated {
        game_id: String,
        teams: Vec<String>,
    },
    GameView {
        game_id: String,
        view: GameView,
    },
    Event {
        event: SessionEvent,
    },
    /// The action was not legal right now; nothing changed
    Rejected {
        reason: String,
    },
    GameNotFound,
    GameAbandoned,
    Error {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_create_game_with_defaults() {
        let json = r#"{"type": "create_game", "theme_id": "animals", "target_score": 20, "round_duration_secs": 60}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert_eq!(
            msg,
            ClientMessage::CreateGame {
                theme_id: "animals".to_string(),
                teams: vec![],
                target_score: 20,
                round_duration_secs: 60,
                skip_penalty: false,
                seed: None,
            }
        );
    }

    #[test]
    fn deserialize_unit_actions() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type": "start_round"}"#).unwrap();
        assert_eq!(msg, ClientMessage::StartRound);

        let msg: ClientMessage = serde_json::from_str(r#"{"type": "end_round"}"#).unwrap();
        assert_eq!(msg, ClientMessage::EndRound);
    }

    #[test]
    fn deserialize_confirm_without_overrides() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type": "confirm_results"}"#).unwrap();
        assert_eq!(msg, ClientMessage::ConfirmResults { results: None });
    }

    #[test]
    fn serialize_wrapped_event() {
        let msg = ServerMessage::Event {
            event: SessionEvent::RoundPaused { remaining_secs: 12 },
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"type":"event","event":{"type":"round_paused","remaining_secs":12}}"#
        );
    }

    #[test]
    fn serialize_game_not_found() {
        let json = serde_json::to_string(&ServerMessage::GameNotFound).unwrap();
        assert_eq!(json, r#"{"type":"game_not_found"}"#);
    }
}
