use super::clock::Clock;
use crate::game::core::events::SessionEvent;
use crate::game::core::session::GameSession;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(250);
/// How long a finished game stays watchable before it is dropped
pub const DEFAULT_FINISHED_RETENTION: Duration = Duration::from_secs(60);
const EVENT_BUFFER: usize = 64;

/// A running game: pure session logic plus the channel its events go out on
pub struct ActiveGame {
    pub session: GameSession,
    events: broadcast::Sender<SessionEvent>,
}

impl ActiveGame {
    pub fn new(session: GameSession) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self { session, events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn broadcast(&self, events: &[SessionEvent]) {
        for event in events {
            // No subscribers is fine; the game keeps running
            let _ = self.events.send(event.clone());
        }
    }
}

/// Spawns the countdown poller for a game.
///
/// Each tick re-reads the clock and lets the session decide whether the round
/// timed out. The task ends once the game is over or removed.
pub fn spawn_round_ticker(
    games: Arc<DashMap<String, ActiveGame>>,
    clock: Arc<dyn Clock>,
    game_id: String,
    interval: Duration,
) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let Some(mut game) = games.get_mut(&game_id) else {
                debug!(game_id, "Game removed, stopping ticker");
                return;
            };
            if game.session.is_over() {
                debug!(game_id, "Game over, stopping ticker");
                return;
            }

            let events = game.session.tick(clock.now_ms());
            if events.is_empty() {
                continue;
            }

            info!(
                game_id,
                team = game.session.current_team(),
                round = game.session.state().current_round,
                results = game.session.state().round_results.len(),
                "Round timed out"
            );
            game.broadcast(&events);
        }
    });
}

/// Drops a finished game once late watchers have had a chance to see the result
pub fn spawn_finished_game_cleanup(
    games: Arc<DashMap<String, ActiveGame>>,
    game_id: String,
    delay: Duration,
) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if games
            .remove_if(&game_id, |_, game| game.session.is_over())
            .is_some()
        {
            debug!(game_id, "Finished game removed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::core::Theme;
    use crate::game::core::settings::GameSettings;
    use crate::game::core::state::RoundPhase;
    use crate::game::engine::clock::ManualClock;

    fn game() -> ActiveGame {
        let theme = Theme {
            id: "t".to_string(),
            name: "T".to_string(),
            language: "en".to_string(),
            difficulty: "easy".to_string(),
            words: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            teams: vec![],
        };
        let settings =
            GameSettings::new("t", vec!["A".to_string(), "B".to_string()], 10, 15, false).unwrap();
        ActiveGame::new(GameSession::with_seed(settings, theme, 9).unwrap())
    }

    #[tokio::test]
    async fn ticker_ends_round_once_when_clock_runs_out() {
        let clock = Arc::new(ManualClock::new(0));
        let games = Arc::new(DashMap::new());
        let mut game = game();
        game.session.start_round(0).unwrap();
        let mut rx = game.subscribe();
        games.insert("g".to_string(), game);

        spawn_round_ticker(
            games.clone(),
            clock.clone(),
            "g".to_string(),
            Duration::from_millis(5),
        );

        clock.set(15_000);
        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(event, SessionEvent::RoundEnded { timed_out: true, .. }));

        // Nothing else fires while the round waits for confirmation
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
        assert!(matches!(
            games.get("g").unwrap().session.phase(),
            RoundPhase::Ended { .. }
        ));
    }

    #[tokio::test]
    async fn cleanup_leaves_running_games_alone() {
        let games = Arc::new(DashMap::new());
        games.insert("g".to_string(), game());

        spawn_finished_game_cleanup(games.clone(), "g".to_string(), Duration::from_millis(5));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(games.contains_key("g"));
    }

    #[tokio::test]
    async fn subscribers_receive_broadcast_events() {
        let game = game();
        let mut rx = game.subscribe();

        game.broadcast(&[SessionEvent::RoundPaused { remaining_secs: 3 }]);

        assert_eq!(
            rx.recv().await.unwrap(),
            SessionEvent::RoundPaused { remaining_secs: 3 }
        );
    }
}
