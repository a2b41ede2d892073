use super::active_game::{
    ActiveGame, DEFAULT_FINISHED_RETENTION, DEFAULT_TICK_INTERVAL, spawn_finished_game_cleanup,
    spawn_round_ticker,
};
use super::clock::{Clock, SystemClock};
use crate::game::core::error::{CatalogError, ConfigError, TransitionError};
use crate::game::core::events::SessionEvent;
use crate::game::core::session::{GameSession, GameView, Transition};
use crate::game::core::settings::{GameSettings, MIN_TEAMS};
use crate::game::core::state::{GameState, RoundPhase};
use crate::game::core::{SnapshotRepository, ThemeRepository, snapshot};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("game {0} not found")]
    GameNotFound(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Parameters for a new game, as sent by the client
#[derive(Debug, Clone)]
pub struct NewGame {
    pub theme_id: String,
    pub teams: Vec<String>,
    pub target_score: u32,
    pub round_duration_secs: u32,
    pub skip_penalty: bool,
    pub seed: Option<u64>,
}

pub struct CreatedGame {
    pub game_id: String,
    pub teams: Vec<String>,
    pub events: broadcast::Receiver<SessionEvent>,
}

/// All running games, their countdown tickers, and the catalog and
/// persistence collaborators they need
pub struct GameRegistry {
    pub themes: ThemeRepository,
    pub snapshots: SnapshotRepository,
    pub games: Arc<DashMap<String, ActiveGame>>,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    finished_retention: Duration,
}

impl GameRegistry {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            themes: ThemeRepository::new(pool.clone()),
            snapshots: SnapshotRepository::new(pool),
            games: Arc::new(DashMap::new()),
            clock: Arc::new(SystemClock),
            tick_interval: DEFAULT_TICK_INTERVAL,
            finished_retention: DEFAULT_FINISHED_RETENTION,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_finished_retention(mut self, retention: Duration) -> Self {
        self.finished_retention = retention;
        self
    }

    pub fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Fetch the theme, validate settings and register a fresh session
    pub async fn create_game(&self, request: NewGame) -> Result<CreatedGame, EngineError> {
        let theme = self.themes.get_theme(&request.theme_id).await?;

        let teams = if request.teams.is_empty() {
            theme.teams.iter().take(MIN_TEAMS).cloned().collect()
        } else {
            request.teams
        };
        let settings = GameSettings::new(
            theme.id.clone(),
            teams,
            request.target_score,
            request.round_duration_secs,
            request.skip_penalty,
        )?;

        let rng = match request.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let session = GameSession::new(settings, theme, rng)?;
        let teams = session.state().settings.teams().to_vec();

        let game_id = uuid::Uuid::new_v4().to_string();
        let game = ActiveGame::new(session);
        let events = game.subscribe();
        self.games.insert(game_id.clone(), game);
        self.spawn_ticker(&game_id);

        info!(game_id, theme = request.theme_id, ?teams, "Game created");

        Ok(CreatedGame {
            game_id,
            teams,
            events,
        })
    }

    /// Run one action against a game's session and publish what it emitted.
    ///
    /// Entering a pause saves a snapshot; leaving it by any route clears it.
    /// Storage runs after the game entry is released.
    pub async fn act<F>(&self, game_id: &str, action: F) -> Result<Vec<SessionEvent>, EngineError>
    where
        F: FnOnce(&mut GameSession, u64) -> Transition,
    {
        let (events, left_pause, paused_state, over) = {
            let mut game = self
                .games
                .get_mut(game_id)
                .ok_or_else(|| EngineError::GameNotFound(game_id.to_string()))?;

            let was_paused = matches!(game.session.phase(), RoundPhase::Paused { .. });
            let events = action(&mut game.session, self.now()).inspect_err(|err| {
                debug!(game_id, %err, "Action rejected");
            })?;

            game.broadcast(&events);
            let paused = matches!(game.session.phase(), RoundPhase::Paused { .. });
            let paused_state = (paused && !was_paused).then(|| game.session.state().clone());
            (events, was_paused && !paused, paused_state, game.session.is_over())
        };

        for event in &events {
            log_event(game_id, event);
        }

        if let Some(state) = paused_state {
            self.save_snapshot(game_id, &state).await;
        } else if left_pause || over {
            self.clear_snapshot(game_id).await;
        }

        if over {
            spawn_finished_game_cleanup(
                self.games.clone(),
                game_id.to_string(),
                self.finished_retention,
            );
        }

        Ok(events)
    }

    pub fn view(&self, game_id: &str) -> Option<GameView> {
        let game = self.games.get(game_id)?;
        Some(game.session.view(self.now()))
    }

    /// Current view plus a subscription to further events
    pub fn watch(&self, game_id: &str) -> Option<(GameView, broadcast::Receiver<SessionEvent>)> {
        let game = self.games.get(game_id)?;
        Some((game.session.view(self.now()), game.subscribe()))
    }

    /// Attach to a game, reloading it from its saved snapshot if it is not running.
    /// A snapshot that fails validation is discarded and reported as not found.
    pub async fn resume_saved(
        &self,
        game_id: &str,
    ) -> Result<(GameView, broadcast::Receiver<SessionEvent>), EngineError> {
        if let Some(watching) = self.watch(game_id) {
            return Ok(watching);
        }

        let not_found = || EngineError::GameNotFound(game_id.to_string());

        let json = match self.snapshots.load(game_id).await {
            Ok(Some(json)) => json,
            Ok(None) => return Err(not_found()),
            Err(err) => {
                warn!(game_id, %err, "Failed to load snapshot");
                return Err(not_found());
            }
        };

        let state = match snapshot::decode(&json) {
            Ok(state) => state,
            Err(err) => {
                warn!(game_id, %err, "Discarding unreadable snapshot");
                self.clear_snapshot(game_id).await;
                return Err(not_found());
            }
        };

        let theme = self.themes.get_theme(state.settings.theme_id()).await?;
        let session = match GameSession::restore(state, theme, StdRng::from_os_rng()) {
            Ok(session) => session,
            Err(err) => {
                warn!(game_id, %err, "Discarding invalid snapshot");
                self.clear_snapshot(game_id).await;
                return Err(not_found());
            }
        };

        // A concurrent resume may have restored it first
        let inserted = match self.games.entry(game_id.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(ActiveGame::new(session));
                true
            }
        };
        if inserted {
            self.spawn_ticker(game_id);
            info!(game_id, "Game restored from snapshot");
        }

        self.watch(game_id).ok_or_else(not_found)
    }

    /// Drop a game and anything saved for it
    pub async fn abandon(&self, game_id: &str) -> Result<(), EngineError> {
        if self.games.remove(game_id).is_none() {
            return Err(EngineError::GameNotFound(game_id.to_string()));
        }
        self.clear_snapshot(game_id).await;
        info!(game_id, "Game abandoned");
        Ok(())
    }

    fn spawn_ticker(&self, game_id: &str) {
        spawn_round_ticker(
            self.games.clone(),
            self.clock.clone(),
            game_id.to_string(),
            self.tick_interval,
        );
    }

    async fn save_snapshot(&self, game_id: &str, state: &GameState) {
        let json = match snapshot::encode(state) {
            Ok(json) => json,
            Err(err) => {
                warn!(game_id, %err, "Failed to encode snapshot");
                return;
            }
        };
        if let Err(err) = self.snapshots.save(game_id, &json, self.now()).await {
            warn!(game_id, %err, "Failed to save snapshot");
        }
    }

    async fn clear_snapshot(&self, game_id: &str) {
        if let Err(err) = self.snapshots.clear(game_id).await {
            warn!(game_id, %err, "Failed to clear snapshot");
        }
    }
}

fn log_event(game_id: &str, event: &SessionEvent) {
    match event {
        SessionEvent::RoundStarted { team, round, .. } => {
            info!(game_id, team, round, "Round started");
        }
        SessionEvent::RoundEnded {
            team,
            reason,
            results,
            ..
        } => {
            info!(game_id, team, ?reason, resolved = results.len(), "Round ended");
        }
        SessionEvent::CheatFlagged { team } => {
            warn!(game_id, team, "Guessing too fast, round blocked");
        }
        SessionEvent::ResultsConfirmed { team, delta, .. } => {
            info!(game_id, team, delta, "Results confirmed");
        }
        SessionEvent::GameOver { winners, .. } => {
            info!(game_id, ?winners, "Game over");
        }
        other => debug!(game_id, ?other, "Session event"),
    }
}
