pub mod config;
mod game;

pub use game::engine::{Clock, ManualClock, SystemClock};
pub use game::messages;
pub use game::{GameRegistry, ws};

use axum::{
    Json, Router,
    extract::{Path, State, WebSocketUpgrade, ws::WebSocket},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use game::core::error::CatalogError;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;

async fn health() -> &'static str {
    "ok"
}

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<GameRegistry>,
}

async fn list_themes(State(state): State<AppState>) -> Response {
    match state.registry.themes.list_themes().await {
        Ok(themes) => Json(themes).into_response(),
        Err(err) => catalog_failure(err),
    }
}

async fn get_theme(Path(id): Path<String>, State(state): State<AppState>) -> Response {
    match state.registry.themes.get_theme(&id).await {
        Ok(theme) => Json(theme).into_response(),
        Err(err) => catalog_failure(err),
    }
}

async fn get_game(Path(id): Path<String>, State(state): State<AppState>) -> Response {
    match state.registry.view(&id) {
        Some(view) => Json(view).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn catalog_failure(err: CatalogError) -> Response {
    match err {
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND.into_response(),
        CatalogError::FetchFailed(err) => {
            warn!(%err, "Catalog query failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    ws::run_connection(socket, state.registry).await;
}

pub fn app(pool: SqlitePool) -> Router {
    app_with_registry(Arc::new(GameRegistry::new(pool)))
}

pub fn app_with_registry(registry: Arc<GameRegistry>) -> Router {
    let state = AppState { registry };

    Router::new()
        .route("/health", get(health))
        .route("/themes", get(list_themes))
        .route("/themes/:id", get(get_theme))
        .route("/games/:id", get(get_game))
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
