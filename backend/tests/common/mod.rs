#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use wordrush::messages::{ClientMessage, ServerMessage};
use wordrush::{GameRegistry, ManualClock};

pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

pub const T0: u64 = 1_700_000_000_000;

pub struct TestServer {
    base_url: String,
    pub clock: Arc<ManualClock>,
}

impl TestServer {
    pub fn ws_url(&self) -> String {
        format!("{}/ws", self.base_url)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!(
            "http://{}{}",
            self.base_url.strip_prefix("ws://").unwrap(),
            path
        )
    }

    /// Move the game clock forward, as if players waited
    pub fn advance(&self, secs: u64) {
        self.clock.advance(Duration::from_secs(secs));
    }
}

pub async fn spawn_test_server() -> TestServer {
    let pool = sqlx::SqlitePool::connect(":memory:").await.unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();

    let clock = Arc::new(ManualClock::new(T0));
    let registry = GameRegistry::new(pool)
        .with_clock(clock.clone())
        .with_tick_interval(Duration::from_millis(10));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let app = wordrush::app_with_registry(Arc::new(registry));
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("ws://{}", addr),
        clock,
    }
}

pub async fn connect(server: &TestServer) -> WsStream {
    let (ws, _) = connect_async(&server.ws_url()).await.expect("Failed to connect");
    ws
}

pub fn msg(client_msg: &ClientMessage) -> Message {
    let json = serde_json::to_string(client_msg).unwrap();
    Message::Text(json.into())
}

pub fn create_game_msg(target_score: u32) -> Message {
    msg(&ClientMessage::CreateGame {
        theme_id: "animals".to_string(),
        teams: vec!["Red".to_string(), "Blue".to_string()],
        target_score,
        round_duration_secs: 30,
        skip_penalty: false,
        seed: Some(7),
    })
}

pub async fn send(ws: &mut WsStream, client_msg: ClientMessage) {
    ws.send(msg(&client_msg)).await.unwrap();
}

pub async fn recv(ws: &mut WsStream) -> ServerMessage {
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("Timed out waiting for server message")
        .unwrap()
        .unwrap();
    serde_json::from_str(msg.to_text().unwrap()).unwrap()
}

/// Create a game on this connection and return its id
pub async fn create_game(ws: &mut WsStream, target_score: u32) -> String {
    ws.send(create_game_msg(target_score)).await.unwrap();
    match recv(ws).await {
        ServerMessage::GameCreated { game_id, .. } => game_id,
        other => panic!("Expected GameCreated, got {other:?}"),
    }
}
