use super::core::events::SessionEvent;
use super::core::messages::{ClientMessage, ServerMessage};
use super::core::session::{GameSession, Transition};
use super::engine::{EngineError, GameRegistry, NewGame};
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const CONNECTION_BUFFER: usize = 64;

/// Per-connection state: the game this socket plays or watches
struct ConnectionContext {
    game_id: Option<String>,
    forwarder: Option<JoinHandle<()>>,
}

impl ConnectionContext {
    fn new() -> Self {
        Self {
            game_id: None,
            forwarder: None,
        }
    }

    /// Follow a game's events, replacing any previous subscription
    fn attach(
        &mut self,
        game_id: String,
        events: broadcast::Receiver<SessionEvent>,
        tx: broadcast::Sender<ServerMessage>,
    ) {
        self.detach();
        self.game_id = Some(game_id);
        self.forwarder = Some(tokio::spawn(forward_events(events, tx)));
    }

    fn detach(&mut self) {
        self.game_id = None;
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
    }
}

impl Drop for ConnectionContext {
    fn drop(&mut self) {
        self.detach();
    }
}

async fn forward_events(
    mut events: broadcast::Receiver<SessionEvent>,
    tx: broadcast::Sender<ServerMessage>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if tx.send(ServerMessage::Event { event }).is_err() {
                    return;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Connection fell behind on game events");
            }
            Err(RecvError::Closed) => return,
        }
    }
}

/// Run a WebSocket connection against the registry.
/// Splits the socket, spawns send/receive tasks and waits for either to finish.
pub async fn run_connection(socket: WebSocket, registry: Arc<GameRegistry>) {
    info!("New WebSocket connection");
    let (mut sender, receiver) = socket.split();
    let (tx, mut rx) = broadcast::channel::<ServerMessage>(CONNECTION_BUFFER);

    // Task to send messages from the broadcast channel to the WebSocket
    let send_task = tokio::spawn(async move {
        while let Ok(msg) = rx.recv().await {
            debug!(?msg, "Sending message to client");
            let Ok(json) = serde_json::to_string(&msg) else {
                continue;
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(receive_loop(receiver, tx, registry));

    tokio::select! {
        _ = send_task => {},
        result = recv_task => {
            if let Ok(Some(game_id)) = result {
                debug!(game_id, "Client left game");
            }
        },
    }

    info!("WebSocket connection closed");
}

async fn receive_loop(
    mut receiver: futures_util::stream::SplitStream<WebSocket>,
    tx: broadcast::Sender<ServerMessage>,
    registry: Arc<GameRegistry>,
) -> Option<String> {
    let mut ctx = ConnectionContext::new();

    while let Some(Ok(msg)) = receiver.next().await {
        let Message::Text(text) = msg else {
            debug!("Received non-text message, ignoring");
            continue;
        };

        debug!(raw = %text, "Received message");

        let Ok(client_msg) = serde_json::from_str::<ClientMessage>(&text) else {
            warn!(raw = %text, "Failed to parse client message");
            let _ = tx.send(ServerMessage::Error {
                message: "Unrecognised message".to_string(),
            });
            continue;
        };

        handle_message(client_msg, &tx, &registry, &mut ctx).await;
    }

    ctx.game_id.clone()
}

async fn handle_message(
    msg: ClientMessage,
    tx: &broadcast::Sender<ServerMessage>,
    registry: &Arc<GameRegistry>,
    ctx: &mut ConnectionContext,
) {
    match msg {
        ClientMessage::CreateGame {
            theme_id,
            teams,
            target_score,
            round_duration_secs,
            skip_penalty,
            seed,
        } => {
            let request = NewGame {
                theme_id,
                teams,
                target_score,
                round_duration_secs,
                skip_penalty,
                seed,
            };
            match registry.create_game(request).await {
                Ok(created) => {
                    let _ = tx.send(ServerMessage::GameCreated {
                        game_id: created.game_id.clone(),
                        teams: created.teams,
                    });
                    ctx.attach(created.game_id, created.events, tx.clone());
                }
                Err(err) => send_error(tx, err),
            }
        }
        ClientMessage::Watch { game_id } => {
            let Some((view, events)) = registry.watch(&game_id) else {
                let _ = tx.send(ServerMessage::GameNotFound);
                return;
            };
            let _ = tx.send(ServerMessage::GameView {
                game_id: game_id.clone(),
                view,
            });
            ctx.attach(game_id, events, tx.clone());
        }
        ClientMessage::ResumeGame { game_id } => match registry.resume_saved(&game_id).await {
            Ok((view, events)) => {
                let _ = tx.send(ServerMessage::GameView {
                    game_id: game_id.clone(),
                    view,
                });
                ctx.attach(game_id, events, tx.clone());
            }
            Err(err) => send_error(tx, err),
        },
        ClientMessage::Abandon => {
            let Some(game_id) = ctx.game_id.clone() else {
                send_no_game(tx);
                return;
            };
            ctx.detach();
            match registry.abandon(&game_id).await {
                Ok(()) => {
                    let _ = tx.send(ServerMessage::GameAbandoned);
                }
                Err(err) => send_error(tx, err),
            }
        }
        ClientMessage::StartRound => play(registry, ctx, tx, |s, now| s.start_round(now)).await,
        ClientMessage::Guess => play(registry, ctx, tx, |s, now| s.guess(now)).await,
        ClientMessage::Skip => play(registry, ctx, tx, |s, now| s.skip(now)).await,
        ClientMessage::Pause => play(registry, ctx, tx, |s, now| s.pause(now)).await,
        ClientMessage::Resume => play(registry, ctx, tx, |s, now| s.resume(now)).await,
        ClientMessage::EndRound => play(registry, ctx, tx, |s, now| s.end_round(now)).await,
        ClientMessage::ConfirmResults { results } => {
            play(registry, ctx, tx, move |s, now| s.confirm_results(now, results)).await
        }
    }
}

/// Apply a round-play action to the connection's game. Successful actions
/// reach every subscriber through the game's event channel.
async fn play<F>(
    registry: &Arc<GameRegistry>,
    ctx: &ConnectionContext,
    tx: &broadcast::Sender<ServerMessage>,
    action: F,
) where
    F: FnOnce(&mut GameSession, u64) -> Transition,
{
    let Some(game_id) = ctx.game_id.as_deref() else {
        send_no_game(tx);
        return;
    };
    if let Err(err) = registry.act(game_id, action).await {
        send_error(tx, err);
    }
}

fn send_no_game(tx: &broadcast::Sender<ServerMessage>) {
    let _ = tx.send(ServerMessage::Error {
        message: "Create, watch or resume a game first".to_string(),
    });
}

fn send_error(tx: &broadcast::Sender<ServerMessage>, err: EngineError) {
    let msg = match err {
        EngineError::GameNotFound(_) => ServerMessage::GameNotFound,
        EngineError::Transition(reason) => ServerMessage::Rejected {
            reason: reason.to_string(),
        },
        other => {
            warn!(error = %other, "Request failed");
            ServerMessage::Error {
                message: other.to_string(),
            }
        }
    };
    let _ = tx.send(msg);
}
