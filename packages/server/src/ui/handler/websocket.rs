//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, UserIdentity},
    infrastructure::{
        broadcast,
        dto::websocket::{ClientAction, ServerEvent},
    },
    ui::state::{AppState, ConnectQuery},
    usecase::{
        DisconnectUseCase, JoinHouseUseCase, JoinPrivateHouseUseCase, LeaveHouseUseCase,
        SendMessageUseCase,
    },
};

/// Inbound action tags the relay understands. Frames with an unknown tag
/// are ignored so older servers tolerate newer clients.
const KNOWN_ACTIONS: &[&str] = &[
    "join-house",
    "join-house-private",
    "leave-house",
    "send-message",
];

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Resolve the identity before the upgrade; a bad credential never
    // becomes an active connection.
    let identity = match state
        .resolver
        .resolve(query.bearer.as_deref(), query.name.as_deref())
    {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!("Refusing connection: {}", e);
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    tracing::info!("'{}' connecting (id: {})", identity.name, identity.id);
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, identity)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, identity: UserIdentity) {
    let (tx, mut rx) = mpsc::channel(state.config.outbound_capacity);
    // Keep a clone for sender-only events; the registry owns the other.
    let outbound = tx.clone();
    let connection_id = state.registry.register(identity.clone(), tx).await;

    let (mut sender, mut receiver) = socket.split();

    // Drain the outbound queue into the socket.
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // Read and dispatch inbound frames.
    let recv_state = state.clone();
    let recv_identity = identity.clone();
    let mut recv_task = tokio::spawn(async move {
        let mut malformed = 0u32;
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", recv_identity.name, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let action = match parse_frame(&text) {
                        Inbound::Action(action) => action,
                        Inbound::UnknownAction(tag) => {
                            tracing::debug!(
                                "Ignoring unknown action '{}' from '{}'",
                                tag,
                                recv_identity.name
                            );
                            continue;
                        }
                        Inbound::Malformed(e) => {
                            malformed += 1;
                            tracing::warn!(
                                "Malformed frame from '{}' ({}/{}): {}",
                                recv_identity.name,
                                malformed,
                                recv_state.config.malformed_limit,
                                e
                            );
                            if malformed >= recv_state.config.malformed_limit {
                                tracing::warn!(
                                    "Closing '{}': malformed frame limit reached",
                                    recv_identity.name
                                );
                                break;
                            }
                            continue;
                        }
                    };

                    dispatch(&recv_state, connection_id, &recv_identity, &outbound, action)
                        .await;
                }
                Message::Close(_) => {
                    tracing::info!("'{}' requested close", recv_identity.name);
                    break;
                }
                // Ping/pong is handled by the protocol layer.
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let disconnect = DisconnectUseCase::new(state.registry.clone());
    disconnect.execute(connection_id, &identity).await;
}

/// Outcome of parsing one inbound text frame.
enum Inbound {
    Action(ClientAction),
    UnknownAction(String),
    Malformed(serde_json::Error),
}

fn parse_frame(text: &str) -> Inbound {
    match serde_json::from_str::<ClientAction>(text) {
        Ok(action) => Inbound::Action(action),
        Err(e) => {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(text)
                && let Some(tag) = value.get("action").and_then(|v| v.as_str())
                && !KNOWN_ACTIONS.contains(&tag)
            {
                return Inbound::UnknownAction(tag.to_string());
            }
            Inbound::Malformed(e)
        }
    }
}

/// Route one action through its usecase. Failures surface to the sender
/// as an `error` event when user-visible, otherwise they are logged and
/// dropped; the connection stays open either way.
async fn dispatch(
    state: &Arc<AppState>,
    connection_id: ConnectionId,
    identity: &UserIdentity,
    outbound: &mpsc::Sender<String>,
    action: ClientAction,
) {
    let result = match action {
        ClientAction::JoinHouse { message } => {
            let usecase = JoinHouseUseCase::new(state.registry.clone());
            usecase.execute(connection_id, identity, message).await.map(Some)
        }
        ClientAction::JoinHousePrivate { message } => {
            let usecase = JoinPrivateHouseUseCase::new(state.registry.clone());
            usecase.execute(connection_id, identity, message).await.map(Some)
        }
        ClientAction::LeaveHouse { message } => {
            let usecase = LeaveHouseUseCase::new(state.registry.clone());
            usecase
                .execute(connection_id, identity, message)
                .await
                .map(|_| None)
        }
        ClientAction::SendMessage { message, house } => {
            let usecase = SendMessageUseCase::new(state.registry.clone());
            usecase
                .execute(connection_id, identity, house, message)
                .await
                .map(|_| None)
        }
    };

    let reply: Option<ServerEvent> = match result {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("Action from '{}' failed: {}", identity.name, e);
            e.to_event()
        }
    };

    if let Some(event) = reply {
        // Sender-only replies are enqueued outside the registry lock, so
        // a concurrent broadcast can land in the queue first. A
        // house-joined snapshot may therefore repeat a message delivered
        // just before it; the FIFO guarantee covers house fanout only.
        broadcast::send_frame_to(&connection_id, outbound, &event.to_frame());
    }
}
