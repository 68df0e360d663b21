//! WebSocket connection handlers.
//!
//! Each accepted socket gets a fresh `ConnectionId`. Inbound frames are decoded
//! into `ClientEvent`s and dispatched to the coordinator; outbound frames arrive
//! on the connection's channel and are written by `pusher_loop`. When either
//! side ends, the connection is disconnected from the coordinator exactly once.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ParticipantName, RoomKey},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::{CoordinatorError, RoomCoordinator},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let connection = ConnectionId::generate();
    ws.on_upgrade(move |socket| handle_socket(socket, state, connection))
}

/// Route a decoded client event to the matching coordinator operation.
///
/// Raw payload strings are validated into value objects here; an empty room
/// key (or an empty name on `join`) yields `CoordinatorError::InvalidInput`
/// and nothing is broadcast.
pub async fn dispatch_event(
    coordinator: &RoomCoordinator,
    connection: ConnectionId,
    event: ClientEvent,
) -> Result<(), CoordinatorError> {
    match event {
        ClientEvent::Join(payload) => {
            let room = RoomKey::try_from(payload.room_id)?;
            let name = ParticipantName::try_from(payload.user_name)?;
            coordinator.join(connection, room, name).await
        }
        ClientEvent::CodeChange(payload) => {
            let room = RoomKey::try_from(payload.room_id)?;
            coordinator.code_change(connection, room, payload.code).await
        }
        ClientEvent::LanguageChange(payload) => {
            let room = RoomKey::try_from(payload.room_id)?;
            coordinator
                .language_change(connection, room, payload.language)
                .await
        }
        ClientEvent::Typing(payload) => {
            let room = RoomKey::try_from(payload.room_id)?;
            coordinator.typing(connection, room, payload.user_name).await
        }
        ClientEvent::StopTyping(payload) => {
            let room = RoomKey::try_from(payload.room_id)?;
            coordinator.stop_typing(connection, room).await
        }
        ClientEvent::LeaveRoom => coordinator.leave_room(connection).await,
    }
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection: ConnectionId) {
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::unbounded_channel();
    state.coordinator.connect(connection, tx).await;

    let coordinator = state.coordinator.clone();

    // Spawn a task to receive events from this connection
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let event = match ClientEvent::decode(text.as_str()) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::debug!("Dropping frame from '{}': {}", connection, e);
                            continue;
                        }
                    };

                    let event_name = event.name();
                    match dispatch_event(&coordinator, connection, event).await {
                        Ok(()) => {}
                        Err(
                            e @ (CoordinatorError::InvalidInput(_)
                            | CoordinatorError::NotAffiliated { .. }),
                        ) => {
                            tracing::debug!(
                                "Dropping '{}' from '{}': {}",
                                event_name,
                                connection,
                                e
                            );
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Failed to handle '{}' from '{}': {}",
                                event_name,
                                connection,
                                e
                            );
                        }
                    }
                }
                Message::Close(_) => {
                    tracing::debug!("Connection '{}' requested close", connection);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to push outbound events to this connection
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if let Err(e) = state.coordinator.disconnect(connection).await {
        tracing::warn!("Failed to disconnect '{}': {}", connection, e);
    }
}
