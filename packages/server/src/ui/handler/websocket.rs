//! WebSocket connection handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, IdentityId},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    // The peer address keys the sticky identity binding; everything else
    // happens once the upgrade completes
    ws.on_upgrade(move |socket| handle_socket(socket, state, addr))
}

/// Spawns the task that drains the rx channel into the WebSocket sender.
///
/// Outbound flow: events addressed to this connection arrive on the rx
/// channel (from broadcasts and unicasts anywhere in the process) and are
/// pushed to the socket here. A slow or dead peer therefore only ever
/// stalls its own task, never a broadcaster.
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

/// Whether the connection's event loop should keep running
#[derive(Debug, PartialEq, Eq)]
enum Dispatch {
    Continue,
    Close,
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, addr: SocketAddr) {
    // Bind the connection: mint an id, register the outbound channel and
    // resolve the (possibly pre-existing) identity for this address
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();
    let identity = state
        .connect_participant_usecase
        .execute(connection_id.clone(), addr.ip(), tx)
        .await;
    tracing::info!(
        "Connection '{}' from {} bound to identity '{}'",
        connection_id,
        addr,
        identity.id
    );

    let (sender, mut receiver) = socket.split();

    // Outbound pusher task
    let mut send_task = pusher_loop(rx, sender);

    // Inbound event loop; events of one connection are processed strictly
    // in arrival order
    let state_clone = state.clone();
    let connection_clone = connection_id.clone();
    let identity_id = identity.id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on '{}': {}", connection_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let outcome =
                        dispatch_event(&state_clone, &connection_clone, &identity_id, &text).await;
                    if outcome == Dispatch::Close {
                        break;
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_clone);
                    break;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Disconnect path; a no-op when an explicit leave already ran
    state.leave_chat_usecase.execute(&connection_id).await;
}

async fn dispatch_event(
    state: &Arc<AppState>,
    connection: &ConnectionId,
    identity: &IdentityId,
    text: &str,
) -> Dispatch {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            // malformed payloads are silently discarded; the connection stays open
            tracing::debug!("Discarding malformed payload on '{}': {}", connection, e);
            return Dispatch::Continue;
        }
    };

    match event {
        ClientEvent::Join { user } => {
            state
                .join_chat_usecase
                .execute(connection, identity, &user)
                .await;
        }
        ClientEvent::Message { text, to } => {
            if let Err(e) = state
                .send_message_usecase
                .execute(connection, identity, text, to)
                .await
            {
                tracing::debug!("Dropping message event on '{}': {}", connection, e);
            }
        }
        ClientEvent::Rename { user } => {
            state
                .rename_participant_usecase
                .execute(connection, identity, &user)
                .await;
        }
        ClientEvent::History { channel } => {
            state
                .fetch_history_usecase
                .execute(connection, identity, &channel)
                .await;
        }
        ClientEvent::Leave => {
            state.leave_chat_usecase.execute(connection).await;
            return Dispatch::Close;
        }
    }
    Dispatch::Continue
}
