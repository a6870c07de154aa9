//! WebSocket handler for the broadcast chat room.
//!
//! `/chat/{name}` upgrades the HTTP connection and drives a [`ChatSession`]:
//! the session subscribes to the chat channel, bus deliveries are written to
//! the socket as text frames, and inbound text frames are posted back through
//! the session (escaped, then fanned out to everyone). `/chat` without a name
//! upgrades and closes immediately -- joining requires a handle.
//!
//! Transport errors are never retried: any failed read or write runs the
//! session's normal close path, which broadcasts the leave line and removes
//! the connection from the channel's subscriber set.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};

use agora_core::session::{ChatSession, Welcome};

use crate::state::AppState;

/// GET /chat/{name} - Upgrade to a chat WebSocket under `name`.
pub async fn chat_ws(
    ws: WebSocketUpgrade,
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_chat_socket(socket, state, Some(name)))
}

/// GET /chat - Upgrade with no name; the session refuses to open.
pub async fn chat_ws_anonymous(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_chat_socket(socket, state, None))
}

/// Core WebSocket connection handler.
///
/// Uses `tokio::select!` to multiplex between bus deliveries for this
/// session and incoming frames from the client.
async fn handle_chat_socket(mut socket: WebSocket, state: AppState, name: Option<String>) {
    let mut session = ChatSession::new(state.bus.clone(), state.registry.clone());

    let Welcome {
        mut subscription,
        greeting,
    } = match session.open(name.as_deref()) {
        Ok(welcome) => welcome,
        Err(err) => {
            tracing::debug!(%err, "rejecting chat connection");
            let _ = socket.send(Message::Close(None)).await;
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Private greeting for this connection only -- never broadcast.
    if ws_sender.send(Message::Text(greeting.into())).await.is_err() {
        session.close();
        return;
    }

    loop {
        tokio::select! {
            // --- Branch 1: forward bus deliveries to this client ---
            delivery = subscription.recv() => {
                match delivery {
                    Some(line) => {
                        if ws_sender.send(Message::Text(line.to_string().into())).await.is_err() {
                            // Client gone; drop through the close path.
                            break;
                        }
                    }
                    // The bus dropped this subscriber (stale queue).
                    None => break,
                }
            }

            // --- Branch 2: post frames from the client to the chat ---
            frame = ws_receiver.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(err) = session.post(&text) {
                            tracing::debug!(%err, "dropping message from closed session");
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!("websocket receive error: {err}");
                        break;
                    }
                    // Binary, ping and pong frames are ignored.
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    session.close();
}
