//! WebSocket notification delivery
//!
//! Clients authenticate with their JWT (header or `access_token` query
//! parameter), are subscribed to their own user topic and receive every
//! notification created for them as a JSON text frame.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use crate::handlers::AppState;
use crate::middleware::AuthContext;

/// GET /ws/notifications
pub async fn notifications_ws(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    auth: AuthContext,
) -> Response {
    info!(user_id = auth.user_id, "WebSocket connection accepted");
    ws.on_upgrade(move |socket| handle_socket(socket, state, auth))
}

async fn handle_socket(socket: WebSocket, state: AppState, auth: AuthContext) {
    let mut notifications = state.services.hub.subscribe(auth.user_id).await;
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            notification = notifications.recv() => match notification {
                Ok(notification) => {
                    let payload = match serde_json::to_string(&notification) {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!(user_id = auth.user_id, error = %e, "Could not serialize notification");
                            continue;
                        }
                    };
                    if sender.send(Message::Text(payload)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(user_id = auth.user_id, skipped = skipped, "Notification stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            message = receiver.next() => match message {
                Some(Ok(Message::Ping(data))) => {
                    if sender.send(Message::Pong(data)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {
                    // Clients only listen on this channel
                }
                Some(Err(e)) => {
                    debug!(user_id = auth.user_id, error = %e, "WebSocket receive error");
                    break;
                }
            },
        }
    }

    debug!(user_id = auth.user_id, "WebSocket connection closed");
    state.services.hub.prune().await;
}
