use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::types::WsEvent;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct WsQuery {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

/// WebSocket upgrade handler. The client identifies itself with a `userId`
/// query parameter and is joined to that user's room for the lifetime of the
/// connection.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, query.user_id, state))
}

async fn handle_socket(socket: WebSocket, user_id: Uuid, state: AppState) {
    let connection_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsEvent>();

    state.rooms.join(user_id, connection_id, tx);
    tracing::info!(%user_id, %connection_id, "WebSocket connected");

    // Forward room events to the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&event) {
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
        }
    });

    // The client only listens; drain its side until it closes
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    // Connection loss is an implicit leave
    state.rooms.leave(user_id, connection_id);
    tracing::info!(%user_id, %connection_id, "WebSocket disconnected");
}
