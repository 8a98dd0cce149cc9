use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    features::chat::{
        hub::ChatHub, models::Sender, repository::ChatRepository, schemas::ChatEvent,
    },
    services::database::Database,
};

const MAX_BODY_CHARS: usize = 2000;

pub async fn chat_socket_handler(
    ws: WebSocketUpgrade,
    Path(session_id): Path<Uuid>,
    State(database): State<Database>,
    State(hub): State<ChatHub>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, session_id, database, hub))
}

async fn handle_socket(socket: WebSocket, session_id: Uuid, database: Database, hub: ChatHub) {
    let (mut sender, mut receiver) = socket.split();
    let mut subscription = hub.subscribe(session_id);

    debug!("chat socket opened for session {session_id}");

    // Push every stored message of this session to the visitor
    let mut send_task = tokio::spawn(async move {
        while let Some(message) = subscription.next().await {
            let Ok(json) = serde_json::to_string(&ChatEvent::Message { message }) else {
                continue;
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // Text frames from the visitor are stored and fanned out
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    let body = text.as_str().trim();
                    if body.is_empty() || body.chars().count() > MAX_BODY_CHARS {
                        continue;
                    }
                    match ChatRepository::create(&database.pool, session_id, Sender::Visitor, body)
                        .await
                    {
                        Ok(message) => {
                            hub.publish(message);
                        }
                        Err(e) => warn!("Failed to store chat message for {session_id}: {e}"),
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    }

    debug!("chat socket closed for session {session_id}");
}
