pub mod handlers;
pub mod hub;
pub mod models;
pub mod repository;
pub mod schemas;
pub mod websocket;

use axum::{
    Router,
    routing::{get, post},
};

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/chat/{session_id}/messages",
            get(handlers::get_messages_handler).post(handlers::post_message_handler),
        )
        .route(
            "/api/v1/chat/{session_id}/ws",
            get(websocket::chat_socket_handler),
        )
        .route(
            "/api/v1/admin/chat/sessions",
            get(handlers::get_sessions_handler),
        )
        .route(
            "/api/v1/admin/chat/{session_id}/messages",
            post(handlers::reply_handler),
        )
}
