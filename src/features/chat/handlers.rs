use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::{
    features::chat::{
        hub::ChatHub, models::Sender, repository::ChatRepository, schemas::MessageIn,
    },
    services::database::Database,
    utilities::{errors::AppError, jwt::Claims},
};

pub async fn get_messages_handler(
    State(database): State<Database>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let messages = ChatRepository::get_by_session(&database.pool, session_id).await?;

    Ok(Json(messages))
}

pub async fn post_message_handler(
    State(database): State<Database>,
    State(hub): State<ChatHub>,
    Path(session_id): Path<Uuid>,
    Json(message_in): Json<MessageIn>,
) -> Result<impl IntoResponse, AppError> {
    message_in.validate()?;

    let message =
        ChatRepository::create(&database.pool, session_id, Sender::Visitor, &message_in.body)
            .await?;
    let listeners = hub.publish(message.clone());
    debug!("visitor message for {session_id} delivered to {listeners} listeners");

    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn get_sessions_handler(
    _claims: Claims,
    State(database): State<Database>,
) -> Result<impl IntoResponse, AppError> {
    let sessions = ChatRepository::get_sessions(&database.pool).await?;

    Ok(Json(sessions))
}

pub async fn reply_handler(
    _claims: Claims,
    State(database): State<Database>,
    State(hub): State<ChatHub>,
    Path(session_id): Path<Uuid>,
    Json(message_in): Json<MessageIn>,
) -> Result<impl IntoResponse, AppError> {
    message_in.validate()?;

    let message =
        ChatRepository::create(&database.pool, session_id, Sender::Agent, &message_in.body)
            .await?;
    hub.publish(message.clone());

    Ok((StatusCode::CREATED, Json(message)))
}
