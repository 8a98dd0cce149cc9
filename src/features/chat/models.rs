use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

#[derive(Type, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "chat_sender", rename_all = "UPPERCASE")]
pub enum Sender {
    Visitor,
    Agent,
}

#[derive(FromRow, Deserialize, Serialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub sender: Sender,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(FromRow, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub session_id: Uuid,
    pub message_count: i64,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
}
