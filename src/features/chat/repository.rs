use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    features::chat::models::{ChatMessage, ChatSession, Sender},
    utilities::errors::AppError,
};

pub struct ChatRepository;

impl ChatRepository {
    pub async fn create(
        pool: &PgPool,
        session_id: Uuid,
        sender: Sender,
        body: &str,
    ) -> Result<ChatMessage, AppError> {
        let message = sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_messages (id, session_id, sender, body)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(session_id)
        .bind(sender)
        .bind(body.trim())
        .fetch_one(pool)
        .await?;

        Ok(message)
    }

    pub async fn get_by_session(
        pool: &PgPool,
        session_id: Uuid,
    ) -> Result<Vec<ChatMessage>, AppError> {
        let messages = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT * FROM chat_messages
            WHERE session_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }

    pub async fn get_sessions(pool: &PgPool) -> Result<Vec<ChatSession>, AppError> {
        let mut sessions = sqlx::query_as::<_, ChatSession>(
            r#"
            SELECT DISTINCT ON (session_id)
                session_id,
                COUNT(*) OVER (PARTITION BY session_id) AS message_count,
                body AS last_message,
                created_at AS last_message_at
            FROM chat_messages
            ORDER BY session_id, created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        sessions.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));

        Ok(sessions)
    }
}
