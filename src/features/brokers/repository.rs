use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    features::brokers::{models::Broker, schemas::BrokerIn},
    utilities::errors::AppError,
};

pub struct BrokerRepository;

impl BrokerRepository {
    pub async fn get_active(pool: &PgPool) -> Result<Vec<Broker>, AppError> {
        let brokers = sqlx::query_as::<_, Broker>(
            "SELECT * FROM brokers WHERE active = TRUE ORDER BY full_name ASC",
        )
        .fetch_all(pool)
        .await?;

        Ok(brokers)
    }

    pub async fn get_all(pool: &PgPool) -> Result<Vec<Broker>, AppError> {
        let brokers = sqlx::query_as::<_, Broker>("SELECT * FROM brokers ORDER BY full_name ASC")
            .fetch_all(pool)
            .await?;

        Ok(brokers)
    }

    pub async fn get_by_id(pool: &PgPool, broker_id: Uuid) -> Result<Broker, AppError> {
        sqlx::query_as::<_, Broker>("SELECT * FROM brokers WHERE id = $1")
            .bind(broker_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFoundError("Broker not found".to_string()))
    }

    pub async fn create(
        pool: &PgPool,
        broker_id: Uuid,
        input: &BrokerIn,
        photo: Option<&str>,
    ) -> Result<Broker, AppError> {
        let broker = sqlx::query_as::<_, Broker>(
            r#"
            INSERT INTO brokers (id, full_name, creci, email, phone, whatsapp, photo, bio, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(broker_id)
        .bind(input.full_name.trim())
        .bind(input.creci.trim())
        .bind(input.email.trim().to_lowercase())
        .bind(input.phone.trim())
        .bind(input.whatsapp.as_deref().map(str::trim))
        .bind(photo)
        .bind(input.bio.as_deref())
        .bind(input.active)
        .fetch_one(pool)
        .await?;

        Ok(broker)
    }

    pub async fn update(
        pool: &PgPool,
        broker_id: Uuid,
        input: &BrokerIn,
        photo: Option<&str>,
    ) -> Result<Broker, AppError> {
        sqlx::query_as::<_, Broker>(
            r#"
            UPDATE brokers SET
                full_name = $2,
                creci = $3,
                email = $4,
                phone = $5,
                whatsapp = $6,
                photo = $7,
                bio = $8,
                active = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(broker_id)
        .bind(input.full_name.trim())
        .bind(input.creci.trim())
        .bind(input.email.trim().to_lowercase())
        .bind(input.phone.trim())
        .bind(input.whatsapp.as_deref().map(str::trim))
        .bind(photo)
        .bind(input.bio.as_deref())
        .bind(input.active)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Broker not found".to_string()))
    }

    pub async fn delete(pool: &PgPool, broker_id: Uuid) -> Result<Broker, AppError> {
        sqlx::query_as::<_, Broker>("DELETE FROM brokers WHERE id = $1 RETURNING *")
            .bind(broker_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::DatabaseDeleteError {
                resource: "Broker".to_string(),
                id: broker_id.to_string(),
            })
    }
}
