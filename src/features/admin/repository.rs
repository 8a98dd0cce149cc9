use bcrypt::{DEFAULT_COST, hash};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{features::admin::models::Admin, utilities::errors::AppError};

pub struct AdminRepository;

impl AdminRepository {
    pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<Admin>, AppError> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE email = $1")
            .bind(email.trim().to_lowercase())
            .fetch_optional(pool)
            .await?;

        Ok(admin)
    }

    pub async fn get_by_id(pool: &PgPool, admin_id: Uuid) -> Result<Admin, AppError> {
        sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = $1")
            .bind(admin_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Admin".to_string()))
    }

    /// Creates the bootstrap admin if no account with that email exists yet.
    pub async fn ensure(pool: &PgPool, email: &str, password: &str) -> Result<(), AppError> {
        if Self::get_by_email(pool, email).await?.is_some() {
            return Ok(());
        }

        let password_hash = hash(password, DEFAULT_COST)?;
        sqlx::query(
            r#"
            INSERT INTO admins (id, email, password_hash, full_name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email.trim().to_lowercase())
        .bind(password_hash)
        .bind("Administrator")
        .execute(pool)
        .await?;

        info!("Bootstrap admin {} created", email);
        Ok(())
    }
}
