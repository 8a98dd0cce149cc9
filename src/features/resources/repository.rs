use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    features::resources::{models::Resource, schemas::ResourceIn},
    services::storage::StoredDocument,
    utilities::errors::AppError,
};

pub struct ResourceRepository;

impl ResourceRepository {
    pub async fn get_many(pool: &PgPool, category: Option<&str>) -> Result<Vec<Resource>, AppError> {
        let resources = sqlx::query_as::<_, Resource>(
            r#"
            SELECT * FROM resources
            WHERE ($1::TEXT IS NULL OR category = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(category)
        .fetch_all(pool)
        .await?;

        Ok(resources)
    }

    pub async fn get_by_id(pool: &PgPool, resource_id: Uuid) -> Result<Resource, AppError> {
        sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE id = $1")
            .bind(resource_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFoundError("Resource not found".to_string()))
    }

    pub async fn create(
        pool: &PgPool,
        input: &ResourceIn,
        file_name: &str,
        stored: &StoredDocument,
    ) -> Result<Resource, AppError> {
        let resource = sqlx::query_as::<_, Resource>(
            r#"
            INSERT INTO resources (id, title, description, category, file_path, file_name, mime_type, size_bytes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.title.trim())
        .bind(input.description.as_deref())
        .bind(input.category.trim())
        .bind(&stored.path)
        .bind(file_name)
        .bind(&stored.mime_type)
        .bind(stored.size_bytes)
        .fetch_one(pool)
        .await?;

        Ok(resource)
    }

    pub async fn delete(pool: &PgPool, resource_id: Uuid) -> Result<Resource, AppError> {
        sqlx::query_as::<_, Resource>("DELETE FROM resources WHERE id = $1 RETURNING *")
            .bind(resource_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::DatabaseDeleteError {
                resource: "Resource".to_string(),
                id: resource_id.to_string(),
            })
    }
}
