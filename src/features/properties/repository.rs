use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::{
    features::properties::{
        models::{Category, Property, PropertyStatus},
        schemas::PropertyIn,
    },
    utilities::errors::AppError,
};

pub struct PropertyRepository;

impl PropertyRepository {
    /// Listings the public search runs over.
    pub async fn get_available(pool: &PgPool) -> Result<Vec<Property>, AppError> {
        let properties = sqlx::query_as::<_, Property>(
            r#"
            SELECT * FROM properties
            WHERE status = 'AVAILABLE'
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(properties)
    }

    pub async fn get_all(pool: &PgPool) -> Result<Vec<Property>, AppError> {
        let properties = sqlx::query_as::<_, Property>(
            r#"
            SELECT * FROM properties
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(properties)
    }

    pub async fn get_by_id(pool: &PgPool, property_id: Uuid) -> Result<Property, AppError> {
        sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = $1")
            .bind(property_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFoundError("Property not found".to_string()))
    }

    pub async fn create(
        pool: &PgPool,
        property_id: Uuid,
        input: &PropertyIn,
        images: &[String],
    ) -> Result<Property, AppError> {
        let (rent_price, sale_price) = input.prices();

        let property = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (
                id, code, title, description, purpose, property_type, category_id, broker_id,
                bedrooms, bathrooms, area, rent_price, sale_price, status,
                address, city, neighborhood, amenities, images
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(input.code())
        .bind(input.title.trim())
        .bind(input.description.trim())
        .bind(input.purpose)
        .bind(input.property_type.trim())
        .bind(input.category_id)
        .bind(input.broker_id)
        .bind(input.bedrooms)
        .bind(input.bathrooms)
        .bind(input.area)
        .bind(rent_price)
        .bind(sale_price)
        .bind(input.status.unwrap_or_default())
        .bind(input.address.trim())
        .bind(input.city.trim())
        .bind(input.neighborhood.trim())
        .bind(Json(input.amenities()))
        .bind(images)
        .fetch_one(pool)
        .await?;

        Ok(property)
    }

    pub async fn update(
        pool: &PgPool,
        property_id: Uuid,
        input: &PropertyIn,
        images: &[String],
    ) -> Result<Property, AppError> {
        let (rent_price, sale_price) = input.prices();

        sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties SET
                code = $2,
                title = $3,
                description = $4,
                purpose = $5,
                property_type = $6,
                category_id = $7,
                broker_id = $8,
                bedrooms = $9,
                bathrooms = $10,
                area = $11,
                rent_price = $12,
                sale_price = $13,
                status = COALESCE($14, status),
                address = $15,
                city = $16,
                neighborhood = $17,
                amenities = $18,
                images = $19,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(input.code())
        .bind(input.title.trim())
        .bind(input.description.trim())
        .bind(input.purpose)
        .bind(input.property_type.trim())
        .bind(input.category_id)
        .bind(input.broker_id)
        .bind(input.bedrooms)
        .bind(input.bathrooms)
        .bind(input.area)
        .bind(rent_price)
        .bind(sale_price)
        .bind(input.status)
        .bind(input.address.trim())
        .bind(input.city.trim())
        .bind(input.neighborhood.trim())
        .bind(Json(input.amenities()))
        .bind(images)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Property not found".to_string()))
    }

    pub async fn set_status(
        pool: &PgPool,
        property_id: Uuid,
        status: PropertyStatus,
    ) -> Result<Property, AppError> {
        sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(status)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Property not found".to_string()))
    }

    /// Removes the row and hands it back so its images can be cleaned up.
    pub async fn delete(pool: &PgPool, property_id: Uuid) -> Result<Property, AppError> {
        sqlx::query_as::<_, Property>("DELETE FROM properties WHERE id = $1 RETURNING *")
            .bind(property_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::DatabaseDeleteError {
                resource: "Property".to_string(),
                id: property_id.to_string(),
            })
    }

    pub async fn increment_views(pool: &PgPool, property_id: Uuid) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE properties SET views = COALESCE(views, 0) + 1
            WHERE id = $1 AND status <> 'ARCHIVED'
            RETURNING views
            "#,
        )
        .bind(property_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Property not found".to_string()))
    }
}

pub struct CategoryRepository;

impl CategoryRepository {
    pub async fn get_all(pool: &PgPool) -> Result<Vec<Category>, AppError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
                .fetch_all(pool)
                .await?;

        Ok(categories)
    }

    pub async fn create(pool: &PgPool, name: &str) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(name.trim())
        .fetch_one(pool)
        .await?;

        Ok(category)
    }

    pub async fn delete(pool: &PgPool, category_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id)
            .execute(pool)
            .await?;

        match result.rows_affected() {
            0 => Err(AppError::DatabaseDeleteError {
                resource: "Category".to_string(),
                id: category_id.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
