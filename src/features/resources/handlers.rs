use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    features::resources::{
        repository::ResourceRepository,
        schemas::{ResourceIn, ResourceOut, ResourceQuery},
    },
    services::{database::Database, storage::Storage},
    utilities::{errors::AppError, jwt::Claims, multipart::FormUpload},
};

const RESOURCE_FIELD: &str = "resource_data";
const FILE_FIELD: &str = "file";

pub async fn get_resources_handler(
    State(database): State<Database>,
    State(storage): State<Storage>,
    Query(query): Query<ResourceQuery>,
) -> Result<impl IntoResponse, AppError> {
    let resources = ResourceRepository::get_many(&database.pool, query.category()).await?;

    let response: Vec<ResourceOut> = resources
        .into_iter()
        .map(|resource| ResourceOut::new(resource, &storage.document_urls))
        .collect();

    Ok(Json(response))
}

pub async fn download_resource_handler(
    State(database): State<Database>,
    State(storage): State<Storage>,
    Path(resource_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let resource = ResourceRepository::get_by_id(&database.pool, resource_id).await?;
    let url = storage.document_urls.resolve(&resource.file_path, None);

    if url.is_empty() {
        return Err(AppError::NotFoundError("Resource file not found".to_string()));
    }

    Ok(Redirect::temporary(&url))
}

pub async fn upload_resource_handler(
    claims: Claims,
    State(database): State<Database>,
    State(storage): State<Storage>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = FormUpload::read(multipart, RESOURCE_FIELD, FILE_FIELD).await?;
    let input: ResourceIn = form.payload(RESOURCE_FIELD)?;
    input.validate()?;

    let file = form
        .files
        .first()
        .ok_or_else(|| AppError::InvalidFormData("Missing file field".to_string()))?;

    let stored = storage
        .put_document(
            "resources",
            &file.file_name,
            file.content_type.as_deref(),
            file.data.clone(),
        )
        .await?;

    let resource =
        match ResourceRepository::create(&database.pool, &input, &file.file_name, &stored).await {
            Ok(resource) => resource,
            Err(e) => {
                if let Err(cleanup) = storage.delete_document(&stored.path).await {
                    warn!("Failed to delete orphaned document {}: {cleanup}", stored.path);
                }
                return Err(e);
            }
        };

    info!("admin {} uploaded resource {}", claims.sub, resource.id);

    Ok((
        StatusCode::CREATED,
        Json(ResourceOut::new(resource, &storage.document_urls)),
    ))
}

pub async fn delete_resource_handler(
    _claims: Claims,
    State(database): State<Database>,
    State(storage): State<Storage>,
    Path(resource_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let resource = ResourceRepository::delete(&database.pool, resource_id).await?;

    if let Err(e) = storage.delete_document(&resource.file_path).await {
        warn!("Failed to delete document {}: {e}", resource.file_path);
    }

    Ok(Json(json!({"message": "Resource deleted successfully"})))
}
