use axum::{
    Json,
    extract::{Multipart, Path, RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::{
    features::properties::{
        models::PropertyStatus,
        query::{ListingRequest, filter_options},
        repository::{CategoryRepository, PropertyRepository},
        schemas::{
            CategoryIn, PropertyIn, PropertyOut, SearchResponse, StatusIn, ViewIn,
        },
        views::reconcile_views,
    },
    services::{database::Database, storage::Storage},
    utilities::{errors::AppError, jwt::Claims, multipart::FormUpload},
};

const PROPERTY_FIELD: &str = "property_data";
const IMAGES_FIELD: &str = "images";

// -- =====================
// -- PUBLIC
// -- =====================
pub async fn search_properties_handler(
    State(database): State<Database>,
    State(storage): State<Storage>,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse, AppError> {
    let request = ListingRequest::from_query(query.as_deref().unwrap_or_default());
    debug!("listing request: {:?}", request);

    let properties = PropertyRepository::get_available(&database.pool).await?;

    let (mut view, requested_page) = request.clone().into_view();
    let page = view.run(&properties, requested_page);

    Ok(Json(SearchResponse::new(page, &request, &storage.image_urls)))
}

pub async fn filter_options_handler(
    State(database): State<Database>,
) -> Result<impl IntoResponse, AppError> {
    let properties = PropertyRepository::get_available(&database.pool).await?;

    Ok(Json(filter_options(&properties)))
}

pub async fn get_property_handler(
    State(database): State<Database>,
    State(storage): State<Storage>,
    Path(property_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let property = PropertyRepository::get_by_id(&database.pool, property_id).await?;

    if property.status == PropertyStatus::Archived {
        return Err(AppError::NotFoundError("Property not found".to_string()));
    }

    Ok(Json(PropertyOut::new(property, &storage.image_urls)))
}

pub async fn record_view_handler(
    State(database): State<Database>,
    Path(property_id): Path<Uuid>,
    view: Option<Json<ViewIn>>,
) -> Result<impl IntoResponse, AppError> {
    let optimistic = view.and_then(|Json(view)| view.optimistic_views);
    let stored = PropertyRepository::increment_views(&database.pool, property_id).await;

    Ok(Json(reconcile_views(property_id, optimistic, stored)?))
}

pub async fn get_categories_handler(
    State(database): State<Database>,
) -> Result<impl IntoResponse, AppError> {
    let categories = CategoryRepository::get_all(&database.pool).await?;

    Ok(Json(categories))
}

// -- =====================
// -- ADMIN
// -- =====================
pub async fn get_all_properties_handler(
    _claims: Claims,
    State(database): State<Database>,
    State(storage): State<Storage>,
) -> Result<impl IntoResponse, AppError> {
    let properties = PropertyRepository::get_all(&database.pool).await?;

    let response: Vec<PropertyOut> = properties
        .into_iter()
        .map(|property| PropertyOut::new(property, &storage.image_urls))
        .collect();

    Ok(Json(response))
}

pub async fn create_property_handler(
    claims: Claims,
    State(database): State<Database>,
    State(storage): State<Storage>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = FormUpload::read(multipart, PROPERTY_FIELD, IMAGES_FIELD).await?;
    let input: PropertyIn = form.payload(PROPERTY_FIELD)?;
    input.validate()?;

    let property_id = Uuid::new_v4();
    let uploaded = upload_images(&storage, property_id, &form).await?;

    let mut images = input.kept_images(&storage.image_urls, property_id, None);
    images.extend(uploaded.iter().cloned());

    let property = match PropertyRepository::create(&database.pool, property_id, &input, &images)
        .await
    {
        Ok(property) => property,
        Err(e) => {
            storage.delete_images(&uploaded).await;
            return Err(e);
        }
    };

    info!("admin {} created property {}", claims.sub, property.id);

    Ok((
        StatusCode::CREATED,
        Json(PropertyOut::new(property, &storage.image_urls)),
    ))
}

pub async fn update_property_handler(
    claims: Claims,
    State(database): State<Database>,
    State(storage): State<Storage>,
    Path(property_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = FormUpload::read(multipart, PROPERTY_FIELD, IMAGES_FIELD).await?;
    let input: PropertyIn = form.payload(PROPERTY_FIELD)?;
    input.validate()?;

    let existing = PropertyRepository::get_by_id(&database.pool, property_id).await?;
    let uploaded = upload_images(&storage, property_id, &form).await?;

    let mut images =
        input.kept_images(&storage.image_urls, property_id, Some(existing.images.as_slice()));
    images.extend(uploaded.iter().cloned());

    let property =
        match PropertyRepository::update(&database.pool, property_id, &input, &images).await {
            Ok(property) => property,
            Err(e) => {
                storage.delete_images(&uploaded).await;
                return Err(e);
            }
        };

    let dropped: Vec<String> = existing
        .images
        .into_iter()
        .filter(|reference| !images.contains(reference))
        .collect();
    storage.delete_images(&dropped).await;

    info!("admin {} updated property {}", claims.sub, property.id);

    Ok(Json(PropertyOut::new(property, &storage.image_urls)))
}

pub async fn set_property_status_handler(
    _claims: Claims,
    State(database): State<Database>,
    State(storage): State<Storage>,
    Path(property_id): Path<Uuid>,
    Json(status_in): Json<StatusIn>,
) -> Result<impl IntoResponse, AppError> {
    let property =
        PropertyRepository::set_status(&database.pool, property_id, status_in.status).await?;

    Ok(Json(PropertyOut::new(property, &storage.image_urls)))
}

pub async fn archive_property_handler(
    _claims: Claims,
    State(database): State<Database>,
    Path(property_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    PropertyRepository::set_status(&database.pool, property_id, PropertyStatus::Archived).await?;

    Ok(Json(json!({"message": "Property archived successfully"})))
}

pub async fn delete_property_handler(
    claims: Claims,
    State(database): State<Database>,
    State(storage): State<Storage>,
    Path(property_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let property = PropertyRepository::delete(&database.pool, property_id).await?;
    storage.delete_images(&property.images).await;

    info!("admin {} deleted property {}", claims.sub, property_id);

    Ok(Json(json!({"message": "Property deleted successfully"})))
}

pub async fn create_category_handler(
    _claims: Claims,
    State(database): State<Database>,
    Json(category_in): Json<CategoryIn>,
) -> Result<impl IntoResponse, AppError> {
    category_in.validate()?;

    let category = CategoryRepository::create(&database.pool, &category_in.name).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn delete_category_handler(
    _claims: Claims,
    State(database): State<Database>,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    CategoryRepository::delete(&database.pool, category_id).await?;

    Ok(Json(json!({"message": "Category deleted successfully"})))
}

/// Uploads every file of the form; already stored files are removed if one fails.
async fn upload_images(
    storage: &Storage,
    property_id: Uuid,
    form: &FormUpload,
) -> Result<Vec<String>, AppError> {
    let prefix = format!("properties/{property_id}");
    let mut uploaded = Vec::with_capacity(form.files.len());

    for file in &form.files {
        match storage.put_image(&prefix, file.data.clone()).await {
            Ok(path) => uploaded.push(path),
            Err(e) => {
                storage.delete_images(&uploaded).await;
                return Err(e);
            }
        }
    }

    Ok(uploaded)
}
