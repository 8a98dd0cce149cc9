use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    features::brokers::{
        repository::BrokerRepository,
        schemas::{BrokerIn, BrokerOut},
    },
    services::{database::Database, storage::Storage},
    utilities::{errors::AppError, jwt::Claims, multipart::FormUpload},
};

const BROKER_FIELD: &str = "broker_data";
const PHOTO_FIELD: &str = "photo";

pub async fn get_brokers_handler(
    State(database): State<Database>,
    State(storage): State<Storage>,
) -> Result<impl IntoResponse, AppError> {
    let brokers = BrokerRepository::get_active(&database.pool).await?;

    let response: Vec<BrokerOut> = brokers
        .into_iter()
        .map(|broker| BrokerOut::new(broker, &storage.image_urls))
        .collect();

    Ok(Json(response))
}

pub async fn get_broker_handler(
    State(database): State<Database>,
    State(storage): State<Storage>,
    Path(broker_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let broker = BrokerRepository::get_by_id(&database.pool, broker_id).await?;

    if !broker.active {
        return Err(AppError::NotFoundError("Broker not found".to_string()));
    }

    Ok(Json(BrokerOut::new(broker, &storage.image_urls)))
}

pub async fn get_all_brokers_handler(
    _claims: Claims,
    State(database): State<Database>,
    State(storage): State<Storage>,
) -> Result<impl IntoResponse, AppError> {
    let brokers = BrokerRepository::get_all(&database.pool).await?;

    let response: Vec<BrokerOut> = brokers
        .into_iter()
        .map(|broker| BrokerOut::new(broker, &storage.image_urls))
        .collect();

    Ok(Json(response))
}

pub async fn create_broker_handler(
    claims: Claims,
    State(database): State<Database>,
    State(storage): State<Storage>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = FormUpload::read(multipart, BROKER_FIELD, PHOTO_FIELD).await?;
    let input: BrokerIn = form.payload(BROKER_FIELD)?;
    input.validate()?;

    let broker_id = Uuid::new_v4();
    let photo = upload_photo(&storage, broker_id, &form).await?;

    let broker =
        match BrokerRepository::create(&database.pool, broker_id, &input, photo.as_deref()).await {
            Ok(broker) => broker,
            Err(e) => {
                if let Some(photo) = &photo {
                    storage.delete_images(std::slice::from_ref(photo)).await;
                }
                return Err(e);
            }
        };

    info!("admin {} created broker {}", claims.sub, broker.id);

    Ok((
        StatusCode::CREATED,
        Json(BrokerOut::new(broker, &storage.image_urls)),
    ))
}

pub async fn update_broker_handler(
    _claims: Claims,
    State(database): State<Database>,
    State(storage): State<Storage>,
    Path(broker_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = FormUpload::read(multipart, BROKER_FIELD, PHOTO_FIELD).await?;
    let input: BrokerIn = form.payload(BROKER_FIELD)?;
    input.validate()?;

    let existing = BrokerRepository::get_by_id(&database.pool, broker_id).await?;
    let uploaded = upload_photo(&storage, broker_id, &form).await?;

    let photo = match (&uploaded, input.remove_photo) {
        (Some(uploaded), _) => Some(uploaded.clone()),
        (None, true) => None,
        (None, false) => existing.photo.clone(),
    };

    let broker =
        match BrokerRepository::update(&database.pool, broker_id, &input, photo.as_deref()).await {
            Ok(broker) => broker,
            Err(e) => {
                if let Some(uploaded) = &uploaded {
                    storage.delete_images(std::slice::from_ref(uploaded)).await;
                }
                return Err(e);
            }
        };

    if let Some(previous) = existing.photo
        && broker.photo.as_ref() != Some(&previous)
    {
        storage.delete_images(&[previous]).await;
    }

    Ok(Json(BrokerOut::new(broker, &storage.image_urls)))
}

pub async fn delete_broker_handler(
    claims: Claims,
    State(database): State<Database>,
    State(storage): State<Storage>,
    Path(broker_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let broker = BrokerRepository::delete(&database.pool, broker_id).await?;

    if let Some(photo) = broker.photo {
        storage.delete_images(&[photo]).await;
    }

    info!("admin {} deleted broker {}", claims.sub, broker_id);

    Ok(Json(json!({"message": "Broker deleted successfully"})))
}

async fn upload_photo(
    storage: &Storage,
    broker_id: Uuid,
    form: &FormUpload,
) -> Result<Option<String>, AppError> {
    match form.files.first() {
        Some(file) => {
            let path = storage
                .put_image(&format!("brokers/{broker_id}"), file.data.clone())
                .await?;
            Ok(Some(path))
        }
        None => Ok(None),
    }
}
