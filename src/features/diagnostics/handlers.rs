use std::time::Instant;

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;
use tracing::info;

use crate::{
    features::diagnostics::schemas::{DatabaseCheck, DiagnosticsOut, KeepAliveIn},
    services::{database::Database, keepalive::KeepAlive, storage::Storage},
    utilities::{errors::AppError, jwt::Claims},
};

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

pub async fn diagnostics_handler(
    _claims: Claims,
    State(database): State<Database>,
    State(storage): State<Storage>,
    State(keepalive): State<KeepAlive>,
) -> Result<impl IntoResponse, AppError> {
    let started = Instant::now();
    let database_check = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&database.pool)
        .await
    {
        Ok(_) => DatabaseCheck {
            ok: true,
            latency_ms: Some(started.elapsed().as_millis()),
            error: None,
        },
        Err(e) => DatabaseCheck {
            ok: false,
            latency_ms: None,
            error: Some(e.to_string()),
        },
    };

    Ok(Json(DiagnosticsOut {
        database: database_check,
        keep_alive: keepalive.status().await,
        storage_configured: storage.image_urls.is_configured(),
        images_bucket: storage.image_urls.bucket().to_string(),
        documents_bucket: storage.document_urls.bucket().to_string(),
    }))
}

pub async fn toggle_keepalive_handler(
    claims: Claims,
    State(keepalive): State<KeepAlive>,
    Json(keepalive_in): Json<KeepAliveIn>,
) -> Result<impl IntoResponse, AppError> {
    keepalive.set_enabled(keepalive_in.enabled);
    info!(
        "admin {} set keep-alive enabled={}",
        claims.sub, keepalive_in.enabled
    );

    Ok(Json(keepalive.status().await))
}
