pub mod features;
pub mod services;
pub mod utilities;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::utilities::{app_state::AppState, errors::AppError};

/// Property photos and resource documents arrive as multipart uploads.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn build_app(state: AppState) -> Result<Router, AppError> {
    let origin = state
        .config
        .frontend_endpoint
        .parse::<HeaderValue>()
        .map_err(|e| AppError::InternalError(format!("Invalid FRONTEND_ENDPOINT, {e}")))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let app = features::routes()
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}
