pub mod handlers;
pub mod models;
pub mod repository;
pub mod schemas;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/resources", get(handlers::get_resources_handler))
        .route(
            "/api/v1/resources/{resource_id}/download",
            get(handlers::download_resource_handler),
        )
        .route(
            "/api/v1/admin/resources",
            post(handlers::upload_resource_handler),
        )
        .route(
            "/api/v1/admin/resources/{resource_id}",
            delete(handlers::delete_resource_handler),
        )
}
