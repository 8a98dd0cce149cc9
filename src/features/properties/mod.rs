pub mod handlers;
pub mod models;
pub mod query;
pub mod repository;
pub mod schemas;
pub mod views;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/properties",
            get(handlers::search_properties_handler),
        )
        .route(
            "/api/v1/properties/options",
            get(handlers::filter_options_handler),
        )
        .route(
            "/api/v1/properties/{property_id}",
            get(handlers::get_property_handler),
        )
        .route(
            "/api/v1/properties/{property_id}/views",
            post(handlers::record_view_handler),
        )
        .route("/api/v1/categories", get(handlers::get_categories_handler))
        // Admin
        .route(
            "/api/v1/admin/properties",
            get(handlers::get_all_properties_handler).post(handlers::create_property_handler),
        )
        .route(
            "/api/v1/admin/properties/{property_id}",
            put(handlers::update_property_handler).delete(handlers::delete_property_handler),
        )
        .route(
            "/api/v1/admin/properties/{property_id}/status",
            patch(handlers::set_property_status_handler),
        )
        .route(
            "/api/v1/admin/properties/{property_id}/archive",
            post(handlers::archive_property_handler),
        )
        .route(
            "/api/v1/admin/categories",
            post(handlers::create_category_handler),
        )
        .route(
            "/api/v1/admin/categories/{category_id}",
            delete(handlers::delete_category_handler),
        )
}
