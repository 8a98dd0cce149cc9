pub mod handlers;
pub mod models;
pub mod repository;
pub mod schemas;

use axum::{
    Router,
    routing::{get, put},
};

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/brokers", get(handlers::get_brokers_handler))
        .route(
            "/api/v1/brokers/{broker_id}",
            get(handlers::get_broker_handler),
        )
        .route(
            "/api/v1/admin/brokers",
            get(handlers::get_all_brokers_handler).post(handlers::create_broker_handler),
        )
        .route(
            "/api/v1/admin/brokers/{broker_id}",
            put(handlers::update_broker_handler).delete(handlers::delete_broker_handler),
        )
}
