pub mod handlers;
pub mod schemas;

use axum::{
    Router,
    routing::{get, put},
};

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/health", get(handlers::health_handler))
        .route(
            "/api/v1/admin/diagnostics",
            get(handlers::diagnostics_handler),
        )
        .route(
            "/api/v1/admin/diagnostics/keepalive",
            put(handlers::toggle_keepalive_handler),
        )
}
