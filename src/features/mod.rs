pub mod admin;
pub mod brokers;
pub mod chat;
pub mod diagnostics;
pub mod properties;
pub mod resources;

use axum::Router;

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(diagnostics::routes())
        .merge(admin::routes())
        .merge(properties::routes())
        .merge(brokers::routes())
        .merge(resources::routes())
        .merge(chat::routes())
}
