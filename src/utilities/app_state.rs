use axum::extract::FromRef;

use crate::{
    features::chat::hub::ChatHub,
    services::{database::Database, keepalive::KeepAlive, storage::Storage},
    utilities::config::Config,
};

#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub storage: Storage,
    pub config: Config,
    pub chat: ChatHub,
    pub keepalive: KeepAlive,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.database.clone()
    }
}

impl FromRef<AppState> for Storage {
    fn from_ref(state: &AppState) -> Self {
        state.storage.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for ChatHub {
    fn from_ref(state: &AppState) -> Self {
        state.chat.clone()
    }
}

impl FromRef<AppState> for KeepAlive {
    fn from_ref(state: &AppState) -> Self {
        state.keepalive.clone()
    }
}
