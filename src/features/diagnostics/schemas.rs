use serde::{Deserialize, Serialize};

use crate::services::keepalive::KeepAliveStatus;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseCheck {
    pub ok: bool,
    pub latency_ms: Option<u128>,
    pub error: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsOut {
    pub database: DatabaseCheck,
    pub keep_alive: KeepAliveStatus,
    pub storage_configured: bool,
    pub images_bucket: String,
    pub documents_bucket: String,
}

#[derive(Deserialize, Debug)]
pub struct KeepAliveIn {
    pub enabled: bool,
}
