use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(FromRow, Deserialize, Serialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Broker {
    pub id: Uuid,
    pub full_name: String,
    /// Regional council license number.
    pub creci: String,
    pub email: String,
    pub phone: String,
    pub whatsapp: Option<String>,
    pub photo: Option<String>,
    pub bio: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
