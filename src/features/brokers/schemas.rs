use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    features::brokers::models::Broker,
    services::image_url::{ImageTransform, ImageUrlResolver},
};

// -- =====================
// -- IN
// -- =====================
#[derive(Deserialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BrokerIn {
    #[validate(length(min = 3, max = 120))]
    pub full_name: String,
    #[validate(length(min = 3, max = 20))]
    pub creci: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 20))]
    pub phone: String,
    #[validate(length(min = 8, max = 20))]
    pub whatsapp: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[serde(default = "active_by_default")]
    pub active: bool,
    /// Clears the stored photo when set and no new one is uploaded.
    #[serde(default)]
    pub remove_photo: bool,
}

fn active_by_default() -> bool {
    true
}

// -- =====================
// -- OUT
// -- =====================
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BrokerOut {
    #[serde(flatten)]
    pub broker: Broker,
    pub photo_url: Option<String>,
}

impl BrokerOut {
    pub fn new(broker: Broker, images: &ImageUrlResolver) -> Self {
        let photo_url = broker
            .photo
            .as_deref()
            .map(|photo| images.resolve(photo, Some(&ImageTransform::THUMBNAIL)))
            .filter(|url| !url.is_empty());

        BrokerOut { broker, photo_url }
    }
}
