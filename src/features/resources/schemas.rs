use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{features::resources::models::Resource, services::image_url::ImageUrlResolver};

#[derive(Deserialize, Validate, Debug)]
pub struct ResourceIn {
    #[validate(length(min = 3, max = 160))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub category: String,
}

#[derive(Deserialize, Debug)]
pub struct ResourceQuery {
    pub category: Option<String>,
}

impl ResourceQuery {
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|category| {
                !category.is_empty()
                    && !category.eq_ignore_ascii_case("all")
                    && !category.eq_ignore_ascii_case("any")
            })
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResourceOut {
    #[serde(flatten)]
    pub resource: Resource,
    pub download_url: String,
}

impl ResourceOut {
    pub fn new(resource: Resource, documents: &ImageUrlResolver) -> Self {
        let download_url = documents.resolve(&resource.file_path, None);
        ResourceOut {
            resource,
            download_url,
        }
    }
}
