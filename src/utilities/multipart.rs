use axum::extract::Multipart;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::utilities::errors::AppError;

pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Admin form submission: one JSON payload field plus any number of files.
pub struct FormUpload {
    pub payload: Option<String>,
    pub files: Vec<UploadedFile>,
}

impl FormUpload {
    pub async fn read(
        mut multipart: Multipart,
        payload_field: &str,
        file_field: &str,
    ) -> Result<Self, AppError> {
        let mut payload = None;
        let mut files = Vec::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| AppError::InvalidFormData("Failed to read multipart stream".into()))?
        {
            debug!(
                "name: {:?}, file_name: {:?}",
                field.name(),
                field.file_name()
            );
            let name = field.name().unwrap_or_default().to_string();

            if name == payload_field {
                let text = field.text().await.map_err(|_| {
                    AppError::InvalidFormData(format!("Failed to read {payload_field} field"))
                })?;
                payload = Some(text);
            } else if name == file_field {
                let file_name = field.file_name().unwrap_or("file").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::InvalidFormData("Failed to read uploaded file".into()))?;

                // browsers send an empty part for an untouched file input
                if !data.is_empty() {
                    files.push(UploadedFile {
                        file_name,
                        content_type,
                        data,
                    });
                }
            } else {
                warn!("Unknown multipart field: {}", name);
            }
        }

        Ok(FormUpload { payload, files })
    }

    pub fn payload<T: DeserializeOwned>(&self, field: &str) -> Result<T, AppError> {
        let raw = self
            .payload
            .as_deref()
            .ok_or_else(|| AppError::InvalidFormData(format!("Missing {field} field")))?;

        Ok(serde_json::from_str(raw)?)
    }
}
