use std::sync::Arc;

use bytes::Bytes;
use object_store::{ObjectStore, aws::AmazonS3Builder, path::Path as ObjectStorePath};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    services::image_url::ImageUrlResolver,
    utilities::{config::Config, errors::AppError},
};

/// Object storage handles for the image and document buckets.
#[derive(Clone)]
pub struct Storage {
    pub images: Arc<dyn ObjectStore>,
    pub documents: Arc<dyn ObjectStore>,
    pub image_urls: ImageUrlResolver,
    pub document_urls: ImageUrlResolver,
}

pub struct StoredDocument {
    pub path: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

impl Storage {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let images = build_s3(config, &config.images_bucket)?;
        let documents = build_s3(config, &config.documents_bucket)?;

        Ok(Storage {
            images,
            documents,
            image_urls: ImageUrlResolver::from_config(config, &config.images_bucket),
            document_urls: ImageUrlResolver::from_config(config, &config.documents_bucket),
        })
    }

    pub fn with_stores(
        images: Arc<dyn ObjectStore>,
        documents: Arc<dyn ObjectStore>,
        image_urls: ImageUrlResolver,
        document_urls: ImageUrlResolver,
    ) -> Self {
        Storage {
            images,
            documents,
            image_urls,
            document_urls,
        }
    }

    /// Stores an image under `<prefix>/<uuid>.<ext>` and returns the bucket-relative path.
    pub async fn put_image(&self, prefix: &str, data: Bytes) -> Result<String, AppError> {
        if !infer::is_image(&data) {
            return Err(AppError::InvalidImageFormatError(
                "Invalid image format".to_string(),
            ));
        }
        let kind = infer::get(&data)
            .ok_or_else(|| AppError::InvalidImageFormatError("Invalid image format".to_string()))?;

        let location =
            ObjectStorePath::from(format!("{}/{}.{}", prefix, Uuid::new_v4(), kind.extension()));
        self.images.put(&location, data.into()).await?;

        debug!("stored image at {}", location);
        Ok(location.to_string())
    }

    /// Removes an image if the reference points into the image bucket.
    pub async fn delete_image(&self, reference: &str) -> Result<(), AppError> {
        let Some(path) = self.image_urls.bucket_path(reference) else {
            debug!("skipping delete of external image reference {reference}");
            return Ok(());
        };

        match self.images.delete(&ObjectStorePath::from(path.as_str())).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort removal of several images; failures are logged and skipped.
    pub async fn delete_images(&self, references: &[String]) {
        for reference in references {
            if let Err(e) = self.delete_image(reference).await {
                warn!("Failed to delete image {reference}: {e}");
            }
        }
    }

    pub async fn put_document(
        &self,
        prefix: &str,
        file_name: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<StoredDocument, AppError> {
        if data.is_empty() {
            return Err(AppError::InvalidFormData("Empty file".to_string()));
        }

        let mime_type = infer::get(&data)
            .map(|kind| kind.mime_type().to_string())
            .or_else(|| content_type.map(str::to_string))
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let size_bytes = i64::try_from(data.len())
            .map_err(|_| AppError::InvalidFormData("File too large".to_string()))?;

        let location = ObjectStorePath::from(format!(
            "{}/{}-{}",
            prefix,
            Uuid::new_v4(),
            sanitize_file_name(file_name)
        ));
        self.documents.put(&location, data.into()).await?;

        Ok(StoredDocument {
            path: location.to_string(),
            mime_type,
            size_bytes,
        })
    }

    pub async fn delete_document(&self, reference: &str) -> Result<(), AppError> {
        let Some(path) = self.document_urls.bucket_path(reference) else {
            return Ok(());
        };

        match self
            .documents
            .delete(&ObjectStorePath::from(path.as_str()))
            .await
        {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn build_s3(config: &Config, bucket: &str) -> Result<Arc<dyn ObjectStore>, AppError> {
    let mut builder = AmazonS3Builder::from_env()
        .with_bucket_name(bucket)
        .with_allow_http(true);

    if let Some(endpoint) = &config.s3_endpoint {
        builder = builder.with_endpoint(endpoint);
    }
    if let Some(region) = &config.s3_region {
        builder = builder.with_region(region);
    }
    if let Some(access_key_id) = &config.s3_access_key_id {
        builder = builder.with_access_key_id(access_key_id);
    }
    if let Some(secret_key) = &config.s3_secret_key {
        builder = builder.with_secret_access_key(secret_key);
    }

    Ok(Arc::new(builder.build()?))
}

fn sanitize_file_name(file_name: &str) -> String {
    let cleaned: String = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utilities::test_support::test_storage;

    // smallest valid PNG signature + IHDR chunk header
    const PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ];

    #[tokio::test]
    async fn stores_and_deletes_images() {
        let storage = test_storage();

        let path = storage
            .put_image("properties/1", Bytes::from_static(PNG))
            .await
            .unwrap();
        assert!(path.starts_with("properties/1/"));
        assert!(path.ends_with(".png"));
        assert!(storage.images.head(&ObjectStorePath::from(path.as_str())).await.is_ok());

        storage.delete_image(&path).await.unwrap();
        assert!(storage.images.head(&ObjectStorePath::from(path.as_str())).await.is_err());

        // deleting twice is fine
        storage.delete_image(&path).await.unwrap();
    }

    #[tokio::test]
    async fn rejects_non_image_payloads() {
        let storage = test_storage();
        let result = storage
            .put_image("properties/1", Bytes::from_static(b"plain text"))
            .await;
        assert!(matches!(result, Err(AppError::InvalidImageFormatError(_))));
    }

    #[tokio::test]
    async fn stores_documents_with_sanitized_names() {
        let storage = test_storage();
        let stored = storage
            .put_document(
                "resources",
                "../contrato de locação.txt",
                Some("text/plain"),
                Bytes::from_static(b"hello"),
            )
            .await
            .unwrap();

        assert!(stored.path.starts_with("resources/"));
        assert!(stored.path.ends_with("-contrato_de_loca__o.txt"));
        assert_eq!(stored.mime_type, "text/plain");
        assert_eq!(stored.size_bytes, 5);
    }

    #[test]
    fn sanitizes_file_names() {
        assert_eq!(sanitize_file_name("a b.pdf"), "a_b.pdf");
        assert_eq!(sanitize_file_name("dir/x.pdf"), "x.pdf");
        assert_eq!(sanitize_file_name(".."), "file");
    }
}
