//! Display URLs for stored image references.
//!
//! A reference is either a path relative to the bucket (`properties/<id>/<file>.jpg`)
//! or an absolute URL produced earlier by this resolver. Resolution never fails:
//! it degrades from the active storage endpoint to the direct public base and,
//! as a last resort, hands the reference back untouched.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::utilities::config::Config;

/// Storage service endpoint that is able to serve transformed renditions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageEndpoint {
    pub url: String,
    pub key: String,
}

#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    #[default]
    Cover,
    Contain,
    Fill,
}

impl ResizeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeMode::Cover => "cover",
            ResizeMode::Contain => "contain",
            ResizeMode::Fill => "fill",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ImageTransform {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub resize: ResizeMode,
}

impl ImageTransform {
    pub const THUMBNAIL: ImageTransform = ImageTransform {
        width: Some(400),
        height: Some(300),
        resize: ResizeMode::Cover,
    };

    pub const DETAIL: ImageTransform = ImageTransform {
        width: Some(1200),
        height: Some(800),
        resize: ResizeMode::Contain,
    };
}

#[derive(Clone, Debug)]
pub struct ImageUrlResolver {
    active: Option<StorageEndpoint>,
    public_base: String,
    bucket: String,
}

impl ImageUrlResolver {
    pub fn new(
        active: Option<StorageEndpoint>,
        public_base: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        let active = active.filter(|endpoint| {
            !endpoint.url.trim().is_empty() && !endpoint.key.trim().is_empty()
        });

        ImageUrlResolver {
            active,
            public_base: public_base.into(),
            bucket: bucket.into(),
        }
    }

    pub fn from_config(config: &Config, bucket: &str) -> Self {
        let active = match (&config.storage_url, &config.storage_key) {
            (Some(url), Some(key)) => Some(StorageEndpoint {
                url: url.clone(),
                key: key.clone(),
            }),
            _ => None,
        };

        ImageUrlResolver::new(active, config.storage_public_base.clone(), bucket)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn is_configured(&self) -> bool {
        self.active.is_some()
    }

    /// Bucket-relative path of a reference, if it points into this bucket.
    pub fn bucket_path(&self, reference: &str) -> Option<String> {
        let reference = reference.trim();
        if reference.is_empty() || is_data_url(reference) {
            return None;
        }

        if is_absolute(reference) {
            return extract_bucket_path(reference, &self.bucket);
        }

        let path = reference.trim_start_matches('/');
        (!path.is_empty()).then(|| path.to_string())
    }

    pub fn resolve(&self, reference: &str, transform: Option<&ImageTransform>) -> String {
        let reference = reference.trim();

        // inline payloads would produce unbounded urls
        if reference.is_empty() || is_data_url(reference) {
            return String::new();
        }

        let Some(path) = self.bucket_path(reference) else {
            return reference.to_string();
        };

        if let Some(active) = &self.active
            && let Some(url) = active_url(active, &self.bucket, &path, transform)
        {
            return url;
        }

        direct_url(&self.public_base, &self.bucket, &path).unwrap_or_else(|| reference.to_string())
    }
}

pub fn is_data_url(reference: &str) -> bool {
    reference
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

fn is_absolute(reference: &str) -> bool {
    let lower = reference.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn extract_bucket_path(reference: &str, bucket: &str) -> Option<String> {
    let url = Url::parse(reference).ok()?;
    let segments: Vec<&str> = url.path_segments()?.collect();
    let position = segments.iter().position(|segment| *segment == bucket)?;

    let path = segments[position + 1..]
        .iter()
        .filter(|segment| !segment.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");

    (!path.is_empty()).then_some(path)
}

fn active_url(
    endpoint: &StorageEndpoint,
    bucket: &str,
    path: &str,
    transform: Option<&ImageTransform>,
) -> Option<String> {
    let base = endpoint.url.trim().trim_end_matches('/');

    match transform {
        Some(transform) => {
            let mut url = Url::parse(&format!(
                "{base}/storage/v1/render/image/public/{bucket}/{path}"
            ))
            .ok()?;
            {
                let mut query = url.query_pairs_mut();
                if let Some(width) = transform.width {
                    query.append_pair("width", &width.to_string());
                }
                if let Some(height) = transform.height {
                    query.append_pair("height", &height.to_string());
                }
                query.append_pair("resize", transform.resize.as_str());
            }
            Some(url.to_string())
        }
        None => Url::parse(&format!("{base}/storage/v1/object/public/{bucket}/{path}"))
            .ok()
            .map(|url| url.to_string()),
    }
}

fn direct_url(public_base: &str, bucket: &str, path: &str) -> Option<String> {
    let base = public_base.trim().trim_end_matches('/');
    Url::parse(&format!("{base}/{bucket}/{path}"))
        .ok()
        .map(|url| url.to_string())
}
