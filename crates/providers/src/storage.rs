//! Supabase Storage REST client.
//!
//! Objects are written with the service-role key, so row-level storage
//! policies do not apply; callers are responsible for choosing paths under
//! the owning user's prefix.

use serde_json::json;

use crate::error::{ensure_success, ProviderError};

const SERVICE: &str = "Supabase Storage";

/// HTTP client for one Supabase project's storage API.
#[derive(Debug, Clone)]
pub struct StorageClient {
    client: reqwest::Client,
    /// Project URL without trailing slash, e.g. `https://abc.supabase.co`.
    base_url: String,
    service_role_key: String,
}

impl StorageClient {
    pub fn new(base_url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_role_key: service_role_key.into(),
        }
    }

    /// Upload `bytes` to `bucket/path`, replacing any existing object.
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ProviderError> {
        let size = bytes.len();
        let response = self
            .client
            .post(self.object_url(bucket, path))
            .bearer_auth(&self.service_role_key)
            .header("apikey", &self.service_role_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;
        ensure_success(SERVICE, response).await?;

        tracing::debug!(bucket, path, size, "Uploaded storage object");
        Ok(())
    }

    /// Remove objects by path. Missing objects are not an error.
    pub async fn delete(&self, bucket: &str, paths: &[String]) -> Result<(), ProviderError> {
        if paths.is_empty() {
            return Ok(());
        }
        let response = self
            .client
            .delete(format!("{}/storage/v1/object/{bucket}", self.base_url))
            .bearer_auth(&self.service_role_key)
            .header("apikey", &self.service_role_key)
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;
        ensure_success(SERVICE, response).await?;

        tracing::debug!(bucket, count = paths.len(), "Deleted storage objects");
        Ok(())
    }

    /// Public URL of an object in a public bucket.
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{bucket}/{}",
            self.base_url,
            path.trim_start_matches('/')
        )
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{bucket}/{}",
            self.base_url,
            path.trim_start_matches('/')
        )
    }
}
