use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{ObjectStorage, SignedUpload, StorageError};
use crate::config::Config;

/// Supabase Storage bucket client
#[derive(Clone)]
pub struct SupabaseStorage {
    client: Client,
    storage_url: String,
    bucket: String,
    service_key: String,
}

#[derive(Debug, Deserialize)]
struct SignedUploadResponse {
    url: String,
    #[serde(default)]
    token: Option<String>,
}

impl SupabaseStorage {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            storage_url: format!("{}/storage/v1", config.supabase_url),
            bucket: config.gallery_bucket.clone(),
            service_key: config.supabase_service_key.clone(),
        }
    }
}

/// The API returns a path relative to `/storage/v1`; make it absolute.
fn absolute_signed_url(storage_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{}/{}", storage_url, url.trim_start_matches('/'))
    }
}

fn token_from_url(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(k, _)| k == "token")
        .map(|(_, v)| v.into_owned())
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn create_signed_upload(&self, path: &str) -> Result<SignedUpload, StorageError> {
        let endpoint = format!(
            "{}/object/upload/sign/{}/{}",
            self.storage_url, self.bucket, path
        );

        let res = self
            .client
            .post(&endpoint)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let message = res.text().await.unwrap_or_default();
            return Err(StorageError::Api { status, message });
        }

        let body: SignedUploadResponse = res.json().await?;
        let signed_url = absolute_signed_url(&self.storage_url, &body.url);
        let token = body.token.or_else(|| token_from_url(&signed_url));

        tracing::debug!(path = %path, "Signed upload URL issued");

        Ok(SignedUpload { signed_url, token })
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/object/public/{}/{}", self.storage_url, self.bucket, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_signed_url() {
        let base = "https://proj.supabase.co/storage/v1";
        assert_eq!(
            absolute_signed_url(base, "/object/upload/sign/gallery/1-a.png?token=abc"),
            "https://proj.supabase.co/storage/v1/object/upload/sign/gallery/1-a.png?token=abc"
        );
        assert_eq!(
            absolute_signed_url(base, "https://cdn.example.com/x?token=t"),
            "https://cdn.example.com/x?token=t"
        );
    }

    #[test]
    fn test_token_from_url() {
        assert_eq!(
            token_from_url("https://p.supabase.co/storage/v1/object/upload/sign/g/a.png?token=abc123"),
            Some("abc123".to_string())
        );
        assert_eq!(token_from_url("https://p.supabase.co/x"), None);
    }
}
