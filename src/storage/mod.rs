pub mod supabase;

pub use supabase::SupabaseStorage;

use async_trait::async_trait;

/// A signed, short-lived upload target for one object
#[derive(Debug, Clone, PartialEq)]
pub struct SignedUpload {
    pub signed_url: String,
    pub token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Storage API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Object storage for gallery uploads.
///
/// Uploads are two-phase: the service only issues a signed URL; the client
/// uploads directly and then registers the public URL as a gallery row. An
/// abandoned client leaves an orphaned object behind.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn create_signed_upload(&self, path: &str) -> Result<SignedUpload, StorageError>;

    /// Stable public-read URL of `path`
    fn public_url(&self, path: &str) -> String;
}
