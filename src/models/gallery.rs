use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Gallery image row (`gallery_images`), listed by `display_order` ascending
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryImage {
    pub id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    pub image_url: String,
    pub display_order: i32,
    pub is_active: bool,
}

/// Admin payload for `createGalleryImage`. `image_url` is the public URL
/// handed out by `getUploadUrl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGalleryImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// `getUploadUrl` input
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    pub file_name: String,
}

/// `getUploadUrl` output: upload to `signed_url`, then register `public_url`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadTicket {
    pub signed_url: String,
    pub token: Option<String>,
    pub path: String,
    pub public_url: String,
}
