//! Upload API response types.

use serde::Deserialize;

/// Resource category reported by the upload endpoint.
///
/// The endpoint has no audio category: audio files come back as `video`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Image,
    Video,
    Raw,
    #[serde(other)]
    Unknown,
}

/// Successful upload response.
///
/// Only includes fields that are actually used.
/// Serde ignores unknown fields from the API response.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedAsset {
    /// Canonical HTTPS delivery URL.
    pub secure_url: String,
    /// Resource category.
    pub resource_type: ResourceType,
    /// Public identifier of the asset.
    pub public_id: String,
}

/// Error response body: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub message: String,
}
