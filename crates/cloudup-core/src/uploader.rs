//! The remote upload seam.

use cloudup_cloudinary::{CloudinaryClient, UploadParams};

use crate::destination::Destination;
use crate::error::UploadError;
use crate::format::{MediaKind, classify_uploaded};

/// One file being sent.
#[derive(Debug, Clone, Copy)]
pub struct UploadRequest<'a> {
    /// File name for the remote side.
    pub name: &'a str,
    /// File bytes.
    pub data: &'a [u8],
    /// MIME type, `application/octet-stream` when unknown.
    pub mime: &'a str,
    /// Where the file goes.
    pub destination: &'a Destination,
    /// Kind expected before upload.
    pub kind_hint: MediaKind,
}

/// A successfully uploaded asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAsset {
    /// Canonical secure URL as returned, before transformation.
    pub secure_url: String,
    /// Kind derived from the response.
    pub kind: MediaKind,
    /// Public identifier.
    pub public_id: String,
}

/// Sends files to the remote asset host. One call is one request.
pub trait Uploader {
    fn upload(&self, request: &UploadRequest<'_>) -> Result<RemoteAsset, UploadError>;
}

impl Uploader for CloudinaryClient {
    fn upload(&self, request: &UploadRequest<'_>) -> Result<RemoteAsset, UploadError> {
        let asset = CloudinaryClient::upload(
            self,
            &UploadParams {
                filename: request.name,
                data: request.data,
                content_type: request.mime,
                upload_preset: &request.destination.preset,
                folder: request.destination.folder.as_deref(),
            },
        )?;
        Ok(RemoteAsset {
            kind: classify_uploaded(asset.resource_type, &asset.secure_url),
            secure_url: asset.secure_url,
            public_id: asset.public_id,
        })
    }
}
