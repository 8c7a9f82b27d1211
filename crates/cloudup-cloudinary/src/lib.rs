//! Cloudinary integration for cloudup.
//!
//! Provides a blocking client for the unsigned upload endpoint
//! (`/v1_1/{cloud}/auto/upload`) and the error taxonomy the upload
//! pipeline classifies failures with.

mod client;
mod error;
mod types;

pub use client::{CloudinaryClient, UploadParams};
pub use error::{CloudinaryError, ErrorKind};
pub use types::{ResourceType, UploadedAsset};
