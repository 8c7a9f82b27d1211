//! Cloudinary upload API client.
//!
//! Provides a sync HTTP client for the unsigned upload endpoint. Every
//! request is bounded by a global timeout; exceeding it is reported as
//! [`CloudinaryError::Timeout`](crate::CloudinaryError::Timeout).

mod upload;

use std::time::Duration;

use ureq::Agent;

pub use upload::UploadParams;

/// Cloudinary upload API client.
pub struct CloudinaryClient {
    agent: Agent,
    api_base: String,
    cloud_name: String,
}

impl CloudinaryClient {
    /// Create a client for `cloud_name` against `api_base`
    /// (normally `https://api.cloudinary.com`).
    #[must_use]
    pub fn new(api_base: &str, cloud_name: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            api_base: api_base.trim_end_matches('/').to_owned(),
            cloud_name: cloud_name.to_owned(),
        }
    }

    /// Cloud account this client uploads to.
    #[must_use]
    pub fn cloud_name(&self) -> &str {
        &self.cloud_name
    }

    /// Upload endpoint with automatic resource type detection.
    fn upload_url(&self) -> String {
        format!("{}/v1_1/{}/auto/upload", self.api_base, self.cloud_name)
    }
}
