//! Error types for the Cloudinary upload client.

/// Error from upload API operations.
#[derive(Debug, thiserror::Error)]
pub enum CloudinaryError {
    /// HTTP request failed (network error, bad response body, etc).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// The request did not complete within the configured timeout.
    #[error("upload timed out")]
    Timeout,

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {message}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body, or the raw body.
        message: String,
    },
}

/// Classified failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 401: the cloud name is unknown or not authorized.
    InvalidCloudName,
    /// 400: the upload preset is missing or not an unsigned preset.
    InvalidPreset,
    /// Request timed out.
    Timeout,
    /// Any other failure.
    Other,
}

impl CloudinaryError {
    /// Classify this error for user-facing guidance.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::HttpResponse { status: 401, .. } => ErrorKind::InvalidCloudName,
            Self::HttpResponse { status: 400, .. } => ErrorKind::InvalidPreset,
            Self::Timeout => ErrorKind::Timeout,
            Self::HttpRequest(_) | Self::HttpResponse { .. } => ErrorKind::Other,
        }
    }

    /// Raw message reported by the remote side, if any.
    #[must_use]
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::HttpResponse { message, .. } => Some(message),
            _ => None,
        }
    }

    pub(crate) fn from_transport(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Timeout(_) => Self::Timeout,
            ureq::Error::Io(ref io) if io.kind() == std::io::ErrorKind::TimedOut => Self::Timeout,
            other => Self::HttpRequest(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> CloudinaryError {
        CloudinaryError::HttpResponse {
            status,
            message: "nope".to_owned(),
        }
    }

    #[test]
    fn test_kind_by_status() {
        assert_eq!(response(401).kind(), ErrorKind::InvalidCloudName);
        assert_eq!(response(400).kind(), ErrorKind::InvalidPreset);
        assert_eq!(response(500).kind(), ErrorKind::Other);
        assert_eq!(response(403).kind(), ErrorKind::Other);
        assert_eq!(CloudinaryError::Timeout.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn test_io_timeout_maps_to_timeout() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        let err = CloudinaryError::from_transport(ureq::Error::Io(io));
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn test_remote_message() {
        assert_eq!(response(400).remote_message(), Some("nope"));
        assert_eq!(CloudinaryError::Timeout.remote_message(), None);
    }
}
