//! Unsigned upload operation.

use rand::RngExt;
use tracing::{debug, info};

use super::CloudinaryClient;
use crate::error::CloudinaryError;
use crate::types::{ErrorResponse, UploadedAsset};

/// One file to upload.
#[derive(Debug, Clone, Copy)]
pub struct UploadParams<'a> {
    /// File name sent in the multipart part.
    pub filename: &'a str,
    /// File bytes.
    pub data: &'a [u8],
    /// MIME type of the file part.
    pub content_type: &'a str,
    /// Unsigned upload preset.
    pub upload_preset: &'a str,
    /// Destination folder. `None` omits the field entirely.
    pub folder: Option<&'a str>,
}

impl CloudinaryClient {
    /// Upload a file. Exactly one request is made; there are no retries.
    pub fn upload(&self, params: &UploadParams<'_>) -> Result<UploadedAsset, CloudinaryError> {
        let url = self.upload_url();
        info!(
            "Uploading '{}' ({} bytes) to cloud '{}'",
            params.filename,
            params.data.len(),
            self.cloud_name
        );

        let boundary = format!("----CloudupFormBoundary{:016x}", rand::rng().random::<u64>());
        let body = multipart_body(&boundary, params);

        let response = self
            .agent
            .post(&url)
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .header("Accept", "application/json")
            .send(&body[..])
            .map_err(CloudinaryError::from_transport)?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            let message = serde_json::from_str::<ErrorResponse>(&error_body)
                .map_or(error_body, |e| e.error.message);
            return Err(CloudinaryError::HttpResponse { status, message });
        }

        let asset: UploadedAsset = body_reader
            .read_json()
            .map_err(CloudinaryError::from_transport)?;
        debug!("Uploaded '{}' as {}", params.filename, asset.public_id);
        Ok(asset)
    }
}

/// Build the multipart form body: `file`, `upload_preset` and optionally `folder`.
fn multipart_body(boundary: &str, params: &UploadParams<'_>) -> Vec<u8> {
    let mut body = Vec::with_capacity(params.data.len() + 512);

    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            params.filename.replace('"', "%22")
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", params.content_type).as_bytes());
    body.extend_from_slice(params.data);
    body.extend_from_slice(b"\r\n");

    let mut text_field = |name: &str, value: &str| {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    };
    text_field("upload_preset", params.upload_preset);
    if let Some(folder) = params.folder {
        text_field("folder", folder);
    }

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mockito::Matcher;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::ErrorKind;
    use crate::types::ResourceType;

    const BOUNDARY_HEADER: &str = r"^multipart/form-data; boundary=----CloudupFormBoundary[0-9a-f]{16}$";

    fn params(folder: Option<&'static str>) -> UploadParams<'static> {
        UploadParams {
            filename: "cat.png",
            data: b"PNGDATA",
            content_type: "image/png",
            upload_preset: "unsigned",
            folder,
        }
    }

    #[test]
    fn test_multipart_body_with_folder() {
        let body = String::from_utf8(multipart_body("XYZ", &params(Some("notes/images")))).unwrap();
        assert_eq!(
            body,
            "--XYZ\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"cat.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             PNGDATA\r\n\
             --XYZ\r\n\
             Content-Disposition: form-data; name=\"upload_preset\"\r\n\r\n\
             unsigned\r\n\
             --XYZ\r\n\
             Content-Disposition: form-data; name=\"folder\"\r\n\r\n\
             notes/images\r\n\
             --XYZ--\r\n"
        );
    }

    #[test]
    fn test_multipart_body_without_folder_omits_field() {
        let body = String::from_utf8(multipart_body("XYZ", &params(None))).unwrap();
        assert!(body.contains("name=\"upload_preset\""));
        assert!(!body.contains("name=\"folder\""));
    }

    #[test]
    fn test_upload_success() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1_1/demo/auto/upload")
            .match_header("content-type", Matcher::Regex(BOUNDARY_HEADER.to_owned()))
            .match_header("accept", "application/json")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="file"; filename="cat\.png"\r\nContent-Type: image/png\r\n\r\nPNGDATA\r\n"#.to_owned()),
                Matcher::Regex(r#"name="folder"\r\n\r\nnotes\r\n"#.to_owned()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"public_id":"notes/cat","resource_type":"image","secure_url":"https://res.example.com/demo/image/upload/v1/notes/cat.png"}"#,
            )
            .create();
        let client = CloudinaryClient::new(&server.url(), "demo", Duration::from_secs(5));

        let asset = client.upload(&params(Some("notes"))).unwrap();
        assert_eq!(asset.public_id, "notes/cat");
        assert_eq!(asset.resource_type, ResourceType::Image);
        mock.assert();
    }

    #[test]
    fn test_upload_bad_preset_is_classified() {
        let mut server = mockito::Server::new();
        // The preset is the last field when no folder is sent.
        let mock = server
            .mock("POST", "/v1_1/demo/auto/upload")
            .match_header("content-type", Matcher::Regex(BOUNDARY_HEADER.to_owned()))
            .match_body(Matcher::Regex(
                r#"name="upload_preset"\r\n\r\nunsigned\r\n--[-0-9A-Za-z]+--\r\n$"#.to_owned(),
            ))
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"message":"Upload preset not found"}}"#)
            .create();
        let client = CloudinaryClient::new(&server.url(), "demo", Duration::from_secs(5));

        let err = client.upload(&params(None)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPreset);
        assert_eq!(err.remote_message(), Some("Upload preset not found"));
        mock.assert();
    }

    #[test]
    fn test_upload_unauthorized_keeps_raw_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1_1/nobody/auto/upload")
            .with_status(401)
            .with_body("denied")
            .create();
        let client = CloudinaryClient::new(&server.url(), "nobody", Duration::from_secs(5));

        let err = client.upload(&params(None)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCloudName);
        assert_eq!(err.remote_message(), Some("denied"));
        mock.assert();
    }
}
