use bytes::Bytes;
use rental_core::catalog::UploadedFile;
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use crate::transport::{ApiRequest, FilePart};

/// Content type for the image formats accepted by the upload route
pub fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

impl ApiClient {
    /// Multipart `POST /upload?folder=<name>` returning the stored URL.
    ///
    /// Failures other than an expired session surface as
    /// [`ClientError::Upload`].
    pub async fn upload(
        &self,
        folder: &str,
        file_name: &str,
        bytes: impl Into<Bytes>,
    ) -> Result<UploadedFile> {
        let folder = folder.trim();
        if folder.is_empty() {
            return Err(ClientError::Upload("Upload folder is required".into()));
        }
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ClientError::Upload(format!("{} is empty", file_name)));
        }

        let request = ApiRequest::post("/upload")
            .query("folder", folder)
            .file(FilePart {
                field: "file".into(),
                file_name: file_name.to_string(),
                mime: mime_for(file_name).to_string(),
                bytes,
            });

        let uploaded: UploadedFile = match self.send_json(request).await {
            Ok(uploaded) => uploaded,
            Err(err @ ClientError::Unauthorized { .. }) => return Err(err),
            Err(err) => {
                warn!("Upload of {} failed: {}", file_name, err);
                return Err(ClientError::Upload(err.user_message()));
            }
        };
        if uploaded.url.is_empty() {
            return Err(ClientError::Upload("Upload response did not include a URL".into()));
        }
        info!("Uploaded {} to {}", file_name, uploaded.url);
        Ok(uploaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;
    use crate::transport::{Method, RequestBody};
    use rental_core::session::SessionContext;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for("car.JPG"), "image/jpeg");
        assert_eq!(mime_for("logo.svg"), "image/svg+xml");
        assert_eq!(mime_for("README"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_upload_sends_folder_and_file() {
        let backend = Arc::new(MockBackend::new("t").route(Method::Post, "/upload", |req| {
            let folder = req.query.iter().find(|(k, _)| k == "folder").map(|(_, v)| v.clone());
            let name = match &req.body {
                RequestBody::Multipart(part) => part.file_name.clone(),
                _ => String::new(),
            };
            json!({ "url": format!("https://cdn.test/{}/{}", folder.unwrap_or_default(), name) })
        }));
        let client = ApiClient::new(backend, SessionContext::with_token("t"));

        let uploaded = client
            .upload("brands", "logo.png", vec![1u8, 2, 3])
            .await
            .unwrap();
        assert_eq!(uploaded.url, "https://cdn.test/brands/logo.png");
    }

    #[tokio::test]
    async fn test_upload_failure_maps_to_upload_error() {
        let backend = Arc::new(MockBackend::new("t"));
        let client = ApiClient::new(backend, SessionContext::with_token("t"));

        // default mock route answers without a url field
        let err = client.upload("cars", "car.jpg", vec![9u8]).await.unwrap_err();
        assert!(matches!(err, ClientError::Upload(_)));

        let err = client.upload(" ", "car.jpg", vec![9u8]).await.unwrap_err();
        assert!(matches!(err, ClientError::Upload(_)));
    }
}
