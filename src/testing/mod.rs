//! Testing utilities for the upload, JSON and download routes
//!
//! Provides a multipart body builder, a recording relay transport and a
//! small client that runs requests against the demo service.

use std::sync::{Arc, Mutex};

use actix_multipart::Multipart;
use actix_web::http::header::{self, HeaderMap};
use actix_web::web::Bytes;
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::Value;
use tempfile::TempDir;

use crate::config::{JsonConfig, UploadConfig};
use crate::json::{JsonTransport, RelayError, RemoteResponse};
use crate::routes::{ServiceSettings, configure_routes};

/// A 1x1 transparent PNG
pub const SAMPLE_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00,
    0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49,
    0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

const BOUNDARY: &str = "toolkit-test-boundary";

/// Builds `multipart/form-data` request bodies
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a file part
    pub fn file(mut self, field: &str, filename: &str, data: impl AsRef<[u8]>) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data.as_ref());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Appends a plain form value
    pub fn text(mut self, field: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
        self
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    /// Closes the body
    pub fn finish(mut self) -> Vec<u8> {
        self.body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }

    /// Wraps the body in a [`Multipart`] stream as an extractor would
    pub fn into_multipart(self) -> Multipart {
        let content_type = self.content_type();
        let (req, payload) = test::TestRequest::post()
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(self.finish())
            .to_http_parts();

        Multipart::new(req.headers(), payload)
    }
}

/// Relay transport that records requests and answers with a fixed status
pub struct RecordingTransport {
    status: u16,
    pub requests: Mutex<Vec<(String, Value)>>,
}

impl RecordingTransport {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl JsonTransport for RecordingTransport {
    async fn post_json(&self, uri: &str, body: Vec<u8>) -> Result<RemoteResponse, RelayError> {
        let value = serde_json::from_slice(&body)?;
        self.requests.lock().unwrap().push((uri.to_string(), value));

        Ok(RemoteResponse {
            status: self.status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Bytes::from_static(br#"{"message":"okay","status_code":200}"#),
        })
    }
}

/// Runs requests against the demo service backed by a temporary directory
pub struct ToolkitTestClient {
    pub settings: ServiceSettings,
    pub json: JsonConfig,
    pub transport: Arc<RecordingTransport>,
    _temp_dir: TempDir,
}

impl ToolkitTestClient {
    /// Creates a client with default limits, uploads going to a fresh
    /// temporary directory and a sample PNG available for download
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let download_path = temp_dir.path().join("pic.png");
        tokio::fs::write(&download_path, SAMPLE_PNG).await.unwrap();

        let settings = ServiceSettings {
            uploads_dir: temp_dir.path().join("uploads"),
            upload: UploadConfig::default(),
            remote_uri: "http://simulated.test/simulated-service".to_string(),
            download_path,
            download_name: "picture.png".to_string(),
        };

        Self {
            settings,
            json: JsonConfig::default(),
            transport: Arc::new(RecordingTransport::new(200)),
            _temp_dir: temp_dir,
        }
    }

    pub fn with_upload_config(mut self, upload: UploadConfig) -> Self {
        self.settings.upload = upload;
        self
    }

    pub fn with_json_config(mut self, json: JsonConfig) -> Self {
        self.json = json;
        self
    }

    pub fn with_remote_status(mut self, status: u16) -> Self {
        self.transport = Arc::new(RecordingTransport::new(status));
        self
    }

    /// Makes a GET request to the specified path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(test::TestRequest::get().uri(path)).await
    }

    /// Makes a POST request with a JSON body
    pub async fn post_json(&self, path: &str, body: &str) -> TestResponse {
        let req = test::TestRequest::post()
            .uri(path)
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload(body.to_string());
        self.request(req).await
    }

    /// Makes a POST request with a multipart body
    pub async fn post_multipart(&self, path: &str, body: MultipartBody) -> TestResponse {
        let req = test::TestRequest::post()
            .uri(path)
            .insert_header((header::CONTENT_TYPE, body.content_type()))
            .set_payload(body.finish());
        self.request(req).await
    }

    async fn request(&self, req: test::TestRequest) -> TestResponse {
        let transport: Arc<dyn JsonTransport> = self.transport.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(self.settings.clone()))
                .app_data(web::Data::new(self.json.clone()))
                .app_data(web::Data::from(transport))
                .configure(configure_routes),
        )
        .await;

        let response = test::call_service(&app, req.to_request()).await;
        TestResponse::from_response(response).await
    }
}

/// Wrapper for HTTP responses with helper methods for testing
pub struct TestResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    async fn from_response(response: actix_web::dev::ServiceResponse) -> Self {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = test::read_body(response).await.to_vec();

        Self { status, headers, body }
    }

    /// Returns the response body as a UTF-8 string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Gets a header value as a string
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string())
    }

    pub fn assert_status(&self, expected: u16) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
    }

    pub fn assert_header(&self, name: &str, expected: &str) {
        let actual = self.header(name).unwrap_or_else(|| {
            panic!("Header '{name}' not found in response");
        });
        assert_eq!(actual, expected, "Header '{name}' mismatch");
    }

    /// Parses the body as JSON, panicking with the body on failure
    pub fn assert_json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!("Response is not valid JSON: {}. Body: {}", e, self.text());
        })
    }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;

    use super::*;

    #[actix_web::test]
    async fn test_multipart_body_parses() {
        let mut multipart = MultipartBody::new()
            .text("caption", "hi")
            .file("file", "a.png", SAMPLE_PNG)
            .into_multipart();

        let mut seen = Vec::new();
        while let Some(field) = multipart.next().await {
            let mut field = field.unwrap();
            let name = field.name().unwrap_or_default().to_string();
            let mut len = 0;
            while let Some(chunk) = field.next().await {
                len += chunk.unwrap().len();
            }
            seen.push((name, len));
        }

        assert_eq!(seen, vec![("caption".to_string(), 2), ("file".to_string(), SAMPLE_PNG.len())]);
    }
}
