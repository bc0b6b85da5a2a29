//! Demo HTTP surface for the toolkit helpers
//!
//! - [`upload`] - multipart uploads into the uploads directory
//! - [`json`] - strict JSON intake, the error envelope and relaying
//! - [`download`] - serving a configured file as an attachment
//!

pub mod download;
pub mod json;
pub mod upload;


use std::path::PathBuf;

use actix_web::web;
pub use download::*;
pub use json::*;
pub use upload::*;

use crate::config::UploadConfig;

/// Per-deployment settings shared by the demo routes through `web::Data`.
///
/// The routes also expect `web::Data<JsonConfig>` and
/// `web::Data<dyn JsonTransport>` to be registered.
#[derive(Clone, Debug)]
pub struct ServiceSettings {
    pub uploads_dir: PathBuf,
    pub upload: UploadConfig,
    /// Where `/remote-service` relays its payload
    pub remote_uri: String,
    pub download_path: PathBuf,
    pub download_name: String,
}

/// Registers the demo routes
///
/// # Endpoints
///
/// | Method | Endpoint             | Success | Failure       |
/// | ------ | -------------------- | ------- | ------------- |
/// | `POST` | `/upload`            | `200`   | `400`         |
/// | `POST` | `/upload-one`        | `200`   | `400`         |
/// | `POST` | `/receive-post`      | `200`   | `400`/`413`   |
/// | `POST` | `/remote-service`    | `200`   | `400`/`413`/`502` |
/// | `POST` | `/simulated-service` | `200`   |               |
/// | `GET`  | `/download`          | `200`   | `404`         |
///
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(upload::upload_files)
        .service(upload::upload_one_file)
        .service(json::receive_post)
        .service(json::remote_service)
        .service(json::simulated_service)
        .service(download::download_file);
}
