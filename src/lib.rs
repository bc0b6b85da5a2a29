//! Helpers for actix-web services: multipart uploads with content sniffing,
//! strict JSON intake and replies, file downloads, slugs, directory setup and
//! random strings.

pub mod config;
pub mod dirs;
pub mod download;
pub mod json;
pub mod random;
pub mod routes;
pub mod slug;
pub mod upload;

#[cfg(test)]
pub mod testing;

pub use config::{JsonConfig, UploadConfig};
pub use dirs::create_dir_if_not_exists;
pub use download::{download_static_file, download_static_file_in};
pub use json::{
    HttpTransport, JsonError, JsonResponse, JsonTransport, RelayError, RemoteResponse, StrictJson, error_json,
    push_json_to_remote, read_json, write_json,
};
pub use random::{RandomError, random_string};
pub use slug::{SlugError, slugify};
pub use upload::{UploadError, UploadFailure, UploadedFile, upload_files, upload_one_file};
