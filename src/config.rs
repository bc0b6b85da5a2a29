//! Per-call configuration for the upload and JSON helpers
//!
//! Both structs are plain values. Hosts either hand each request its own copy
//! or share one immutably through `web::Data`.

use serde::Deserialize;

/// Default ceiling for a whole multipart form
pub const DEFAULT_MAX_FILE_SIZE: usize = 1 << 30; // 1GB

/// Default ceiling for a JSON request body
pub const DEFAULT_MAX_JSON_SIZE: usize = 1 << 20; // 1MB

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Hard limit on the total bytes of all file parts in one form
    pub max_total_bytes: usize,
    /// Sniffed content types that are accepted; empty accepts everything
    pub allowed_content_types: Vec<String>,
    /// Store files under a random name that keeps the original extension
    pub rename_files: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_total_bytes: DEFAULT_MAX_FILE_SIZE,
            allowed_content_types: Vec::new(),
            rename_files: true,
        }
    }
}

impl UploadConfig {
    /// Returns whether a sniffed content type passes the allow-list
    pub fn allows(&self, content_type: &str) -> bool {
        self.allowed_content_types.is_empty()
            || self
                .allowed_content_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(content_type))
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct JsonConfig {
    pub max_body_bytes: usize,
    pub allow_unknown_fields: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_JSON_SIZE,
            allow_unknown_fields: false,
        }
    }
}
