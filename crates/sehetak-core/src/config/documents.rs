//! Upload limits and accepted content types.

use serde::{Deserialize, Serialize};

/// Document upload configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    /// Largest accepted payload in bytes (inclusive).
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_bytes: u64,
    /// Exact MIME types accepted for uploads and new versions.
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            max_upload_size_bytes: default_max_upload_size(),
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}

impl DocumentsConfig {
    /// Whether the MIME type is on the allow-list. Matching is exact.
    pub fn is_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.iter().any(|m| m == mime_type)
    }
}

fn default_max_upload_size() -> u64 {
    50 * 1024 * 1024
}

fn default_allowed_mime_types() -> Vec<String> {
    [
        "application/pdf",
        "image/jpeg",
        "image/png",
        "image/gif",
        "application/msword",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "application/vnd.ms-excel",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
