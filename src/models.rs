//! Data models for Yandex.Disk public resource API responses.

use serde::{Deserialize, Serialize};

/// One entry of a public resource listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    pub name: String,
    pub path: String,
    pub mime_type: String,
    pub is_directory: bool,
    pub size: Option<u64>,
    pub media_type: Option<String>,
    pub preview: Option<String>,
}

impl FileDescriptor {
    /// Case-sensitive MIME-type prefix match.
    pub fn matches_type(&self, prefix: &str) -> bool {
        self.mime_type.starts_with(prefix)
    }
}

impl From<ResourceItem> for FileDescriptor {
    fn from(item: ResourceItem) -> Self {
        Self {
            is_directory: item.kind.as_deref() == Some("dir"),
            name: item.name,
            path: item.path,
            mime_type: item.mime_type.unwrap_or_default(),
            size: item.size,
            media_type: item.media_type,
            preview: item.preview,
        }
    }
}

impl std::fmt::Display for FileDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size_str = self
            .size
            .map(format_size)
            .unwrap_or_else(|| "-".to_string());
        let mime = if self.is_directory {
            "dir"
        } else if self.mime_type.is_empty() {
            "-"
        } else {
            self.mime_type.as_str()
        };
        write!(f, "{}\t{}\t{}\t{}", self.path, size_str, mime, self.name)
    }
}

/// A short-lived direct download URL for one file of a public resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadLink {
    pub path: String,
    pub href: String,
}

impl DownloadLink {
    /// Last segment of the resource path, used as the file name.
    pub fn file_name(&self) -> &str {
        self.path
            .rsplit('/')
            .find(|s| !s.is_empty())
            .unwrap_or(&self.path)
    }
}

/// Format bytes into human-readable size.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Response from the public resources endpoint.
#[derive(Debug, Deserialize)]
pub struct ResourceListing {
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<EmbeddedItems>,
}

impl ResourceListing {
    pub fn into_items(self) -> Vec<ResourceItem> {
        self.embedded.map(|e| e.items).unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EmbeddedItems {
    #[serde(default)]
    pub items: Vec<ResourceItem>,
}

/// Raw listing item as sent by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceItem {
    pub name: String,
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub preview: Option<String>,
}

/// Response from the public download endpoint.
#[derive(Debug, Deserialize)]
pub struct LinkResponse {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
}

/// Yandex.Disk API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ApiErrorResponse {
    /// Best human-readable text available in the error body.
    pub fn summary(&self) -> String {
        let detail = self
            .message
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or_default();
        if detail.is_empty() {
            self.error.clone()
        } else {
            format!("{}: {}", self.error, detail)
        }
    }
}
