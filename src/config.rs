//! Process-wide upstream configuration.

use std::time::Duration;

use clap::ValueEnum;

/// Public resources listing endpoint of the Yandex.Disk REST API.
pub const YANDEX_API_URL: &str = "https://cloud-api.yandex.net/v1/disk/public/resources";

/// Public resources download-link endpoint of the Yandex.Disk REST API.
pub const YANDEX_DOWNLOAD_URL: &str =
    "https://cloud-api.yandex.net/v1/disk/public/resources/download";

const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// How a multi-file download reacts to a path that fails to resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BatchPolicy {
    /// Abort the whole batch on the first failure.
    #[default]
    FailFast,
    /// Skip failed paths and return whatever resolved.
    BestEffort,
}

/// How a single-file download is answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DownloadMode {
    /// Proxy the file bytes as an attachment.
    #[default]
    Stream,
    /// Render an anchor pointing at the resolved link.
    Link,
}

impl DownloadMode {
    /// Parse the `mode` query parameter. Unknown values yield `None`.
    pub fn from_param(value: &str) -> Option<Self> {
        Self::from_str(value.trim(), true).ok()
    }
}

/// Upstream endpoints and client policy, fixed at startup.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub listing_endpoint: String,
    pub download_endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Sent as `limit` on listing calls when set.
    pub listing_limit: Option<u32>,
    pub batch_policy: BatchPolicy,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            listing_endpoint: YANDEX_API_URL.to_string(),
            download_endpoint: YANDEX_DOWNLOAD_URL.to_string(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            listing_limit: None,
            batch_policy: BatchPolicy::default(),
        }
    }
}

impl UpstreamConfig {
    /// Point both endpoints at another base URL, keeping the Yandex paths.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            listing_endpoint: format!("{}/v1/disk/public/resources", base),
            download_endpoint: format!("{}/v1/disk/public/resources/download", base),
            ..Self::default()
        }
    }
}
