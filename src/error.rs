//! Error types for the yadisk_share crate.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to Yandex.Disk or serving a request.
#[derive(Error, Debug)]
pub enum ShareError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("HTTP error occurred ({status}): {body}")]
    UpstreamHttp { status: u16, body: String },

    #[error("Yandex.Disk is unavailable: {0}")]
    UpstreamUnavailable(#[from] reqwest::Error),

    #[error("Unexpected response from Yandex.Disk: {0}")]
    InvalidResponse(String),

    #[error("Download link not found for: {path}")]
    LinkNotFound { path: String },

    #[error("No download links could be resolved")]
    NoLinksResolved,

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl ShareError {
    /// HTTP status used when this error is turned into a response.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShareError::MissingParameter(_) => StatusCode::NOT_FOUND,
            ShareError::UpstreamHttp { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            ShareError::UpstreamUnavailable(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            ShareError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ShareError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
            ShareError::LinkNotFound { .. } | ShareError::NoLinksResolved => StatusCode::NOT_FOUND,
            ShareError::ClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result type alias for ShareError.
pub type Result<T> = std::result::Result<T, ShareError>;
