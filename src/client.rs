//! Yandex.Disk API client for public resource operations.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{BatchPolicy, UpstreamConfig};
use crate::error::{Result, ShareError};
use crate::models::{ApiErrorResponse, DownloadLink, FileDescriptor, LinkResponse, ResourceListing};
use crate::url_parser::PublicKey;

/// Client for listing and downloading publicly shared Yandex.Disk resources.
#[derive(Debug, Clone)]
pub struct DiskClient {
    config: UpstreamConfig,
    http: Client,
}

impl DiskClient {
    /// Create a new DiskClient.
    ///
    /// The connect timeout applies to every call; the request timeout only
    /// to API calls, so file streams are not cut off.
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ShareError::ClientBuild)?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// List the root of a public resource.
    ///
    /// # Arguments
    /// * `key` - Public key of the shared resource
    /// * `filter` - Optional MIME-type prefix, e.g. `"image"`
    pub async fn list_files(
        &self,
        key: &PublicKey,
        filter: Option<&str>,
    ) -> Result<Vec<FileDescriptor>> {
        self.list_directory(key, None, filter).await
    }

    /// List a folder inside a public resource, keeping the upstream order.
    pub async fn list_directory(
        &self,
        key: &PublicKey,
        path: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Vec<FileDescriptor>> {
        let mut request = self
            .http
            .get(&self.config.listing_endpoint)
            .timeout(self.config.request_timeout)
            .query(&[("public_key", key.as_str())]);

        if let Some(path) = path {
            request = request.query(&[("path", path)]);
        }
        if let Some(limit) = self.config.listing_limit {
            request = request.query(&[("limit", limit)]);
        }

        let response = request.send().await.inspect_err(|e| {
            warn!(error = %e, "listing request failed");
        })?;
        let listing: ResourceListing = read_json(response).await?;

        let files: Vec<FileDescriptor> = listing
            .into_items()
            .into_iter()
            .map(FileDescriptor::from)
            .filter(|file| filter.map_or(true, |prefix| file.matches_type(prefix)))
            .collect();

        debug!(key = %key, count = files.len(), "listed public resource");
        Ok(files)
    }

    /// Resolve one file path to a direct download link.
    pub async fn resolve_download(&self, key: &PublicKey, path: &str) -> Result<DownloadLink> {
        let response = self
            .http
            .get(&self.config.download_endpoint)
            .timeout(self.config.request_timeout)
            .query(&[("public_key", key.as_str()), ("path", path)])
            .send()
            .await
            .inspect_err(|e| {
                warn!(error = %e, path, "download link request failed");
            })?;

        let link: LinkResponse = read_json(response).await?;
        match link.href {
            Some(href) if !href.is_empty() => Ok(DownloadLink {
                path: path.to_string(),
                href,
            }),
            _ => {
                warn!(path, "download response carried no link");
                Err(ShareError::LinkNotFound {
                    path: path.to_string(),
                })
            }
        }
    }

    /// Resolve several file paths, one after another, in input order.
    ///
    /// Blank paths are skipped. Failures are handled per the configured
    /// [`BatchPolicy`]; an empty result is [`ShareError::NoLinksResolved`].
    pub async fn resolve_downloads(
        &self,
        key: &PublicKey,
        paths: &[String],
    ) -> Result<Vec<DownloadLink>> {
        let mut links = Vec::with_capacity(paths.len());

        for path in paths.iter().filter(|p| !p.trim().is_empty()) {
            match self.resolve_download(key, path).await {
                Ok(link) => links.push(link),
                Err(e) => match self.config.batch_policy {
                    BatchPolicy::FailFast => return Err(e),
                    BatchPolicy::BestEffort => {
                        warn!(path = %path, error = %e, "skipping unresolved path");
                    }
                },
            }
        }

        if links.is_empty() {
            return Err(ShareError::NoLinksResolved);
        }
        Ok(links)
    }

    /// Start fetching the bytes behind a resolved link.
    pub async fn fetch_file(&self, link: &DownloadLink) -> Result<Response> {
        let response = self.http.get(&link.href).send().await.inspect_err(|e| {
            warn!(error = %e, path = %link.path, "file request failed");
        })?;

        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "file response");

        if !status.is_success() {
            return Err(api_error(response).await);
        }
        Ok(response)
    }
}

/// Check the status and decode a JSON body, mapping each failure kind.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    debug!(url = %response.url(), status = status.as_u16(), "upstream response");

    if !status.is_success() {
        return Err(api_error(response).await);
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        warn!(error = %e, "malformed upstream body");
        ShareError::InvalidResponse(e.to_string())
    })
}

async fn api_error(response: Response) -> ShareError {
    let status = response.status().as_u16();
    let error_body = response.text().await.unwrap_or_default();
    warn!(status, body = %error_body, "upstream returned an error");

    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
        return ShareError::UpstreamHttp {
            status,
            body: api_error.summary(),
        };
    }
    ShareError::UpstreamHttp {
        status,
        body: error_body,
    }
}
