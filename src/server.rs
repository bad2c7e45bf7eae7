//! HTTP front door: routes user requests to the client and the presenter.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use tracing::{info, warn};
use url::form_urlencoded;

use crate::client::DiskClient;
use crate::config::DownloadMode;
use crate::error::{Result, ShareError};
use crate::models::DownloadLink;
use crate::presenter;
use crate::url_parser::{extract_public_key, PublicKey};

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: Arc<DiskClient>,
    /// Used when a download request carries no `mode`.
    pub default_mode: DownloadMode,
}

impl AppState {
    pub fn new(client: DiskClient, default_mode: DownloadMode) -> Self {
        Self {
            client: Arc::new(client),
            default_mode,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/files/", get(files))
        .route("/download/", get(download_file))
        .route("/download_multiple/", post(download_multiple))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct FilesParams {
    pub public_key: Option<String>,
    pub file_type: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadParams {
    pub public_key: Option<String>,
    pub file_path: Option<String>,
    pub file_name: Option<String>,
    pub mode: Option<String>,
}

/// Treat absent, empty and whitespace-only values alike.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn required_key(raw: Option<&str>) -> Result<PublicKey> {
    non_blank(raw)
        .map(extract_public_key)
        .filter(|key| !key.is_empty())
        .ok_or(ShareError::MissingParameter("public_key"))
}

/// Log a failure before it becomes a response.
fn failure(context: &str, e: ShareError) -> Response {
    warn!(error = %e, status = e.status_code().as_u16(), "{} failed", context);
    e.into_response()
}

async fn index() -> Html<String> {
    presenter::render_index()
}

async fn files(State(state): State<AppState>, Query(params): Query<FilesParams>) -> Response {
    let key = match required_key(params.public_key.as_deref()) {
        Ok(key) => key,
        Err(_) => return Redirect::to("/").into_response(),
    };
    let filter = non_blank(params.file_type.as_deref());
    let path = non_blank(params.path.as_deref());

    match state.client.list_directory(&key, path, filter).await {
        Ok(items) => presenter::render_listing(&key, path, filter, &items).into_response(),
        Err(e) => failure("listing", e),
    }
}

async fn download_file(
    State(state): State<AppState>,
    Query(params): Query<DownloadParams>,
) -> Response {
    match handle_download(&state, &params).await {
        Ok(response) => response,
        Err(e) => failure("download", e),
    }
}

async fn handle_download(state: &AppState, params: &DownloadParams) -> Result<Response> {
    let key = required_key(params.public_key.as_deref())?;
    let file_path =
        non_blank(params.file_path.as_deref()).ok_or(ShareError::MissingParameter("file_path"))?;
    let file_name =
        non_blank(params.file_name.as_deref()).ok_or(ShareError::MissingParameter("file_name"))?;
    let mode = non_blank(params.mode.as_deref())
        .and_then(DownloadMode::from_param)
        .unwrap_or(state.default_mode);

    let link = state.client.resolve_download(&key, file_path).await?;

    match mode {
        DownloadMode::Link => Ok(presenter::render_link(&link, file_name).into_response()),
        DownloadMode::Stream => {
            let upstream = state.client.fetch_file(&link).await?;
            info!(path = %file_path, "streaming file");
            Ok(presenter::stream_file(upstream, file_name))
        }
    }
}

/// Form body of a multi-file download; `file_ids` repeats.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MultipleDownloadForm {
    pub public_key: Option<String>,
    pub file_ids: Vec<String>,
}

impl MultipleDownloadForm {
    pub fn parse(body: &[u8]) -> Self {
        let mut form = Self::default();
        for (name, value) in form_urlencoded::parse(body) {
            match name.as_ref() {
                "public_key" => form.public_key = Some(value.into_owned()),
                "file_ids" => form.file_ids.push(value.into_owned()),
                _ => {}
            }
        }
        form
    }
}

async fn download_multiple(State(state): State<AppState>, body: Bytes) -> Response {
    let form = MultipleDownloadForm::parse(&body);

    match handle_multiple(&state, &form).await {
        Ok(links) => presenter::render_links(&links).into_response(),
        Err(e) => failure("multiple download", e),
    }
}

async fn handle_multiple(
    state: &AppState,
    form: &MultipleDownloadForm,
) -> Result<Vec<DownloadLink>> {
    let key = required_key(form.public_key.as_deref())?;
    if form.file_ids.is_empty() {
        return Err(ShareError::MissingParameter("file_ids"));
    }
    state.client.resolve_downloads(&key, &form.file_ids).await
}
