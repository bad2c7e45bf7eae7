//! HTML pages and HTTP responses built from client results.

use axum::body::Body;
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use futures::TryStreamExt;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use tracing::warn;
use url::form_urlencoded;

use crate::error::ShareError;
use crate::models::{format_size, DownloadLink, FileDescriptor};
use crate::url_parser::PublicKey;

/// MIME-type prefixes offered by the entry form.
pub const FILE_TYPES: &[(&str, &str)] = &[
    ("", "All files"),
    ("image", "Images"),
    ("video", "Video"),
    ("audio", "Audio"),
    ("text", "Text"),
    ("application", "Documents and archives"),
];

/// Escape text for use inside HTML element content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn query_string(pairs: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    ))
}

/// Entry form asking for a public link and an optional type filter.
pub fn render_index() -> Html<String> {
    let options: String = FILE_TYPES
        .iter()
        .map(|(value, label)| format!("<option value=\"{}\">{}</option>", value, label))
        .collect();

    let body = format!(
        "<h1>Yandex.Disk public files</h1>\n\
         <form method=\"get\" action=\"/files/\">\n\
         <label>Public link or key <input type=\"text\" name=\"public_key\" required></label>\n\
         <label>Type <select name=\"file_type\">{}</select></label>\n\
         <button type=\"submit\">Show files</button>\n\
         </form>",
        options
    );
    page("Yandex.Disk public files", &body)
}

/// Listing page: folders link deeper, files get a download link and a checkbox.
pub fn render_listing(
    key: &PublicKey,
    path: Option<&str>,
    filter: Option<&str>,
    files: &[FileDescriptor],
) -> Html<String> {
    let mut rows = String::new();

    for file in files {
        if file.is_directory {
            let mut params = vec![("public_key", key.as_str()), ("path", file.path.as_str())];
            if let Some(filter) = filter {
                params.push(("file_type", filter));
            }
            rows.push_str(&format!(
                "<tr><td></td><td><a href=\"/files/?{}\">{}/</a></td><td>folder</td><td>-</td></tr>\n",
                escape_html(&query_string(&params)),
                escape_html(&file.name)
            ));
            continue;
        }

        let download = query_string(&[
            ("public_key", key.as_str()),
            ("file_path", file.path.as_str()),
            ("file_name", file.name.as_str()),
        ]);
        let size = file.size.map(format_size).unwrap_or_else(|| "-".to_string());
        rows.push_str(&format!(
            "<tr><td><input type=\"checkbox\" name=\"file_ids\" value=\"{}\"></td>\
             <td><a href=\"/download/?{}\">{}</a></td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&file.path),
            escape_html(&download),
            escape_html(&file.name),
            escape_html(&file.mime_type),
            size
        ));
    }

    if files.is_empty() {
        rows.push_str("<tr><td colspan=\"4\">No files found.</td></tr>\n");
    }

    let heading = match path {
        Some(path) => format!("Files in {}", path),
        None => "Files".to_string(),
    };
    let body = format!(
        "<h1>{}</h1>\n\
         <form method=\"post\" action=\"/download_multiple/\">\n\
         <input type=\"hidden\" name=\"public_key\" value=\"{}\">\n\
         <table>\n<tr><th></th><th>Name</th><th>Type</th><th>Size</th></tr>\n{}</table>\n\
         <button type=\"submit\">Download selected</button>\n\
         </form>\n\
         <p><a href=\"/\">Back</a></p>",
        escape_html(&heading),
        escape_html(key.as_str()),
        rows
    );
    page(&heading, &body)
}

fn anchor(link: &DownloadLink, name: &str) -> String {
    format!(
        "<a href=\"{}\" download>{}</a><br>",
        escape_html(&link.href),
        escape_html(name)
    )
}

/// A single anchor pointing at a resolved link.
pub fn render_link(link: &DownloadLink, name: &str) -> Html<String> {
    Html(anchor(link, name))
}

/// One anchor per resolved link, in order.
pub fn render_links(links: &[DownloadLink]) -> Html<String> {
    Html(
        links
            .iter()
            .map(|link| anchor(link, link.file_name()))
            .collect(),
    )
}

/// `Content-Disposition` value with an ASCII fallback and an RFC 5987 name.
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        utf8_percent_encode(file_name, NON_ALPHANUMERIC)
    )
}

/// Proxy an upstream file body to the client as an attachment.
pub fn stream_file(upstream: reqwest::Response, file_name: &str) -> Response {
    let content_type = mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .to_string();
    let content_length = upstream.content_length();

    let name = file_name.to_string();
    let stream = upstream.bytes_stream().inspect_err(move |e| {
        warn!(error = %e, file = %name, "file stream interrupted");
    });

    let mut response = (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, content_disposition(file_name)),
        ],
        Body::from_stream(stream),
    )
        .into_response();

    if let Some(length) = content_length {
        response
            .headers_mut()
            .insert(header::CONTENT_LENGTH, length.into());
    }
    response
}

impl IntoResponse for ShareError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
