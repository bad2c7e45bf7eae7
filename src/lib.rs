//! yadisk_share - A small web front-end for Yandex.Disk public links.
//!
//! This library provides functionality to:
//! - Turn a public share link into the key the Yandex.Disk API expects
//! - List the files behind a public link, optionally filtered by MIME type
//! - Resolve one or several files to short-lived download links
//! - Serve all of it as HTML pages through an axum router
//!
//! # Example
//!
//! ```no_run
//! use yadisk_share::{extract_public_key, DiskClient, UpstreamConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = DiskClient::new(UpstreamConfig::default())?;
//!     let key = extract_public_key("https://disk.yandex.ru/d/abc123");
//!
//!     let files = client.list_files(&key, Some("image")).await?;
//!     for file in files {
//!         println!("{}", file);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod presenter;
pub mod server;
pub mod url_parser;

// Re-exports for convenience
pub use client::DiskClient;
pub use config::{BatchPolicy, DownloadMode, UpstreamConfig};
pub use error::{Result, ShareError};
pub use models::{DownloadLink, FileDescriptor};
pub use server::{router, AppState};
pub use url_parser::{extract_public_key, PublicKey};
