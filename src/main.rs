//! yadisk_share server - Browse and download Yandex.Disk public links.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use yadisk_share::config::{YANDEX_API_URL, YANDEX_DOWNLOAD_URL};
use yadisk_share::logging::init_logging;
use yadisk_share::{router, AppState, BatchPolicy, DiskClient, DownloadMode, UpstreamConfig};

/// Web front-end for listing and downloading Yandex.Disk public files.
#[derive(Parser, Debug)]
#[command(name = "yadisk_share")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Bind address.
    #[arg(long, env = "YADISK_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number.
    #[arg(long, env = "YADISK_PORT", default_value_t = 8000)]
    port: u16,

    /// Public resources listing endpoint.
    #[arg(long, env = "YADISK_LISTING_ENDPOINT", default_value = YANDEX_API_URL)]
    listing_endpoint: String,

    /// Public resources download-link endpoint.
    #[arg(long, env = "YADISK_DOWNLOAD_ENDPOINT", default_value = YANDEX_DOWNLOAD_URL)]
    download_endpoint: String,

    /// Seconds allowed for establishing an upstream connection.
    #[arg(long, default_value_t = 10)]
    connect_timeout_secs: u64,

    /// Seconds allowed for a listing or link-resolution call.
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,

    /// Number of items requested per listing (upstream default when unset).
    #[arg(long)]
    listing_limit: Option<u32>,

    /// What a multi-file download does when one path fails.
    #[arg(long, value_enum, default_value_t = BatchPolicy::FailFast)]
    batch_policy: BatchPolicy,

    /// Single-file response when the request does not choose one.
    #[arg(long, value_enum, default_value_t = DownloadMode::Stream)]
    download_mode: DownloadMode,
}

impl Cli {
    fn upstream_config(&self) -> UpstreamConfig {
        UpstreamConfig {
            listing_endpoint: self.listing_endpoint.clone(),
            download_endpoint: self.download_endpoint.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            listing_limit: self.listing_limit,
            batch_policy: self.batch_policy,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = cli.upstream_config();
    info!(
        listing = %config.listing_endpoint,
        download = %config.download_endpoint,
        batch_policy = ?config.batch_policy,
        "upstream configured"
    );

    let client = DiskClient::new(config).context("Failed to create Yandex.Disk client")?;
    let app = router(AppState::new(client, cli.download_mode));

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .with_context(|| format!("Invalid bind address: {}:{}", cli.host, cli.port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl+C, shutting down...");
    }
}
