//! Service binary for pdf2raster.
//!
//! A thin shim over the library crate: parse flags, bootstrap the backend,
//! serve the router until SIGINT/SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2raster::server::{init_backend, router, AppState};
use pdf2raster::ServiceConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pdf2rasterd",
    version,
    about = "HTTP service converting uploaded PDFs to per-page raster images"
)]
struct Cli {
    /// Address to listen on (default 0.0.0.0:8080).
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Install root containing bin/dll/<backend library>.
    #[arg(long)]
    install_root: Option<PathBuf>,

    /// Rasterisation resolution in dots per inch.
    #[arg(long)]
    dpi: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf2raster=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Flags override PDF2RASTER_* environment variables.
    let mut config = ServiceConfig::from_env().context("invalid configuration")?;
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(install_root) = cli.install_root {
        config.install_root = install_root;
    }
    if let Some(dpi) = cli.dpi {
        config.dpi = dpi;
    }
    config.validate().context("invalid configuration")?;

    info!("starting pdf2rasterd v{}", env!("CARGO_PKG_VERSION"));
    info!("install root: {}", config.install_root.display());
    info!("rendering at {} dpi", config.dpi);

    let backend = init_backend(&config);
    let bind_addr = config.bind_addr;
    let app = router(AppState::new(backend, config));

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("could not bind {bind_addr}"))?;
    info!("listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
