use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shuttergate::config::ShuttergateConfig;
use shuttergate::http::HttpServer;
use shuttergate::ratelimit::RateLimiter;

/// Request throttling front for public image views.
#[derive(Parser, Debug)]
#[command(name = "shuttergate", version, about)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Listen address override
    #[arg(short, long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting Shuttergate");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match &args.config {
        Some(path) => ShuttergateConfig::from_file(path)?,
        None => ShuttergateConfig::default(),
    };
    if let Some(listen) = args.listen {
        config.server.listen_addr = listen;
    }
    info!(listen_addr = %config.server.listen_addr, "Configuration loaded");

    // Initialize the rate limiter
    let policy = config.rate_limiting.policy()?;
    info!(
        limit = policy.limit,
        window_secs = policy.window.as_secs(),
        protected_paths = ?policy.protected_paths,
        "Rate limiter initialized"
    );
    let limiter = Arc::new(RateLimiter::new(policy));

    // Periodic sweep of expired windows keeps the counter store bounded
    // under high client-key cardinality.
    let sweeper = Arc::clone(&limiter);
    let sweep_interval = config.rate_limiting.sweep_interval()?;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            sweeper.sweep(Instant::now());
        }
    });

    // Run the server with graceful shutdown on Ctrl+C or SIGTERM
    let server = HttpServer::new(config.server.listen_addr, limiter);
    server.serve_with_shutdown(shutdown_signal()).await?;

    info!("Shuttergate stopped");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
