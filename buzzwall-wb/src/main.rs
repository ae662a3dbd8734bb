//! buzzwall-wb (Word Board) - Buzzword submission backend
//!
//! Attendees submit buzzwords from their phones; the shared display polls
//! the live set. Submissions are deduplicated, capacity-bounded,
//! TTL-expired, and rate limited per client.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use buzzwall_common::config::{Config, DeploymentProfile};
use buzzwall_wb::{build_router, AppState};

/// Command-line arguments for buzzwall-wb
#[derive(Parser, Debug)]
#[command(name = "buzzwall-wb")]
#[command(about = "Word Board service for Buzzwall")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5750", env = "BUZZWALL_WB_PORT")]
    port: u16,

    /// Deployment profile (production or demo)
    #[arg(long, default_value = "demo", env = "BUZZWALL_PROFILE")]
    profile: DeploymentProfile,

    /// Path to TOML configuration file
    #[arg(short, long, env = "BUZZWALL_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "buzzwall_wb=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Buzzwall Word Board (buzzwall-wb) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let config = Config::load(args.config.as_deref(), args.profile)
        .context("Failed to load configuration")?;
    info!(
        "Profile {:?}: {} words max, {}s TTL, rate limit {} requests / {}s",
        args.profile,
        config.max_words,
        config.word_ttl_secs,
        config.rate_limit_max_requests,
        config.rate_limit_window_secs
    );

    let state = AppState::new(config);
    let app = build_router(state);

    // Bind on all interfaces: phones submit over the venue LAN
    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("buzzwall-wb listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
