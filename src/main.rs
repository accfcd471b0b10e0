// Sentiment Gateway - HTTP gateway for restaurant review sentiment analysis
// Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use sentiment_gateway::config::{load_config, ConfigOverrides};
use sentiment_gateway::metrics::GatewayMetrics;
use sentiment_gateway::server::GatewayServer;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "sentiment-gateway")]
#[command(about = "HTTP gateway for restaurant review sentiment analysis", version)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Interface to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides PORT)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Prediction service base URL (overrides MODEL_SERVICE_URL)
    #[arg(long = "model-service-url")]
    model_service_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing();

    let overrides = ConfigOverrides {
        host: args.host,
        port: args.port,
        model_service_url: args.model_service_url,
    };
    let config = load_config(args.config.as_deref(), overrides)?;

    tracing::info!(
        app_version = %config.app_version,
        lib_version = %config.lib_version,
        model_service_version = %config.model_service_version,
        "Configuration loaded"
    );

    let metrics = Arc::new(GatewayMetrics::new().context("Failed to create metrics registry")?);
    let server = GatewayServer::new(config, metrics)?;

    server.serve().await
}

/// Initialize tracing
///
/// Default: INFO level, can be overridden with RUST_LOG env var
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Bridge log crate → tracing (for dependencies using log crate)
    tracing_log::LogTracer::init().ok();
}
