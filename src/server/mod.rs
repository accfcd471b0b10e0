// Sentiment Gateway - Server Module
// HTTP surface relaying review analysis to the prediction service

mod feedback_handler;
mod handlers;

pub use feedback_handler::{handle_feedback, FeedbackRequest, FeedbackResponse};
pub use handlers::{
    create_router, health_check, metrics_endpoint, AnalysisRequest, HealthStatus, ServiceInfo,
};

use anyhow::{Context, Result};
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::metrics::GatewayMetrics;
use crate::model_service::ModelServiceClient;

/// Main gateway server structure
pub struct GatewayServer {
    /// Prediction service client (shared across requests)
    model_service: ModelServiceClient,
    /// Metric registry (shared)
    metrics: Arc<GatewayMetrics>,
    /// Gateway configuration
    config: GatewayConfig,
    /// Process start time, for uptime reporting
    started_at: DateTime<Utc>,
}

impl GatewayServer {
    /// Create a new gateway server
    pub fn new(config: GatewayConfig, metrics: Arc<GatewayMetrics>) -> Result<Self> {
        let model_service =
            ModelServiceClient::new(config.model_service_url.clone(), config.request_timeout())?;

        Ok(Self {
            model_service,
            metrics,
            config,
            started_at: Utc::now(),
        })
    }

    /// Build the HTTP router, consuming the server into shared state
    pub fn into_router(self) -> Router {
        create_router(Arc::new(self)).layer(TraceLayer::new_for_http())
    }

    /// Start the HTTP server and run until a shutdown signal arrives
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.bind_address()?;
        let model_service_url = self.config.model_service_url.clone();

        let app = self.into_router();

        tracing::info!(%addr, %model_service_url, "Starting sentiment gateway");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        tracing::info!("Sentiment gateway stopped");
        Ok(())
    }

    pub fn model_service(&self) -> &ModelServiceClient {
        &self.model_service
    }

    pub fn metrics(&self) -> &Arc<GatewayMetrics> {
        &self.metrics
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
