// HTTP request handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use super::GatewayServer;
use crate::errors::GatewayError;
use crate::metrics::{sentiment_label, Page};

/// Create the main application router
pub fn create_router(server: Arc<GatewayServer>) -> Router {
    use super::feedback_handler::handle_feedback;

    Router::new()
        .route("/", get(index))
        .route("/info", get(get_info))
        .route("/analyze", post(analyze))
        .route("/feedback", post(handle_feedback))
        // Health and metrics
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_endpoint))
        .with_state(server)
}

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Restaurant Review Sentiment</title>
</head>
<body>
  <h1>Restaurant Review Sentiment</h1>
  <p>Submit reviews to <code>POST /analyze</code> and corrections to <code>POST /feedback</code>.</p>
  <footer>Version {{app_version}}</footer>
</body>
</html>
"#;

/// Handle GET / - Landing page
async fn index(State(server): State<Arc<GatewayServer>>) -> Html<String> {
    server.metrics().record_page_visit(Page::Index);

    let version = escape_html(&server.config().app_version);
    Html(INDEX_TEMPLATE.replace("{{app_version}}", &version))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Version information for the gateway and its prediction service
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub app_version: String,
    pub lib_version: String,
    pub model_service_version: String,
    pub model_service_url: String,
    /// "connected" or "disconnected"
    pub model_service_status: String,
    /// Upstream info document, or `{"error": ...}` when unreachable
    pub model_service_info: Value,
}

/// Handle GET /info - Always 200, upstream failures are embedded
async fn get_info(State(server): State<Arc<GatewayServer>>) -> Json<ServiceInfo> {
    let (model_service_info, reachable) = server.model_service().info_or_placeholder().await;
    let config = server.config();
    let status = if reachable { "connected" } else { "disconnected" };

    Json(ServiceInfo {
        app_version: config.app_version.clone(),
        lib_version: config.lib_version.clone(),
        model_service_version: config.model_service_version.clone(),
        model_service_url: config.model_service_url.clone(),
        model_service_status: status.to_string(),
        model_service_info,
    })
}

/// Request body for /analyze
#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub review: Option<String>,
}

impl AnalysisRequest {
    /// The review text, if present and non-empty
    pub fn into_review(self) -> Result<String, GatewayError> {
        match self.review {
            Some(review) if !review.is_empty() => Ok(review),
            _ => Err(GatewayError::Validation),
        }
    }
}

/// Handle POST /analyze - Forward a review to the prediction service
async fn analyze(
    State(server): State<Arc<GatewayServer>>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<Value>, GatewayError> {
    server.metrics().record_page_visit(Page::Analyze);

    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected analysis body");
        GatewayError::Validation
    })?;
    let review = request.into_review()?;

    let start_time = Instant::now();
    let outcome = server.model_service().predict(&review).await;
    server.metrics().observe_response_time(start_time.elapsed());

    let result = outcome?;
    let prediction = result.prediction();
    server.metrics().record_prediction(prediction);

    tracing::info!(
        review_len = review.len(),
        sentiment = sentiment_label(prediction),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Review analyzed"
    );

    Ok(Json(result.into_inner()))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub app_version: String,
    pub uptime_seconds: u64,
}

/// Handle GET /health - Gateway liveness, independent of the prediction service
pub async fn health_check(State(server): State<Arc<GatewayServer>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        app_version: server.config().app_version.clone(),
        uptime_seconds: server.uptime_seconds(),
    })
}

/// Handle GET /metrics - Prometheus metrics endpoint
pub async fn metrics_endpoint(State(server): State<Arc<GatewayServer>>) -> Response {
    match server.metrics().render() {
        Ok((content_type, body)) => ([(header::CONTENT_TYPE, content_type)], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_request_requires_review() {
        let request: AnalysisRequest = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert!(matches!(request.into_review(), Err(GatewayError::Validation)));

        let request: AnalysisRequest = serde_json::from_str(r#"{"review": ""}"#).unwrap();
        assert!(matches!(request.into_review(), Err(GatewayError::Validation)));

        let request: AnalysisRequest = serde_json::from_str(r#"{"review": "Superb"}"#).unwrap();
        assert_eq!(request.into_review().unwrap(), "Superb");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("1.0<b>"), "1.0&lt;b&gt;");
    }
}
