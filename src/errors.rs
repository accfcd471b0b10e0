// Request-level errors
//
// Every failure is local to the request that produced it. Each variant maps
// to an HTTP status and a `{"error": "..."}` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request body missing a usable `review` field
    #[error("Missing 'review' field in request")]
    Validation,

    /// Request body could not be parsed as JSON
    #[error("Invalid JSON in request body: {0}")]
    InvalidBody(String),

    /// Prediction service answered with a non-success status
    #[error("Model service returned error: {0}")]
    Upstream(String),

    /// Prediction service unreachable, timed out, or sent an undecodable body
    #[error("Could not connect to model service: {0}")]
    Connectivity(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::Connectivity(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Connectivity(err.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::warn!(error = %self, status = status.as_u16(), "Request failed");

        let body = json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
