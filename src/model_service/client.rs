// HTTP client for the prediction service

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use super::types::{AnalysisResult, PredictRequest};
use crate::errors::GatewayError;

/// Message substituted for the upstream info object when it cannot be fetched
pub const UPSTREAM_UNAVAILABLE: &str = "Could not connect to model service";

/// Client for the external prediction service
///
/// One attempt per call, bounded by the configured timeout. Callers retry.
#[derive(Debug, Clone)]
pub struct ModelServiceClient {
    client: Client,
    base_url: String,
}

impl ModelServiceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a review to `POST /predict` and return the body untouched
    pub async fn predict(&self, review: &str) -> Result<AnalysisResult, GatewayError> {
        let url = format!("{}/predict", self.base_url);
        tracing::debug!(%url, review_len = review.len(), "Sending review to model service");

        let response = self
            .client
            .post(&url)
            .json(&PredictRequest { review })
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Model service returned an error");
            return Err(GatewayError::Upstream(error_body));
        }

        let body: Value = response.json().await?;
        Ok(AnalysisResult(body))
    }

    /// Fetch the service's `GET /info` document
    ///
    /// The body is decoded whatever the status code; only transport or
    /// decode failures are errors.
    pub async fn fetch_info(&self) -> Result<Value, GatewayError> {
        let url = format!("{}/info", self.base_url);

        let info = self.client.get(&url).send().await?.json().await?;
        Ok(info)
    }

    /// Like `fetch_info`, but never fails
    ///
    /// Returns the info object and whether the service was reached.
    pub async fn info_or_placeholder(&self) -> (Value, bool) {
        match self.fetch_info().await {
            Ok(info) => (info, true),
            Err(e) => {
                tracing::warn!(error = %e, "Model service info unavailable");
                (serde_json::json!({ "error": UPSTREAM_UNAVAILABLE }), false)
            }
        }
    }
}
