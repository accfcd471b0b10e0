// Feedback endpoint handler
//
// Lets clients report whether a prediction matched the true sentiment.
// Feedback is logged and counted, never stored.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use super::GatewayServer;
use crate::errors::GatewayError;
use crate::metrics::{correctness_label, Page};
use crate::model_service::UNKNOWN_PREDICTION;

/// Request body for /feedback
///
/// Every field is optional. Missing or non-integral labels become
/// `UNKNOWN_PREDICTION`, which counts as "negative".
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedbackRequest {
    /// Review the prediction was made for
    #[serde(default, deserialize_with = "lenient_text")]
    pub review: String,
    /// Prediction the gateway returned (0 or 1)
    #[serde(default = "unknown_label", deserialize_with = "lenient_label")]
    pub prediction: i64,
    /// Sentiment the user says is correct (0 or 1)
    #[serde(default = "unknown_label", deserialize_with = "lenient_label")]
    pub actual_sentiment: i64,
}

impl Default for FeedbackRequest {
    fn default() -> Self {
        Self {
            review: String::new(),
            prediction: UNKNOWN_PREDICTION,
            actual_sentiment: UNKNOWN_PREDICTION,
        }
    }
}

impl FeedbackRequest {
    /// Read feedback out of any JSON value; anything but an object yields the defaults
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }

    pub fn is_correct(&self) -> bool {
        self.prediction == self.actual_sentiment
    }
}

fn unknown_label() -> i64 {
    UNKNOWN_PREDICTION
}

fn lenient_label<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(label_from_value(&value))
}

/// Integers, and floats without a fractional part, are labels
fn label_from_value(value: &Value) -> i64 {
    if let Some(label) = value.as_i64() {
        return label;
    }
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => f as i64,
        _ => UNKNOWN_PREDICTION,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Response body for /feedback
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    /// Always "success"
    pub status: String,
    pub message: String,
}

impl FeedbackResponse {
    fn received() -> Self {
        Self {
            status: "success".to_string(),
            message: "Feedback received".to_string(),
        }
    }
}

/// Handle POST /feedback - Record a correctness signal
///
/// Only an unparseable body is rejected; any JSON is accepted.
pub async fn handle_feedback(
    State(server): State<Arc<GatewayServer>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, GatewayError> {
    server.metrics().record_page_visit(Page::Feedback);

    let Json(value) = payload.map_err(|rejection| GatewayError::InvalidBody(rejection.body_text()))?;
    let feedback = FeedbackRequest::from_value(value);

    info!(
        review_len = feedback.review.len(),
        prediction = feedback.prediction,
        actual_sentiment = feedback.actual_sentiment,
        correct = correctness_label(feedback.prediction, feedback.actual_sentiment),
        "Feedback received"
    );

    server
        .metrics()
        .record_feedback(feedback.prediction, feedback.actual_sentiment);

    Ok(Json(FeedbackResponse::received()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feedback_request_parsing() {
        let feedback = FeedbackRequest::from_value(json!({
            "review": "The restaurant was fantastic!",
            "prediction": 1,
            "actual_sentiment": 0
        }));

        assert_eq!(feedback.review, "The restaurant was fantastic!");
        assert_eq!(feedback.prediction, 1);
        assert_eq!(feedback.actual_sentiment, 0);
        assert!(!feedback.is_correct());
    }

    #[test]
    fn test_missing_fields_use_sentinel() {
        let feedback = FeedbackRequest::from_value(json!({ "review": "ok" }));
        assert_eq!(feedback.prediction, UNKNOWN_PREDICTION);
        assert_eq!(feedback.actual_sentiment, UNKNOWN_PREDICTION);
        assert!(feedback.is_correct());
    }

    #[test]
    fn test_wrong_types_do_not_fail() {
        let feedback = FeedbackRequest::from_value(json!({
            "review": 12,
            "prediction": "yes",
            "actual_sentiment": null
        }));
        assert_eq!(feedback.review, "12");
        assert_eq!(feedback.prediction, UNKNOWN_PREDICTION);
        assert_eq!(feedback.actual_sentiment, UNKNOWN_PREDICTION);
    }

    #[test]
    fn test_non_object_body_defaults() {
        assert_eq!(FeedbackRequest::from_value(Value::Null), FeedbackRequest::default());
        assert_eq!(FeedbackRequest::from_value(json!(42)), FeedbackRequest::default());
        assert_eq!(
            FeedbackRequest::from_value(json!(["r", 1, 1])),
            FeedbackRequest::default()
        );
    }

    #[test]
    fn test_whole_floats_are_labels() {
        let feedback = FeedbackRequest::from_value(json!({
            "prediction": 1.0,
            "actual_sentiment": 1
        }));
        assert_eq!(feedback.prediction, 1);
        assert!(feedback.is_correct());

        let feedback = FeedbackRequest::from_value(json!({ "prediction": 0.5 }));
        assert_eq!(feedback.prediction, UNKNOWN_PREDICTION);
    }
}
