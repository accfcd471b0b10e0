// Wire types for the prediction service

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stand-in for a prediction value that is absent or not an integer
pub const UNKNOWN_PREDICTION: i64 = -1;

/// Body of `POST /predict`
#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub review: &'a str,
}

/// Body returned by `POST /predict`
///
/// Normally `{"prediction": 0|1, "sentiment": "...", "review": "..."}`, but it
/// is kept as raw JSON so it can be relayed to the caller without alteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult(pub Value);

impl AnalysisResult {
    /// The `prediction` field, or `UNKNOWN_PREDICTION` if missing or not an integer
    pub fn prediction(&self) -> i64 {
        self.0
            .get("prediction")
            .and_then(Value::as_i64)
            .unwrap_or(UNKNOWN_PREDICTION)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}
