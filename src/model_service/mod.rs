// Prediction service client module
// Public interface for talking to the external sentiment model service

mod client;
mod types;

pub use client::{ModelServiceClient, UPSTREAM_UNAVAILABLE};
pub use types::{AnalysisResult, PredictRequest, UNKNOWN_PREDICTION};
