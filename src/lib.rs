// Sentiment Gateway - HTTP gateway for restaurant review sentiment analysis
// Library exports

pub mod config;
pub mod errors;
pub mod metrics;
pub mod model_service; // Client for the external prediction service
pub mod server;
