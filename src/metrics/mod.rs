// Metrics module
// Prometheus counters for analysis requests, feedback and page visits

mod labels;
mod registry;

pub use labels::{correctness_label, sentiment_label, Page};
pub use registry::GatewayMetrics;
