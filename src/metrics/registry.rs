// Process-wide metric registry
//
// Created once at startup and shared through `Arc`. Handlers only increment
// or observe; nothing resets a series short of a restart.

use anyhow::{Context, Result};
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

use super::labels::{correctness_label, sentiment_label, Page};

const RESPONSE_TIME_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

pub struct GatewayMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    response_time_seconds: Histogram,
    page_visits: IntGaugeVec,
    feedback_total: IntCounterVec,
}

impl GatewayMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new(
                "sentiment_requests_total",
                "Total review analysis requests by predicted sentiment",
            ),
            &["sentiment"],
        )?;

        let response_time_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "sentiment_response_time_seconds",
                "Time spent answering review analysis requests",
            )
            .buckets(RESPONSE_TIME_BUCKETS.to_vec()),
        )?;

        let page_visits = IntGaugeVec::new(
            Opts::new("sentiment_page_visits", "Visits per gateway page"),
            &["page"],
        )?;

        let feedback_total = IntCounterVec::new(
            Opts::new(
                "sentiment_feedback_total",
                "User feedback on predictions by correctness",
            ),
            &["correct", "predicted_sentiment", "actual_sentiment"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(response_time_seconds.clone()))?;
        registry.register(Box::new(page_visits.clone()))?;
        registry.register(Box::new(feedback_total.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            response_time_seconds,
            page_visits,
            feedback_total,
        })
    }

    pub fn record_page_visit(&self, page: Page) {
        self.page_visits.with_label_values(&[page.as_str()]).inc();
    }

    pub fn observe_response_time(&self, elapsed: Duration) {
        self.response_time_seconds.observe(elapsed.as_secs_f64());
    }

    pub fn record_prediction(&self, prediction: i64) {
        self.requests_total
            .with_label_values(&[sentiment_label(prediction)])
            .inc();
    }

    pub fn record_feedback(&self, prediction: i64, actual_sentiment: i64) {
        self.feedback_total
            .with_label_values(&[
                correctness_label(prediction, actual_sentiment),
                sentiment_label(prediction),
                sentiment_label(actual_sentiment),
            ])
            .inc();
    }

    pub fn requests_total(&self, sentiment: &str) -> u64 {
        self.requests_total.with_label_values(&[sentiment]).get()
    }

    pub fn feedback_total(&self, correct: &str, predicted: &str, actual: &str) -> u64 {
        self.feedback_total
            .with_label_values(&[correct, predicted, actual])
            .get()
    }

    pub fn page_visits(&self, page: Page) -> i64 {
        self.page_visits.with_label_values(&[page.as_str()]).get()
    }

    pub fn response_time_samples(&self) -> u64 {
        self.response_time_seconds.get_sample_count()
    }

    /// Encode every series in the Prometheus text format
    ///
    /// Returns the content type together with the body.
    pub fn render(&self) -> Result<(String, String)> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .context("Failed to encode metrics")?;

        let body = String::from_utf8(buffer).context("Metrics output was not UTF-8")?;
        Ok((encoder.format_type().to_string(), body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_prediction_counters() {
        let metrics = GatewayMetrics::new().unwrap();
        metrics.record_prediction(1);
        metrics.record_prediction(0);
        metrics.record_prediction(7);

        assert_eq!(metrics.requests_total("positive"), 1);
        assert_eq!(metrics.requests_total("negative"), 2);
    }

    #[test]
    fn test_feedback_labels() {
        let metrics = GatewayMetrics::new().unwrap();
        metrics.record_feedback(1, 1);
        metrics.record_feedback(1, 0);
        metrics.record_feedback(-1, -1);

        assert_eq!(metrics.feedback_total("true", "positive", "positive"), 1);
        assert_eq!(metrics.feedback_total("false", "positive", "negative"), 1);
        assert_eq!(metrics.feedback_total("true", "negative", "negative"), 1);
    }

    #[test]
    fn test_concurrent_increments_not_lost() {
        let metrics = Arc::new(GatewayMetrics::new().unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        metrics.record_page_visit(Page::Analyze);
                        metrics.record_prediction(1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.page_visits(Page::Analyze), 8000);
        assert_eq!(metrics.requests_total("positive"), 8000);
    }

    #[test]
    fn test_render_exposition_format() {
        let metrics = GatewayMetrics::new().unwrap();
        metrics.record_page_visit(Page::Feedback);
        metrics.observe_response_time(Duration::from_millis(120));

        let (content_type, body) = metrics.render().unwrap();
        assert!(content_type.starts_with("text/plain"));
        assert!(body.contains("sentiment_page_visits{page=\"feedback\"} 1"));
        assert!(body.contains("sentiment_response_time_seconds_count 1"));
    }
}
