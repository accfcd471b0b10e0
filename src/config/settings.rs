// Configuration structs

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MODEL_SERVICE_URL: &str = "http://localhost:5000";
pub const DEFAULT_MODEL_SERVICE_VERSION: &str = "unknown";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Gateway configuration, passed to the server at construction
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Interface to bind (e.g., "0.0.0.0")
    pub host: String,

    /// Listen port
    pub port: u16,

    /// Base URL of the prediction service (e.g., "http://localhost:5000")
    pub model_service_url: String,

    /// Version reported for this gateway
    pub app_version: String,

    /// Version of the shared version library
    pub lib_version: String,

    /// Version reported for the configured prediction service
    pub model_service_version: String,

    /// Timeout for each outbound call to the prediction service
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_service_url: DEFAULT_MODEL_SERVICE_URL.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            lib_version: env!("CARGO_PKG_VERSION").to_string(),
            model_service_version: DEFAULT_MODEL_SERVICE_VERSION.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl GatewayConfig {
    /// Config pointing at the given prediction service, defaults elsewhere
    pub fn with_model_service(model_service_url: impl Into<String>) -> Self {
        let mut config = Self {
            model_service_url: model_service_url.into(),
            ..Self::default()
        };
        config.normalize();
        config
    }

    /// Trim trailing slashes so `{base}/predict` is well formed
    pub fn normalize(&mut self) {
        let trimmed = self.model_service_url.trim().trim_end_matches('/');
        self.model_service_url = trimmed.to_string();
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            bail!("Port must be greater than 0");
        }

        if self.request_timeout_secs == 0 {
            bail!("Request timeout must be greater than 0 seconds");
        }

        if self.model_service_url.is_empty() {
            bail!("Model service URL is required");
        }

        let url = url::Url::parse(&self.model_service_url)
            .with_context(|| format!("Invalid model service URL: {}", self.model_service_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "Model service URL must use http or https, got '{}'",
                url.scheme()
            );
        }

        Ok(())
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.model_service_url, "http://localhost:5000");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = GatewayConfig::with_model_service("http://model:8080/");
        assert_eq!(config.model_service_url, "http://model:8080");
    }

    #[test]
    fn test_invalid_port() {
        let config = GatewayConfig {
            port: 0,
            ..GatewayConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_url_scheme() {
        let config = GatewayConfig::with_model_service("ftp://model:21");
        assert!(config.validate().is_err());

        let config = GatewayConfig::with_model_service("not a url");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = GatewayConfig {
            request_timeout_secs: 0,
            ..GatewayConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bind_address() {
        let config = GatewayConfig {
            host: "127.0.0.1".to_string(),
            port: 8081,
            ..GatewayConfig::default()
        };
        let addr = config.bind_address().unwrap();
        assert_eq!(addr.port(), 8081);
    }
}
