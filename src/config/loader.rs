// Configuration loader
// Layers defaults, an optional TOML file, environment variables and CLI overrides

use anyhow::{Context, Result};
use std::path::Path;

use super::settings::{
    GatewayConfig, DEFAULT_HOST, DEFAULT_MODEL_SERVICE_URL, DEFAULT_MODEL_SERVICE_VERSION,
    DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_SECS,
};

/// Values given on the command line; these win over every other source
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub model_service_url: Option<String>,
}

/// Load gateway configuration
///
/// Precedence, lowest first: built-in defaults, `config_path` (if given),
/// environment variables (`PORT`, `MODEL_SERVICE_URL`, ...), `overrides`.
/// A `.env` file in the working directory is read into the environment first.
pub fn load_config(config_path: Option<&Path>, overrides: ConfigOverrides) -> Result<GatewayConfig> {
    dotenvy::dotenv().ok();

    load_config_with_env(config_path, overrides, config::Environment::default())
}

fn load_config_with_env(
    config_path: Option<&Path>,
    overrides: ConfigOverrides,
    environment: config::Environment,
) -> Result<GatewayConfig> {
    let mut builder = config::Config::builder()
        .set_default("host", DEFAULT_HOST)?
        .set_default("port", i64::from(DEFAULT_PORT))?
        .set_default("model_service_url", DEFAULT_MODEL_SERVICE_URL)?
        .set_default("app_version", env!("CARGO_PKG_VERSION"))?
        .set_default("lib_version", env!("CARGO_PKG_VERSION"))?
        .set_default("model_service_version", DEFAULT_MODEL_SERVICE_VERSION)?
        .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS as i64)?;

    if let Some(path) = config_path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let mut config: GatewayConfig = builder
        .add_source(environment)
        .build()
        .context("Failed to load configuration")?
        .try_deserialize()
        .context("Failed to parse configuration")?;

    if let Some(host) = overrides.host {
        config.host = host;
    }
    if let Some(port) = overrides.port {
        config.port = port;
    }
    if let Some(url) = overrides.model_service_url {
        config.model_service_url = url;
    }

    config.normalize();
    config.validate()?;

    tracing::debug!(?config, "Loaded configuration");

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Environment source that only sees variables nobody sets
    fn isolated_env() -> config::Environment {
        config::Environment::with_prefix("SENTIMENT_GATEWAY_TEST_UNSET")
    }

    #[test]
    fn test_load_from_file_with_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "model_service_url = \"http://model-service:5000/\"\n\
             model_service_version = \"1.2.0\"\n\
             request_timeout_secs = 3"
        )
        .unwrap();

        let overrides = ConfigOverrides {
            port: Some(8088),
            ..ConfigOverrides::default()
        };
        let config = load_config_with_env(Some(file.path()), overrides, isolated_env()).unwrap();

        assert_eq!(config.model_service_url, "http://model-service:5000");
        assert_eq!(config.model_service_version, "1.2.0");
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.port, 8088);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_config_with_env(
            Some(Path::new("/nonexistent/gateway.toml")),
            ConfigOverrides::default(),
            isolated_env(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_override_rejected() {
        let overrides = ConfigOverrides {
            model_service_url: Some("ftp://model".to_string()),
            ..ConfigOverrides::default()
        };
        assert!(load_config_with_env(None, overrides, isolated_env()).is_err());
    }
}
