// Configuration module
// Public interface for configuration loading

mod loader;
mod settings;

pub use loader::{load_config, ConfigOverrides};
pub use settings::GatewayConfig;
