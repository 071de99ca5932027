mod types;

pub use types::*;

use crate::Result;
use std::env;
use tracing::debug;

/// Loads configuration from the YAML file named by `CONFIG_PATH`
/// (default `luna.yaml`). A missing file yields the defaults; the
/// client runs bare against the local backend. `LUNA_BACKEND_URL`
/// overrides the configured origin either way.
pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "luna.yaml".to_string());

    debug!("Loading configuration from: {}", config_path);

    let mut config = match tokio::fs::read_to_string(&config_path).await {
        Ok(config_str) => serde_yaml::from_str(&config_str)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No config file at {}, using defaults", config_path);
            Config::default()
        }
        Err(e) => return Err(e.into()),
    };

    if let Ok(origin) = env::var("LUNA_BACKEND_URL") {
        config.backend.origin = origin;
    }

    Ok(config)
}
