//! Environment variable overrides applied on top of the TOML file.

use crate::schema::TandemConfig;
use tandem_common::ConfigError;
use tracing::info;

/// Environment variable carrying the listening port.
pub const PORT_VAR: &str = "PORT";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut TandemConfig) -> Result<(), ConfigError> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides using `lookup` to read variables.
pub fn apply_overrides_from<F>(config: &mut TandemConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(PORT_VAR) {
        let raw = raw.trim();
        if !raw.is_empty() {
            let port = raw.parse::<u16>().map_err(|e| {
                ConfigError::ValidationError(format!("{PORT_VAR} = {raw:?} is not a port: {e}"))
            })?;
            info!(port, "port taken from environment");
            config.server.port = port;
        }
    }
    Ok(())
}
