//! Tandem relay configuration.
//!
//! Provides TOML-based configuration with environment overrides and full
//! validation. All config sections use defaults so partial configs work
//! out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tandem_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use env::apply_env_overrides;
pub use schema::{LoggingConfig, RoomsConfig, ServerConfig, TandemConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use tandem_common::ConfigError;

/// Load the effective config.
///
/// Reads `path` when given, otherwise the platform default (created if
/// missing). Environment overrides are applied and the result is validated
/// strictly: invalid values are an error here.
pub fn load_config(path: Option<&Path>) -> Result<TandemConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    apply_env_overrides(&mut config)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &TandemConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
