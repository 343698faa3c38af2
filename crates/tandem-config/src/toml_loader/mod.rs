//! Reading the relay's TOML file.
//!
//! Lookup order when no path is given: `$TANDEM_CONFIG`, then
//! `tandem/config.toml` under the platform config directory. A missing
//! default file is seeded with a commented template and defaults are used.

mod loader;
mod paths;
mod template;


pub use loader::{load_default, load_from_path};
pub use paths::{create_default_config, default_config_path, CONFIG_PATH_VAR};
