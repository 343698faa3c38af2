//! Where the relay looks for its config file, and seeding it with the
//! commented template.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tandem_common::ConfigError;
use tracing::{debug, info};

use super::template::default_config_toml;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_VAR: &str = "TANDEM_CONFIG";

const APP_DIR: &str = "tandem";
const FILE_NAME: &str = "config.toml";

/// Path used when no `--config` is given: `$TANDEM_CONFIG` if set,
/// otherwise `tandem/config.toml` under the platform config directory.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    resolve_config_path(std::env::var_os(CONFIG_PATH_VAR), dirs::config_dir())
}

pub(crate) fn resolve_config_path(
    explicit: Option<std::ffi::OsString>,
    platform_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    platform_dir
        .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
        .ok_or_else(|| {
            ConfigError::ParseError(format!(
                "no platform config directory; set {CONFIG_PATH_VAR} or pass --config"
            ))
        })
}

/// Write the commented template to `path`. An existing file is never
/// replaced.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!("cannot create {}: {e}", parent.display()))
        })?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!(path = %path.display(), "config already present, leaving it");
            return Ok(());
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "cannot create {}: {e}",
                path.display()
            )))
        }
    };

    file.write_all(default_config_toml().as_bytes())
        .map_err(|e| ConfigError::ParseError(format!("cannot write {}: {e}", path.display())))?;

    info!(path = %path.display(), "wrote default relay config");
    Ok(())
}
