//! Configuration schema types for the tandem relay.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults the relay ships with.

mod logging;
mod rooms;
mod server;

pub use logging::*;
pub use rooms::*;
pub use server::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct TandemConfig {
    pub server: ServerConfig,
    pub rooms: RoomsConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: TandemConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.rooms.inactivity_timeout_secs, 300);
        assert_eq!(config.rooms.recovery_window_secs, 120);
        assert_eq!(config.logging.filter, "tandem_relay=info");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: TandemConfig = toml::from_str(
            r#"
[rooms]
inactivity_timeout_secs = 60
"#,
        )
        .unwrap();
        assert_eq!(config.rooms.inactivity_timeout_secs, 60);
        assert_eq!(config.rooms.recovery_window_secs, 120);
        assert_eq!(config.server.bind_address, "0.0.0.0");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config: TandemConfig = toml::from_str(
            r#"
[server]
port = 4000
flavor = "vanilla"
"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 4000);
    }
}
