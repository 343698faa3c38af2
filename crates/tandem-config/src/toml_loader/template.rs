//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# Tandem relay configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[server]
# port = 3000                        # overridden by $PORT, then by --port
# bind_address = "0.0.0.0"
# allowed_origin = "https://worley03.github.io"   # or "*"

[rooms]
# inactivity_timeout_secs = 300      # 10-86400, reset after no moves
# recovery_window_secs = 120         # 0-3600, 0 disables resume
# recovery_buffer = 256              # 1-4096 events held for a dropped client
# prune_interval_secs = 0            # 0 = never forget empty rooms

[logging]
# filter = "tandem_relay=info"       # RUST_LOG wins when set
"##
}
