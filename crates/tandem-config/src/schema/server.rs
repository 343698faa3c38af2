use serde::{Deserialize, Serialize};

/// Listener and handshake settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP port to listen on. Overridden by the `PORT` environment variable.
    pub port: u16,
    /// Interface address to bind.
    pub bind_address: String,
    /// Browser origin allowed to open a WebSocket, or `"*"` for any.
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            bind_address: "0.0.0.0".into(),
            allowed_origin: "https://worley03.github.io".into(),
        }
    }
}

impl ServerConfig {
    /// `address:port` string suitable for `TcpListener::bind`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Whether a handshake carrying `origin` may proceed.
    ///
    /// Requests without an `Origin` header come from non-browser clients and
    /// are always allowed. Trailing slashes are ignored on both sides.
    pub fn allows_origin(&self, origin: Option<&str>) -> bool {
        let Some(origin) = origin else {
            return true;
        };
        let allowed = self.allowed_origin.trim_end_matches('/');
        allowed == "*" || allowed.eq_ignore_ascii_case(origin.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_addr_joins_host_and_port() {
        let config = ServerConfig {
            port: 8080,
            bind_address: "127.0.0.1".into(),
            ..Default::default()
        };
        assert_eq!(config.listen_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn exact_origin_matches_ignoring_trailing_slash() {
        let config = ServerConfig {
            allowed_origin: "https://worley03.github.io/".into(),
            ..Default::default()
        };
        assert!(config.allows_origin(Some("https://worley03.github.io")));
        assert!(config.allows_origin(Some("https://WORLEY03.github.io/")));
        assert!(!config.allows_origin(Some("https://evil.example")));
    }

    #[test]
    fn wildcard_allows_everything() {
        let config = ServerConfig {
            allowed_origin: "*".into(),
            ..Default::default()
        };
        assert!(config.allows_origin(Some("http://localhost:5173")));
    }

    #[test]
    fn missing_origin_is_allowed() {
        assert!(ServerConfig::default().allows_origin(None));
    }
}
