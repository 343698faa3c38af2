use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures decoding or sequencing frames on a client connection.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Malformed(String),

    #[error("unexpected frame: {0}")]
    UnexpectedFrame(String),

    #[error("handshake timed out after {0}s")]
    HandshakeTimeout(u64),
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TandemError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("rooms.recovery_buffer = 0".into());
        assert_eq!(
            err.to_string(),
            "config validation error: rooms.recovery_buffer = 0"
        );
    }

    #[test]
    fn protocol_error_display() {
        let err = ProtocolError::UnexpectedFrame("binary".into());
        assert_eq!(err.to_string(), "unexpected frame: binary");

        let err = ProtocolError::HandshakeTimeout(10);
        assert_eq!(err.to_string(), "handshake timed out after 10s");
    }

    #[test]
    fn protocol_error_from_serde() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ProtocolError = json_err.into();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn tandem_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: TandemError = config_err.into();
        assert!(matches!(err, TandemError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn tandem_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err: TandemError = io_err.into();
        assert!(matches!(err, TandemError::Io(_)));
        assert!(err.to_string().contains("port taken"));
    }

    #[test]
    fn tandem_error_other_variants() {
        let err = TandemError::Transport("router stopped".into());
        assert_eq!(err.to_string(), "transport error: router stopped");

        let err = TandemError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
