//! TCP accept loop and WebSocket upgrade.

use std::sync::Arc;

use tandem_config::ServerConfig;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::{header::ORIGIN, StatusCode};

use crate::connection::handle_connection;
use crate::router::RouterHandle;

/// Accept connections on `listener` forever, one task per socket.
pub async fn serve(listener: TcpListener, config: ServerConfig, router: RouterHandle) {
    let config = Arc::new(config);

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let router = router.clone();
                let config = Arc::clone(&config);
                tokio::spawn(async move {
                    let check = |req: &Request, resp: Response| check_origin(&config, req, resp);
                    match accept_hdr_async(stream, check).await {
                        Ok(ws) => handle_connection(ws, addr, router).await,
                        Err(e) => {
                            tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                        }
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
            }
        }
    }
}

/// Refuse the upgrade with 403 when the request's `Origin` is not allowed.
fn check_origin(
    config: &ServerConfig,
    req: &Request,
    resp: Response,
) -> Result<Response, ErrorResponse> {
    let origin = req.headers().get(ORIGIN).and_then(|v| v.to_str().ok());
    if config.allows_origin(origin) {
        return Ok(resp);
    }

    tracing::info!(origin = origin.unwrap_or("<invalid>"), "Origin rejected");
    let mut refusal = ErrorResponse::new(Some("origin not allowed".into()));
    *refusal.status_mut() = StatusCode::FORBIDDEN;
    Err(refusal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(origin: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("ws://localhost/");
        if let Some(origin) = origin {
            builder = builder.header(ORIGIN, origin);
        }
        builder.body(()).unwrap()
    }

    fn config(allowed: &str) -> ServerConfig {
        ServerConfig {
            allowed_origin: allowed.into(),
            ..Default::default()
        }
    }

    #[test]
    fn allowed_origin_passes() {
        let config = config("https://worley03.github.io");
        let result = check_origin(
            &config,
            &request(Some("https://worley03.github.io")),
            Response::new(()),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn missing_origin_passes() {
        let config = config("https://worley03.github.io");
        assert!(check_origin(&config, &request(None), Response::new(())).is_ok());
    }

    #[test]
    fn foreign_origin_is_forbidden() {
        let config = config("https://worley03.github.io");
        let refusal = check_origin(
            &config,
            &request(Some("https://evil.example")),
            Response::new(()),
        )
        .unwrap_err();
        assert_eq!(refusal.status(), StatusCode::FORBIDDEN);
    }
}
