//! Per-connection handler: handshake, register with the router, then pump
//! frames both ways until the socket ends.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tandem_common::{ConnectionId, ProtocolError, TandemError};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::protocol::{encode, parse_client_event, parse_hello, ServerEvent};
use crate::router::{RouterHandle, RouterInput};

/// How long a client has to send its hello.
pub const HELLO_TIMEOUT: Duration = Duration::from_secs(10);

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;
type WsStream = SplitStream<WebSocketStream<TcpStream>>;

/// How the socket ended.
enum Ending {
    Closed,
    Dropped,
    RouterGone,
}

/// Handle a single WebSocket connection.
pub async fn handle_connection(ws: WebSocketStream<TcpStream>, addr: SocketAddr, router: RouterHandle) {
    let (mut sink, mut stream) = ws.split();

    let resume = match read_hello(&mut stream).await {
        Ok(resume) => resume,
        Err(e) => {
            tracing::warn!(peer = %addr, error = %e, "Handshake failed");
            let _ = send_event(
                &mut sink,
                &ServerEvent::Error {
                    message: e.to_string(),
                },
            )
            .await;
            let _ = sink.close().await;
            return;
        }
    };

    let (tx, mut rx) = mpsc::channel::<ServerEvent>(router.outbound_capacity());
    let Some(conn) = router.attach(resume, tx).await else {
        tracing::warn!(peer = %addr, "Router unavailable, closing connection");
        return;
    };

    tracing::info!(peer = %addr, conn = %conn, "Client connected");

    let ending = loop {
        tokio::select! {
            outgoing = rx.recv() => {
                let Some(event) = outgoing else {
                    break Ending::RouterGone;
                };
                if let Err(e) = send_event(&mut sink, &event).await {
                    tracing::debug!(conn = %conn, error = %e, "Send failed");
                    break Ending::Dropped;
                }
            }

            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => match parse_client_event(&text) {
                        Ok(event) => {
                            let input = RouterInput::Client { conn: conn.clone(), event };
                            if !router.send(input).await {
                                break Ending::RouterGone;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(conn = %conn, error = %e, "Ignoring malformed frame");
                        }
                    },
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) => break Ending::Closed,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(conn = %conn, error = %e, "WS error");
                        break Ending::Dropped;
                    }
                    None => break Ending::Dropped,
                }
            }
        }
    };

    let input = match ending {
        Ending::Closed => {
            tracing::info!(peer = %addr, conn = %conn, "Client closed connection");
            RouterInput::Closed { conn }
        }
        Ending::Dropped => {
            tracing::info!(peer = %addr, conn = %conn, "Client connection lost");
            RouterInput::Dropped { conn }
        }
        Ending::RouterGone => {
            tracing::warn!(conn = %conn, "Router stopped");
            return;
        }
    };
    router.send(input).await;
}

/// Read the first frame. `Ok(Some(id))` asks to resume `id`.
async fn read_hello(stream: &mut WsStream) -> Result<Option<ConnectionId>, ProtocolError> {
    let frame = tokio::time::timeout(HELLO_TIMEOUT, stream.next())
        .await
        .map_err(|_| ProtocolError::HandshakeTimeout(HELLO_TIMEOUT.as_secs()))?;

    match frame {
        Some(Ok(Message::Text(text))) => Ok(parse_hello(&text)?.resume_id()),
        Some(Ok(other)) => Err(ProtocolError::UnexpectedFrame(format!(
            "expected text hello, got {}",
            frame_kind(&other)
        ))),
        Some(Err(e)) => Err(ProtocolError::UnexpectedFrame(e.to_string())),
        None => Err(ProtocolError::UnexpectedFrame(
            "connection closed before hello".into(),
        )),
    }
}

fn frame_kind(message: &Message) -> &'static str {
    match message {
        Message::Text(_) => "text",
        Message::Binary(_) => "binary",
        Message::Ping(_) => "ping",
        Message::Pong(_) => "pong",
        Message::Close(_) => "close",
        Message::Frame(_) => "raw frame",
    }
}

/// Send a ServerEvent as a JSON text frame.
async fn send_event(sink: &mut WsSink, event: &ServerEvent) -> Result<(), TandemError> {
    let json = encode(event)?;
    sink.send(Message::Text(json.into()))
        .await
        .map_err(|e| TandemError::Transport(e.to_string()))
}
