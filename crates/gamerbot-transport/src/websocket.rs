//! WebSocket transport implementation using `tokio-tungstenite`.
//!
//! Chat servers that speak protocol-over-WebSocket carry exactly one line
//! per text frame, with or without a trailing terminator.

use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use rustls::ClientConfig;
use tokio::sync::Mutex;
use tokio_tungstenite::Connector;
use tokio_tungstenite::tungstenite::Message;

use crate::{Connection, ConnectionId, MAX_LINE_BYTES, TransportError, trim_line_ending};

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// A single client-side WebSocket connection.
pub struct WebSocketConnection {
    id: ConnectionId,
    sink: Mutex<SplitSink<WsStream, Message>>,
    stream: Mutex<SplitStream<WsStream>>,
}

impl WebSocketConnection {
    /// Opens a WebSocket connection to `url` (e.g. `ws://host:8097/webirc`).
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        Self::open(url, None).await
    }

    /// Opens a `wss://` connection using `config` for the TLS handshake.
    pub async fn connect_tls(url: &str, config: Arc<ClientConfig>) -> Result<Self, TransportError> {
        Self::open(url, Some(Connector::Rustls(config))).await
    }

    async fn open(url: &str, connector: Option<Connector>) -> Result<Self, TransportError> {
        let (ws, _response) =
            tokio_tungstenite::connect_async_tls_with_config(url, None, false, connector)
                .await
                .map_err(|e| {
                    TransportError::ConnectFailed(std::io::Error::new(
                        std::io::ErrorKind::ConnectionRefused,
                        e,
                    ))
                })?;

        let (sink, stream) = ws.split();
        let id = ConnectionId::next();
        tracing::info!(url, %id, "WebSocket connection established");

        Ok(Self {
            id,
            sink: Mutex::new(sink),
            stream: Mutex::new(stream),
        })
    }
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    async fn send_line(&self, line: &str) -> Result<(), Self::Error> {
        let msg = Message::Text(line.to_string().into());
        self.sink.lock().await.send(msg).await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }

    async fn recv_line(&self) -> Result<Option<String>, Self::Error> {
        loop {
            let msg = self.stream.lock().await.next().await;
            match msg {
                Some(Ok(Message::Text(text))) if text.len() > MAX_LINE_BYTES => {
                    return Err(TransportError::InvalidLine(format!(
                        "frame longer than {MAX_LINE_BYTES} bytes"
                    )));
                }
                Some(Ok(Message::Binary(data))) if data.len() > MAX_LINE_BYTES => {
                    return Err(TransportError::InvalidLine(format!(
                        "frame longer than {MAX_LINE_BYTES} bytes"
                    )));
                }
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(trim_line_ending(text.as_str()).to_string()));
                }
                Some(Ok(Message::Binary(data))) => {
                    let text = String::from_utf8_lossy(&data);
                    return Ok(Some(trim_line_ending(&text).to_string()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // skip ping/pong/frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            e,
                        ),
                    ));
                }
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.sink.lock().await.close().await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
