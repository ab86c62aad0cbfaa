//! Transport abstraction layer for gamerbot.
//!
//! Provides the [`Connection`] trait that abstracts over the different ways
//! of reaching a chat server. Every implementation moves whole protocol
//! lines: the caller never sees partial reads or line terminators.
//!
//! Plain TCP and TLS both go through [`TcpConnection`]; [`client_config`]
//! builds the rustls settings for TLS and for `wss://` URLs.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — chat-over-WebSocket via `tokio-tungstenite`,
//!   one protocol line per text frame

#![allow(async_fn_in_trait)]

mod error;
mod tcp;
mod tls;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
pub use tcp::TcpConnection;
pub use tls::client_config;
#[cfg(feature = "websocket")]
pub use websocket::WebSocketConnection;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Longest line accepted from a server: 8191 bytes of message tags plus
/// the classic 512 byte message.
pub const MAX_LINE_BYTES: usize = 8191 + 512;

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocates the next process-wide unique ID.
    pub(crate) fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A single connection to a chat server that exchanges text lines.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends one line to the remote peer. The line must not contain a
    /// terminator; the transport adds whatever framing it needs.
    async fn send_line(&self, line: &str) -> Result<(), Self::Error>;

    /// Receives the next line from the remote peer, without terminator.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    async fn recv_line(&self) -> Result<Option<String>, Self::Error>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}

/// Removes a trailing `\n` or `\r\n` from a received line.
pub(crate) fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
