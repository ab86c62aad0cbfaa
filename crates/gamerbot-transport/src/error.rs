/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The connection was closed.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Resolving or connecting to the remote server failed.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// The TLS client could not be set up (bad server name, no provider).
    #[error("tls error: {0}")]
    Tls(String),

    /// The remote peer sent bytes that are not a valid text line.
    #[error("invalid line: {0}")]
    InvalidLine(String),
}
