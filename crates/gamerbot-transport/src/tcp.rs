//! TCP transport: `\r\n` terminated lines over a socket, optionally
//! wrapped in TLS.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use rustls::ClientConfig;
use tokio_rustls::TlsConnector;

use crate::{Connection, ConnectionId, MAX_LINE_BYTES, TransportError, tls, trim_line_ending};

type LineReader = BufReader<Box<dyn AsyncRead + Send + Unpin>>;
type LineWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// A line-oriented TCP connection, plaintext or TLS.
///
/// The read and write halves are locked independently so a task waiting
/// for the next line never blocks an outgoing send.
pub struct TcpConnection {
    id: ConnectionId,
    reader: Mutex<LineReader>,
    writer: Mutex<LineWriter>,
}

impl TcpConnection {
    /// Connects to `addr` (`host:port`).
    pub async fn connect(addr: &str) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(TransportError::ConnectFailed)?;
        let conn = Self::from_stream(stream);
        tracing::info!(addr, id = %conn.id, "TCP connection established");
        Ok(conn)
    }

    /// Connects to `addr` and performs a TLS handshake, checking the
    /// certificate against `host`.
    pub async fn connect_tls(
        addr: &str,
        host: &str,
        config: Arc<ClientConfig>,
    ) -> Result<Self, TransportError> {
        let name = tls::server_name(host)?;
        let stream = TcpStream::connect(addr)
            .await
            .map_err(TransportError::ConnectFailed)?;
        let stream = TlsConnector::from(config)
            .connect(name, stream)
            .await
            .map_err(TransportError::ConnectFailed)?;

        let (read, write) = tokio::io::split(stream);
        let conn = Self::from_parts(Box::new(read), Box::new(write));
        tracing::info!(addr, host, id = %conn.id, "TLS connection established");
        Ok(conn)
    }

    /// Wraps an already connected stream.
    pub fn from_stream(stream: TcpStream) -> Self {
        let (read, write) = stream.into_split();
        Self::from_parts(Box::new(read), Box::new(write))
    }

    fn from_parts(
        read: Box<dyn AsyncRead + Send + Unpin>,
        write: Box<dyn AsyncWrite + Send + Unpin>,
    ) -> Self {
        Self {
            id: ConnectionId::next(),
            reader: Mutex::new(BufReader::new(read)),
            writer: Mutex::new(write),
        }
    }
}

impl Connection for TcpConnection {
    type Error = TransportError;

    async fn send_line(&self, line: &str) -> Result<(), Self::Error> {
        let mut data = Vec::with_capacity(line.len() + 2);
        data.extend_from_slice(line.as_bytes());
        data.extend_from_slice(b"\r\n");

        let mut writer = self.writer.lock().await;
        writer
            .write_all(&data)
            .await
            .map_err(TransportError::SendFailed)?;
        writer.flush().await.map_err(TransportError::SendFailed)
    }

    async fn recv_line(&self) -> Result<Option<String>, Self::Error> {
        let mut buf = Vec::new();
        let mut reader = self.reader.lock().await;
        let read = (&mut *reader)
            .take(MAX_LINE_BYTES as u64)
            .read_until(b'\n', &mut buf)
            .await
            .map_err(TransportError::ReceiveFailed)?;
        if read == 0 {
            return Ok(None);
        }
        if read == MAX_LINE_BYTES && buf.last() != Some(&b'\n') {
            return Err(TransportError::InvalidLine(format!(
                "line longer than {MAX_LINE_BYTES} bytes"
            )));
        }

        // Servers occasionally relay non UTF-8 text from other clients.
        let text = String::from_utf8_lossy(&buf);
        Ok(Some(trim_line_ending(&text).to_string()))
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.writer
            .lock()
            .await
            .shutdown()
            .await
            .map_err(TransportError::SendFailed)
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
