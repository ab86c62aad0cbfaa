//! Integration tests for the TCP line transport.

use gamerbot_transport::{Connection, MAX_LINE_BYTES, TcpConnection, TransportError, client_config};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Connects a `TcpConnection` to a fresh listener and returns both ends.
async fn connected_pair() -> (TcpConnection, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let addr = listener.local_addr().expect("should have addr").to_string();

    let accept = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("should accept");
        stream
    });
    let conn = TcpConnection::connect(&addr).await.expect("should connect");
    let server = accept.await.expect("task should complete");
    (conn, server)
}

#[tokio::test]
async fn test_tcp_send_line_appends_crlf() {
    let (conn, server) = connected_pair().await;

    conn.send_line("PRIVMSG #games :hello").await.expect("should send");

    let mut reader = BufReader::new(server);
    let mut line = String::new();
    reader.read_line(&mut line).await.expect("server read");
    assert_eq!(line, "PRIVMSG #games :hello\r\n");
}

#[tokio::test]
async fn test_tcp_recv_line_splits_on_newlines() {
    let (conn, mut server) = connected_pair().await;

    // Two lines in one write, mixed terminators.
    server
        .write_all(b"PING :one\r\nPING :two\n")
        .await
        .expect("server write");

    assert_eq!(conn.recv_line().await.unwrap().as_deref(), Some("PING :one"));
    assert_eq!(conn.recv_line().await.unwrap().as_deref(), Some("PING :two"));
}

#[tokio::test]
async fn test_tcp_recv_line_returns_none_on_eof() {
    let (conn, server) = connected_pair().await;
    drop(server);

    let line = conn.recv_line().await.expect("eof is not an error");
    assert!(line.is_none());
}

#[tokio::test]
async fn test_tcp_connect_refused_maps_to_connect_failed() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let result = TcpConnection::connect(&addr).await;
    assert!(matches!(result, Err(TransportError::ConnectFailed(_))));
}

#[tokio::test]
async fn test_tcp_connections_get_distinct_ids() {
    let (a, _sa) = connected_pair().await;
    let (b, _sb) = connected_pair().await;
    assert_ne!(a.id(), b.id());
}

#[tokio::test]
async fn test_tcp_recv_line_rejects_line_without_terminator_past_limit() {
    let (conn, mut server) = connected_pair().await;

    let flood = vec![b'a'; MAX_LINE_BYTES + 100];
    server.write_all(&flood).await.expect("server write");

    let result = conn.recv_line().await;
    assert!(
        matches!(result, Err(TransportError::InvalidLine(_))),
        "got {result:?}"
    );
}

#[tokio::test]
async fn test_tcp_recv_line_accepts_tagged_line_at_limit() {
    let (conn, mut server) = connected_pair().await;

    // Exactly MAX_LINE_BYTES including the terminator.
    let mut line = vec![b'x'; MAX_LINE_BYTES - 2];
    line.extend_from_slice(b"\r\n");
    server.write_all(&line).await.expect("server write");

    let received = conn.recv_line().await.expect("line fits").expect("some line");
    assert_eq!(received.len(), MAX_LINE_BYTES - 2);
}

#[tokio::test]
async fn test_tls_connect_rejects_invalid_server_name() {
    let config = client_config(false).expect("client config");

    let result = TcpConnection::connect_tls("127.0.0.1:1", "not a host", config).await;
    assert!(matches!(result, Err(TransportError::Tls(_))));
}

#[tokio::test]
async fn test_tls_handshake_against_plain_server_fails() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let addr = listener.local_addr().unwrap().to_string();

    // A plaintext IRC server answers the ClientHello with a text line.
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("should accept");
        let _ = stream
            .write_all(b"ERROR :Closing Link: not TLS\r\n")
            .await;
    });

    let config = client_config(true).expect("client config");
    let result = TcpConnection::connect_tls(&addr, "localhost", config).await;

    assert!(matches!(result, Err(TransportError::ConnectFailed(_))));
    server.await.expect("server task");
}
