//! Transport behaviour over an in-memory duplex pipe.

use tinyirc_proto::{Message, Transport, TransportError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

#[tokio::test]
async fn reads_whole_lines_across_split_writes() {
    let (client, server) = tokio::io::duplex(1024);
    let mut transport = Transport::new(server, 512);
    let mut client = client;

    client.write_all(b"NICK al").await.unwrap();
    client.write_all(b"ice\r\nJOIN #demo\n").await.unwrap();

    assert_eq!(transport.read_line().await.unwrap().as_deref(), Some("NICK alice"));
    assert_eq!(transport.read_line().await.unwrap().as_deref(), Some("JOIN #demo"));
}

#[tokio::test]
async fn end_of_stream_is_none_and_partial_line_is_dropped() {
    let (mut client, server) = tokio::io::duplex(1024);
    let mut transport = Transport::new(server, 512);

    client.write_all(b"PING a\r\nQUIT :half").await.unwrap();
    drop(client);

    assert_eq!(transport.read_line().await.unwrap().as_deref(), Some("PING a"));
    assert_eq!(transport.read_line().await.unwrap(), None);
}

#[tokio::test]
async fn overlong_line_is_recoverable() {
    let (mut client, server) = tokio::io::duplex(4096);
    let mut transport = Transport::new(server, 32);

    let long = format!("PRIVMSG #demo :{}\r\nPING ok\r\n", "x".repeat(100));
    client.write_all(long.as_bytes()).await.unwrap();

    let err = transport.read_line().await.unwrap_err();
    assert!(matches!(err, TransportError::LineTooLong { limit: 32 }));
    assert!(!err.is_fatal());
    assert_eq!(transport.read_line().await.unwrap().as_deref(), Some("PING ok"));
}

#[tokio::test]
async fn writes_are_crlf_terminated() {
    let (mut client, server) = tokio::io::duplex(1024);
    let mut transport = Transport::new(server, 512);

    let msg: Message = ":srv.local PONG srv.local :tok".parse().unwrap();
    transport.write_message(&msg).await.unwrap();

    let mut buf = vec![0u8; 64];
    let n = client.read(&mut buf).await.unwrap();
    assert_eq!(&buf[..n], b":srv.local PONG srv.local tok\r\n");
}

#[tokio::test]
async fn write_after_peer_drop_fails() {
    let (client, server) = tokio::io::duplex(64);
    let mut transport = Transport::new(server, 512);
    drop(client);

    let err = transport.write_line("PING x").await.unwrap_err();
    assert!(err.is_fatal());
}
