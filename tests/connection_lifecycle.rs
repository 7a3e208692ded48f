//! Integration tests for the connection lifecycle: registration, keepalive
//! and disconnects.

mod common;

use std::time::Duration;

use common::{TestClient, TestServer};

#[tokio::test]
async fn registration_sends_welcome_burst() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = server.connect("alice").await.expect("connect");

    client.send_raw("NICK alice").await.expect("nick");
    client
        .send_raw("USER alice 0 * :Alice Liddell")
        .await
        .expect("user");

    let burst = client.recv_until(|m| m.verb == "004").await.expect("burst");
    let verbs: Vec<&str> = burst.iter().map(|m| m.verb.as_str()).collect();
    assert_eq!(verbs, vec!["001", "002", "003", "004"]);
    assert_eq!(burst[0].args[0], "alice");
    assert!(burst[0].args[1].contains("alice!alice@127.0.0.1"));

    client.send_raw("PING token").await.expect("ping");
    let pong = client.expect_verb("PONG").await.expect("pong");
    assert_eq!(pong.args, vec!["test.server", "token"]);

    client.send_raw("USER again 0 * :x").await.expect("user");
    client.expect_verb("462").await.expect("already registered");
}

#[tokio::test]
async fn commands_before_registration() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = server.connect("alice").await.expect("connect");

    client.send_raw("JOIN #demo").await.expect("join");
    let err = client.expect_verb("451").await.expect("not registered");
    assert_eq!(err.args[0], "*");

    client.send_raw("FROB").await.expect("frob");
    let err = client.expect_verb("421").await.expect("unknown");
    assert_eq!(err.args[1], "FROB");

    client.send_raw("PING early").await.expect("ping");
    client.expect_verb("PONG").await.expect("pong before registration");
}

#[tokio::test]
async fn unknown_command_after_registration() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut alice = server.client("alice").await.expect("alice");

    alice.send_raw("FROB x y").await.expect("frob");
    let err = alice.expect_verb("421").await.expect("unknown");
    assert_eq!(err.args, vec!["alice", "FROB", "Unknown command"]);
}

#[tokio::test]
async fn simultaneous_nick_claims_have_one_winner() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");

    let mut first = server.connect("dup").await.expect("connect");
    let mut second = server.connect("dup").await.expect("connect");
    let (a, b) = tokio::join!(first.register(), second.register());

    assert!(
        a.is_ok() ^ b.is_ok(),
        "exactly one registration must win: {a:?} / {b:?}"
    );
}

#[tokio::test]
async fn quit_is_announced_once_per_observer() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut alice = server.client("alice").await.expect("alice");
    let mut bob = server.client("bob").await.expect("bob");

    for chan in ["#one", "#two"] {
        alice.join_and_wait(chan).await.expect("alice join");
        bob.join_and_wait(chan).await.expect("bob join");
    }

    alice.quit(Some("bye")).await.expect("quit");
    let error = alice.expect_verb("ERROR").await.expect("closing link");
    assert!(error.args[0].starts_with("Closing Link"));

    let seen = bob.collect_for(Duration::from_millis(500)).await;
    let quits: Vec<_> = seen.iter().filter(|m| m.verb == "QUIT").collect();
    assert_eq!(quits.len(), 1, "one QUIT per observer: {seen:?}");
    assert_eq!(quits[0].source_nick(), Some("alice"));
    assert_eq!(quits[0].args, vec!["Quit: bye"]);

    bob.send_raw("NAMES #one").await.expect("names");
    let names = bob.expect_verb("353").await.expect("353");
    assert_eq!(names.args.last().map(String::as_str), Some("bob"));
}

#[tokio::test]
async fn dropped_connection_sends_quit() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut alice = server.client("alice").await.expect("alice");
    let mut bob = server.client("bob").await.expect("bob");

    alice.join_and_wait("#demo").await.expect("join");
    bob.join_and_wait("#demo").await.expect("join");
    drop(alice);

    let quit = bob.expect_verb("QUIT").await.expect("quit");
    assert_eq!(quit.source_nick(), Some("alice"));
    assert_eq!(quit.args, vec!["Connection closed"]);
    tokio::time::sleep(Duration::from_millis(200)).await;

    let again = server.client("alice").await;
    assert!(again.is_ok(), "nick must be released after disconnect");
}

#[tokio::test]
async fn overlong_line_is_rejected_but_session_survives() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut alice = server.client("alice").await.expect("alice");

    let long = format!("PRIVMSG alice :{}", "a".repeat(1000));
    alice.send_raw(&long).await.expect("long line");
    alice.expect_verb("417").await.expect("input too long");

    alice.send_raw("PING still-here").await.expect("ping");
    let pong = alice.expect_verb("PONG").await.expect("pong");
    assert_eq!(pong.args[1], "still-here");
}

#[tokio::test]
async fn unregistered_clients_time_out() {
    let server = TestServer::spawn_with("[timeouts]\nregistration = 1")
        .await
        .expect("Failed to spawn test server");
    let mut client = server.connect("slow").await.expect("connect");

    let error = client.expect_verb("ERROR").await.expect("timeout");
    assert!(error.args[0].contains("Registration timeout"));
    assert!(client.recv().await.is_err(), "connection should be closed");
}

#[tokio::test]
async fn silent_clients_are_pinged_then_dropped() {
    let server = TestServer::spawn_with("[timeouts]\nping = 1\ntimeout = 1")
        .await
        .expect("Failed to spawn test server");
    let mut client = TestClient::connect(&server.address(), "quiet")
        .await
        .expect("connect");
    client.register().await.expect("register");

    let ping = client.expect_verb("PING").await.expect("keepalive");
    assert_eq!(ping.args, vec!["test.server"]);

    let error = client.expect_verb("ERROR").await.expect("ping timeout");
    assert!(error.args[0].contains("Ping timeout"));
}

#[tokio::test]
async fn answering_keepalive_keeps_the_session() {
    let server = TestServer::spawn_with("[timeouts]\nping = 1\ntimeout = 1")
        .await
        .expect("Failed to spawn test server");
    let mut client = server.connect("chatty").await.expect("connect");
    client.register().await.expect("register");

    for _ in 0..3 {
        let ping = client.expect_verb("PING").await.expect("keepalive");
        client
            .send_raw(&format!("PONG :{}", ping.args[0]))
            .await
            .expect("pong");
    }

    client.send_raw("PING alive").await.expect("ping");
    client.expect_verb("PONG").await.expect("still connected");
}

#[tokio::test]
async fn simple_handshake_registers_on_nick() {
    let server = TestServer::spawn_configured("simple_handshake = true", "")
        .await
        .expect("Failed to spawn test server");
    let mut client = server.connect("solo").await.expect("connect");
    client.send_raw("NICK solo").await.expect("nick");
    let welcome = client.expect_verb("001").await.expect("welcome");
    assert_eq!(welcome.args[0], "solo");
}
