//! Integration tests for user-facing commands: NICK, WHOIS, user MODE and
//! private messages.

mod common;

use std::time::Duration;

use common::TestServer;

#[tokio::test]
async fn nick_change_is_seen_once_by_shared_members() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut alice = server.client("alice").await.expect("alice");
    let mut bob = server.client("bob").await.expect("bob");

    for chan in ["#one", "#two"] {
        alice.join_and_wait(chan).await.expect("alice join");
        bob.join_and_wait(chan).await.expect("bob join");
    }
    alice.drain().await;

    alice.send_raw("NICK alicia").await.expect("nick");
    let echo = alice.expect_verb("NICK").await.expect("echo");
    assert_eq!(echo.source_nick(), Some("alice"));
    assert_eq!(echo.args, vec!["alicia"]);

    let seen = bob.collect_for(Duration::from_millis(500)).await;
    let nicks: Vec<_> = seen.iter().filter(|m| m.verb == "NICK").collect();
    assert_eq!(nicks.len(), 1, "one NICK per observer: {seen:?}");
    assert_eq!(nicks[0].args, vec!["alicia"]);

    bob.send_raw("NAMES #one").await.expect("names");
    let names = bob.expect_verb("353").await.expect("353");
    assert_eq!(names.args.last().map(String::as_str), Some("@alicia bob"));
}

#[tokio::test]
async fn nick_collision_is_433() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let _alice = server.client("alice").await.expect("alice");
    let mut bob = server.client("bob").await.expect("bob");

    bob.send_raw("NICK alice").await.expect("nick");
    let err = bob.expect_verb("433").await.expect("in use");
    assert_eq!(err.args[1], "alice");

    bob.send_raw("NICK 9lives").await.expect("nick");
    bob.expect_verb("432").await.expect("erroneous");

    bob.send_raw("NICK").await.expect("nick");
    bob.expect_verb("431").await.expect("none given");
}

#[tokio::test]
async fn old_nick_is_free_after_rename() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut alice = server.client("alice").await.expect("alice");

    alice.send_raw("NICK alicia").await.expect("nick");
    alice.expect_verb("NICK").await.expect("echo");

    let carol = server.client("alice").await;
    assert!(carol.is_ok(), "old nick should be claimable");
}

#[tokio::test]
async fn whois_reports_user_and_channels() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut alice = server.client("alice").await.expect("alice");
    let mut bob = server.client("bob").await.expect("bob");

    alice.join_and_wait("#demo").await.expect("join");

    bob.send_raw("WHOIS alice").await.expect("whois");
    let replies = bob.recv_until(|m| m.verb == "318").await.expect("whois");
    let verbs: Vec<&str> = replies.iter().map(|m| m.verb.as_str()).collect();
    assert_eq!(verbs, vec!["311", "312", "319", "318"]);

    assert_eq!(
        replies[0].args,
        vec!["bob", "alice", "alice", "127.0.0.1", "*", "Test User alice"]
    );
    assert_eq!(replies[1].args[2], "test.server");
    assert_eq!(replies[2].args[2], "@#demo");
}

#[tokio::test]
async fn whois_unknown_nick() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut bob = server.client("bob").await.expect("bob");

    bob.send_raw("WHOIS nobody").await.expect("whois");
    let err = bob.expect_verb("401").await.expect("no such nick");
    assert_eq!(err.args[1], "nobody");
    bob.expect_verb("318").await.expect("end of whois");
}

#[tokio::test]
async fn user_mode_invisible() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut alice = server.client("alice").await.expect("alice");
    let _bob = server.client("bob").await.expect("bob");

    alice.send_raw("MODE alice +i").await.expect("mode");
    let mode = alice.expect_verb("MODE").await.expect("mode echo");
    assert_eq!(mode.args, vec!["alice", "+i"]);

    alice.send_raw("MODE alice").await.expect("query");
    let umode = alice.expect_verb("221").await.expect("221");
    assert_eq!(umode.args[1], "+i");

    alice.send_raw("MODE bob +i").await.expect("mode");
    alice.expect_verb("502").await.expect("users don't match");

    alice.send_raw("MODE alice +x").await.expect("mode");
    alice.expect_verb("501").await.expect("unknown flag");
}

#[tokio::test]
async fn invisible_users_hidden_from_outsiders() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut alice = server.client("alice").await.expect("alice");
    let mut bob = server.client("bob").await.expect("bob");

    alice.send_raw("MODE alice +i").await.expect("mode");
    alice.expect_verb("MODE").await.expect("mode echo");
    alice.join_and_wait("#demo").await.expect("join");

    bob.send_raw("NAMES #demo").await.expect("names");
    let replies = bob.recv_until(|m| m.verb == "366").await.expect("names");
    assert!(
        !replies
            .iter()
            .any(|m| m.verb == "353" && m.args.last().is_some_and(|n| n.contains("alice"))),
        "invisible member leaked: {replies:?}"
    );
}

#[tokio::test]
async fn private_messages_between_users() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut alice = server.client("alice").await.expect("alice");
    let mut bob = server.client("bob").await.expect("bob");

    alice.privmsg("bob", "psst").await.expect("privmsg");
    let msg = bob.expect_verb("PRIVMSG").await.expect("bob receives");
    assert_eq!(msg.source_nick(), Some("alice"));
    assert_eq!(msg.args, vec!["bob", "psst"]);

    alice.privmsg("nobody", "hello?").await.expect("privmsg");
    let err = alice.expect_verb("401").await.expect("no such nick");
    assert_eq!(err.args[1], "nobody");

    alice.send_raw("NOTICE nobody :hello?").await.expect("notice");
    let quiet = alice.collect_for(Duration::from_millis(300)).await;
    assert!(quiet.is_empty(), "NOTICE must not produce errors: {quiet:?}");

    alice.send_raw("PRIVMSG bob").await.expect("privmsg");
    alice.expect_verb("412").await.expect("no text");
}
