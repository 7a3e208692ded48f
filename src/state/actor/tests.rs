use super::*;
use std::collections::HashSet;
use tinyirc_proto::{ChannelModeChange, Prefix};
use tokio::sync::oneshot;

use crate::state::channel::ChannelModes;

fn actor(prune_empty: bool) -> ChannelActor {
    let settings = Arc::new(ActorSettings {
        server_name: "irc.test".into(),
        prune_empty,
        initial_modes: ChannelModes::default(),
    });
    ChannelActor::new("#demo".into(), 1, settings, Weak::new())
}

fn prefix(nick: &str) -> Prefix {
    Prefix::new(nick, nick, "localhost")
}

fn join(actor: &mut ChannelActor, uid: &str, nick: &str) -> mpsc::Receiver<Arc<Message>> {
    let (sender, rx) = mpsc::channel(64);
    let (reply_tx, mut reply_rx) = oneshot::channel();
    actor.handle_event(ChannelEvent::Join {
        params: JoinParams {
            uid: uid.into(),
            nick: nick.into(),
            prefix: prefix(nick),
            sender,
        },
        reply_tx,
    });
    assert!(matches!(
        reply_rx.try_recv(),
        Ok(Ok(JoinOutcome::Joined { .. }))
    ));
    rx
}

fn drain(rx: &mut mpsc::Receiver<Arc<Message>>) -> Vec<Arc<Message>> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

fn verbs(rx: &mut mpsc::Receiver<Arc<Message>>) -> Vec<String> {
    drain(rx).iter().map(|m| m.verb.clone()).collect()
}

fn notified() -> NotifiedSet {
    Arc::new(parking_lot::Mutex::new(HashSet::new()))
}

#[test]
fn joiner_gets_echo_topic_and_names() {
    let mut actor = actor(true);
    let mut rx = join(&mut actor, "U1", "alice");
    assert_eq!(verbs(&mut rx), ["JOIN", "331", "353", "366"]);
}

#[test]
fn existing_members_see_one_join() {
    let mut actor = actor(true);
    let mut alice = join(&mut actor, "U1", "alice");
    drain(&mut alice);

    let mut bob = join(&mut actor, "U2", "bob");
    let seen = drain(&mut alice);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].to_string(), ":bob!bob@localhost JOIN #demo");

    let names = drain(&mut bob)
        .into_iter()
        .find(|m| m.verb == "353")
        .unwrap();
    assert_eq!(names.args.last().map(String::as_str), Some("@alice bob"));
}

#[test]
fn second_join_is_a_no_op() {
    let mut actor = actor(true);
    let mut alice = join(&mut actor, "U1", "alice");
    drain(&mut alice);

    let (sender, _rx) = mpsc::channel(8);
    let (reply_tx, mut reply_rx) = oneshot::channel();
    actor.handle_event(ChannelEvent::Join {
        params: JoinParams {
            uid: "U1".into(),
            nick: "alice".into(),
            prefix: prefix("alice"),
            sender,
        },
        reply_tx,
    });
    assert!(matches!(
        reply_rx.try_recv(),
        Ok(Ok(JoinOutcome::AlreadyMember))
    ));
    assert!(drain(&mut alice).is_empty());
}

#[test]
fn privmsg_skips_the_sender() {
    let mut actor = actor(true);
    let mut alice = join(&mut actor, "U1", "alice");
    let mut bob = join(&mut actor, "U2", "bob");
    drain(&mut alice);
    drain(&mut bob);

    let msg = Arc::new(
        Message::new("PRIVMSG", ["#demo", "hi all"]).with_prefix(prefix("alice")),
    );
    let (reply_tx, mut reply_rx) = oneshot::channel();
    actor.handle_event(ChannelEvent::Message {
        sender_uid: "U1".into(),
        message: msg,
        reply_tx,
    });

    assert!(matches!(reply_rx.try_recv(), Ok(Ok(()))));
    assert!(drain(&mut alice).is_empty());
    assert_eq!(
        drain(&mut bob)[0].to_string(),
        ":alice!alice@localhost PRIVMSG #demo :hi all"
    );
}

#[test]
fn non_member_cannot_speak() {
    let mut actor = actor(true);
    let _alice = join(&mut actor, "U1", "alice");

    let (reply_tx, mut reply_rx) = oneshot::channel();
    actor.handle_event(ChannelEvent::Message {
        sender_uid: "U9".into(),
        message: Arc::new(Message::new("PRIVMSG", ["#demo", "x"])),
        reply_tx,
    });
    assert!(matches!(
        reply_rx.try_recv(),
        Ok(Err(ChannelError::CannotSendToChan))
    ));
}

#[test]
fn part_reaches_the_parter_and_prunes() {
    let mut actor = actor(true);
    let mut alice = join(&mut actor, "U1", "alice");
    drain(&mut alice);

    let (reply_tx, mut reply_rx) = oneshot::channel();
    actor.handle_event(ChannelEvent::Part {
        uid: "U1".into(),
        prefix: prefix("alice"),
        reason: Some("bye".into()),
        reply_tx,
    });

    assert!(matches!(reply_rx.try_recv(), Ok(Ok(()))));
    assert_eq!(
        drain(&mut alice)[0].to_string(),
        ":alice!alice@localhost PART #demo bye"
    );
    assert_eq!(actor.state, ActorState::Draining);
}

#[test]
fn draining_channel_refuses_joins() {
    let mut actor = actor(true);
    actor.state = ActorState::Draining;

    let (sender, _rx) = mpsc::channel(8);
    let (reply_tx, mut reply_rx) = oneshot::channel();
    actor.handle_event(ChannelEvent::Join {
        params: JoinParams {
            uid: "U1".into(),
            nick: "alice".into(),
            prefix: prefix("alice"),
            sender,
        },
        reply_tx,
    });
    assert!(matches!(
        reply_rx.try_recv(),
        Ok(Err(ChannelError::ChannelTombstone))
    ));
}

#[test]
fn retained_channel_stays_active_when_empty() {
    let mut actor = actor(false);
    let _alice = join(&mut actor, "U1", "alice");
    let (reply_tx, _reply_rx) = oneshot::channel();
    actor.handle_event(ChannelEvent::Part {
        uid: "U1".into(),
        prefix: prefix("alice"),
        reason: None,
        reply_tx,
    });
    assert_eq!(actor.state, ActorState::Active);

    // The next joiner of the empty channel becomes operator.
    let _bob = join(&mut actor, "U2", "bob");
    assert!(actor.channel.is_operator("U2"));
}

#[test]
fn kick_notifies_target_individually() {
    let mut actor = actor(true);
    let mut alice = join(&mut actor, "U1", "alice");
    let mut bob = join(&mut actor, "U2", "bob");
    let mut carol = join(&mut actor, "U3", "carol");
    drain(&mut alice);
    drain(&mut bob);
    drain(&mut carol);

    let (reply_tx, mut reply_rx) = oneshot::channel();
    actor.handle_event(ChannelEvent::Kick {
        sender_uid: "U1".into(),
        sender_prefix: prefix("alice"),
        target_uid: "U2".into(),
        target_nick: "bob".into(),
        reason: "spam".into(),
        reply_tx,
    });

    assert!(matches!(reply_rx.try_recv(), Ok(Ok(()))));
    let expected = ":alice!alice@localhost KICK #demo bob spam";
    for rx in [&mut alice, &mut bob, &mut carol] {
        let got = drain(rx);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].to_string(), expected);
    }
    assert_eq!(actor.channel.names(), ["@alice", "carol"]);
}

#[test]
fn kick_requires_operator() {
    let mut actor = actor(true);
    let _alice = join(&mut actor, "U1", "alice");
    let _bob = join(&mut actor, "U2", "bob");

    let (reply_tx, mut reply_rx) = oneshot::channel();
    actor.handle_event(ChannelEvent::Kick {
        sender_uid: "U2".into(),
        sender_prefix: prefix("bob"),
        target_uid: "U1".into(),
        target_nick: "alice".into(),
        reason: "bob".into(),
        reply_tx,
    });
    assert!(matches!(
        reply_rx.try_recv(),
        Ok(Err(ChannelError::ChanOpPrivsNeeded))
    ));
    assert!(actor.channel.is_member("U1"));
}

#[test]
fn quit_notice_is_sent_once_across_channels() {
    let mut first = actor(true);
    let mut second = actor(true);
    let _alice_a = join(&mut first, "U1", "alice");
    let _alice_b = join(&mut second, "U1", "alice");

    // bob shares both channels, using the same queue for each
    let (sender, mut bob) = mpsc::channel(64);
    for actor in [&mut first, &mut second] {
        let (reply_tx, _r) = oneshot::channel();
        actor.handle_event(ChannelEvent::Join {
            params: JoinParams {
                uid: "U2".into(),
                nick: "bob".into(),
                prefix: prefix("bob"),
                sender: sender.clone(),
            },
            reply_tx,
        });
    }
    drain(&mut bob);

    let quit = Arc::new(Message::new("QUIT", ["Quit: later"]).with_prefix(prefix("alice")));
    let seen = notified();
    for actor in [&mut first, &mut second] {
        actor.handle_event(ChannelEvent::Quit {
            uid: "U1".into(),
            message: Arc::clone(&quit),
            notified: Arc::clone(&seen),
            reply_tx: None,
        });
    }

    assert_eq!(verbs(&mut bob), ["QUIT"]);
    assert!(!first.channel.is_member("U1"));
    assert!(!second.channel.is_member("U1"));
}

#[test]
fn nick_change_skips_already_notified() {
    let mut actor = actor(true);
    let mut alice = join(&mut actor, "U1", "alice");
    let mut bob = join(&mut actor, "U2", "bob");
    drain(&mut alice);
    drain(&mut bob);

    let seen = notified();
    seen.lock().insert("U1".into());
    actor.handle_event(ChannelEvent::NickChange {
        uid: "U1".into(),
        new_nick: "alicia".into(),
        message: Arc::new(Message::new("NICK", ["alicia"]).with_prefix(prefix("alice"))),
        notified: seen,
    });

    assert!(drain(&mut alice).is_empty());
    assert_eq!(verbs(&mut bob), ["NICK"]);
    assert_eq!(actor.channel.names(), ["@alicia", "bob"]);
}

#[test]
fn topic_lock_and_mode_broadcast() {
    let mut actor = actor(true);
    let mut alice = join(&mut actor, "U1", "alice");
    let mut bob = join(&mut actor, "U2", "bob");
    drain(&mut alice);
    drain(&mut bob);

    let (reply_tx, mut reply_rx) = oneshot::channel();
    actor.handle_event(ChannelEvent::ApplyModes {
        sender_uid: "U1".into(),
        sender_prefix: prefix("alice"),
        requests: vec![
            ModeRequest {
                change: ChannelModeChange::TopicRestricted(true),
                target_uid: None,
            },
            ModeRequest {
                change: ChannelModeChange::Operator(true, "ghost".into()),
                target_uid: None,
            },
        ],
        reply_tx,
    });
    let outcome = reply_rx.try_recv().unwrap().unwrap();
    assert_eq!(outcome.applied, [ChannelModeChange::TopicRestricted(true)]);
    assert!(matches!(
        outcome.rejected.as_slice(),
        [ChannelError::UserNotInChannel(n)] if n == "ghost"
    ));
    assert_eq!(
        drain(&mut bob)[0].to_string(),
        ":alice!alice@localhost MODE #demo +t"
    );

    let (reply_tx, mut reply_rx) = oneshot::channel();
    actor.handle_event(ChannelEvent::SetTopic {
        sender_uid: "U2".into(),
        sender_prefix: prefix("bob"),
        text: "mine now".into(),
        reply_tx,
    });
    assert!(matches!(
        reply_rx.try_recv(),
        Ok(Err(ChannelError::ChanOpPrivsNeeded))
    ));
    assert!(drain(&mut alice).iter().all(|m| m.verb != "TOPIC"));
}

#[test]
fn full_queue_does_not_block_other_members() {
    let mut actor = actor(true);
    let _alice = join(&mut actor, "U1", "alice");
    let mut carol = join(&mut actor, "U3", "carol");

    // bob's queue holds a single message and is never read
    let (sender, _bob) = mpsc::channel(1);
    let (reply_tx, _r) = oneshot::channel();
    actor.handle_event(ChannelEvent::Join {
        params: JoinParams {
            uid: "U2".into(),
            nick: "bob".into(),
            prefix: prefix("bob"),
            sender,
        },
        reply_tx,
    });
    drain(&mut carol);

    for i in 0..5 {
        let (reply_tx, mut reply_rx) = oneshot::channel();
        actor.handle_event(ChannelEvent::Message {
            sender_uid: "U1".into(),
            message: Arc::new(Message::new("NOTICE", ["#demo", &format!("n{i}")])),
            reply_tx,
        });
        assert!(matches!(reply_rx.try_recv(), Ok(Ok(()))));
    }
    assert_eq!(drain(&mut carol).len(), 5);
}

#[test]
fn members_snapshot_is_in_join_order() {
    let mut actor = actor(true);
    let _a = join(&mut actor, "U1", "alice");
    let _b = join(&mut actor, "U2", "bob");

    let (reply_tx, mut reply_rx) = oneshot::channel();
    actor.handle_event(ChannelEvent::GetMembers { reply_tx });
    let members = reply_rx.try_recv().unwrap();
    let nicks: Vec<_> = members.iter().map(|m| m.nick.as_str()).collect();
    assert_eq!(nicks, ["alice", "bob"]);
    assert!(members[0].op);

    let (reply_tx, mut reply_rx) = oneshot::channel();
    actor.handle_event(ChannelEvent::GetInfo {
        requester_uid: Some("U2".into()),
        reply_tx,
    });
    let info = reply_rx.try_recv().unwrap();
    assert_eq!(info.member_count, 2);
    assert!(info.is_member);
}
