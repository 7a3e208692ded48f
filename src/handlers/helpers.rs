//! Reply builders and argument helpers shared by handlers and channel actors.

use tinyirc_proto::{Message, Prefix, Response};

use crate::error::{ChannelError, HandlerError};
use crate::state::channel::Topic;

/// Budget for the names part of one 353 line, leaving room for the prefix,
/// numeric, nick and channel within a 512-byte line.
const NAMES_LINE_BUDGET: usize = 400;

/// Helper to create a server reply message (numeric response).
pub fn server_reply(server_name: &str, response: Response, params: Vec<String>) -> Message {
    Message::numeric(server_name, response, params)
}

/// 332 + 333 when a topic is set, otherwise 331.
pub fn topic_replies(
    server_name: &str,
    nick: &str,
    channel: &str,
    topic: Option<&Topic>,
) -> Vec<Message> {
    match topic {
        Some(topic) => vec![
            server_reply(
                server_name,
                Response::RPL_TOPIC,
                vec![nick.to_string(), channel.to_string(), topic.text.clone()],
            ),
            server_reply(
                server_name,
                Response::RPL_TOPICWHOTIME,
                vec![
                    nick.to_string(),
                    channel.to_string(),
                    topic.set_by.clone(),
                    topic.set_at.to_string(),
                ],
            ),
        ],
        None => vec![server_reply(
            server_name,
            Response::RPL_NOTOPIC,
            vec![
                nick.to_string(),
                channel.to_string(),
                "No topic is set".to_string(),
            ],
        )],
    }
}

/// 353 lines for `names` (already prefixed with `@`/`+`), split to fit the
/// line limit, followed by 366.
pub fn names_replies(
    server_name: &str,
    nick: &str,
    channel: &str,
    names: &[String],
) -> Vec<Message> {
    let mut replies = namreply_lines(server_name, nick, channel, names);
    replies.push(end_of_names(server_name, nick, channel));
    replies
}

/// Just the 353 lines, for listings that share one 366.
pub fn namreply_lines(
    server_name: &str,
    nick: &str,
    channel: &str,
    names: &[String],
) -> Vec<Message> {
    let mut replies = Vec::new();
    let mut line = String::new();
    for name in names {
        if !line.is_empty() && line.len() + 1 + name.len() > NAMES_LINE_BUDGET {
            replies.push(namreply(server_name, nick, channel, std::mem::take(&mut line)));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(name);
    }
    if !line.is_empty() {
        replies.push(namreply(server_name, nick, channel, line));
    }
    replies
}

fn namreply(server_name: &str, nick: &str, channel: &str, names: String) -> Message {
    server_reply(
        server_name,
        Response::RPL_NAMREPLY,
        vec![nick.to_string(), "=".to_string(), channel.to_string(), names],
    )
}

pub fn end_of_names(server_name: &str, nick: &str, channel: &str) -> Message {
    server_reply(
        server_name,
        Response::RPL_ENDOFNAMES,
        vec![
            nick.to_string(),
            channel.to_string(),
            "End of /NAMES list".to_string(),
        ],
    )
}

/// Map an actor's refusal onto a handler error. A channel that vanished
/// mid-request reads as nonexistent.
pub fn channel_error(channel: &str, err: ChannelError) -> HandlerError {
    match err {
        ChannelError::ChannelTombstone => HandlerError::NoSuchChannel(channel.to_string()),
        err => HandlerError::channel(channel, err),
    }
}

/// Items of a comma-separated argument, skipping empty ones.
pub fn split_list(arg: &str) -> impl Iterator<Item = &str> {
    arg.split(',').filter(|s| !s.is_empty())
}

/// `ERROR :Closing Link: host (reason)`, the last line a closing client sees.
pub fn closing_link(host: &str, reason: &str) -> Message {
    Message::new("ERROR", [format!("Closing Link: {host} ({reason})")])
}

/// Prefix for messages the server sends on its own behalf.
pub fn server_prefix(server_name: &str) -> Prefix {
    Prefix::ServerName(server_name.to_string())
}
