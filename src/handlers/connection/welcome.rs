//! Registration burst (001-004).

use tinyirc_proto::{Message, Response};

use crate::handlers::helpers::server_reply;
use crate::state::ServerInfo;

/// User modes advertised in 004.
const USER_MODES: &str = "i";
/// Channel modes advertised in 004.
const CHANNEL_MODES: &str = "mtov";

pub fn welcome_burst(info: &ServerInfo, nick: &str, user: &str, host: &str) -> Vec<Message> {
    let name = info.name.as_str();
    vec![
        server_reply(
            name,
            Response::RPL_WELCOME,
            vec![
                nick.to_string(),
                format!(
                    "Welcome to the {} Internet Relay Chat Network {nick}!{user}@{host}",
                    info.network
                ),
            ],
        ),
        server_reply(
            name,
            Response::RPL_YOURHOST,
            vec![
                nick.to_string(),
                format!("Your host is {name}, running version {}", info.version),
            ],
        ),
        server_reply(
            name,
            Response::RPL_CREATED,
            vec![
                nick.to_string(),
                format!(
                    "This server was created {}",
                    info.created.format("%a %b %e %Y at %H:%M:%S UTC")
                ),
            ],
        ),
        server_reply(
            name,
            Response::RPL_MYINFO,
            vec![
                nick.to_string(),
                name.to_string(),
                info.version.clone(),
                USER_MODES.to_string(),
                CHANNEL_MODES.to_string(),
            ],
        ),
    ]
}
