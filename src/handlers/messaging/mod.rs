//! PRIVMSG and NOTICE handlers.
//!
//! Both verbs route identically: comma-separated targets, each a channel or
//! a nickname. They differ only in that NOTICE never produces an error reply.

mod delivery;
mod notice;
mod privmsg;

pub use notice::NoticeHandler;
pub use privmsg::PrivmsgHandler;
