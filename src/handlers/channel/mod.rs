//! Channel-related command handlers.

mod join;
mod kick;
mod list;
mod names;
mod part;
mod topic;

pub use join::JoinHandler;
pub use kick::KickHandler;
pub use list::ListHandler;
pub use names::NamesHandler;
pub use part::PartHandler;
pub use topic::TopicHandler;
