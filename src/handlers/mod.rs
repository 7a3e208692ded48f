//! IRC command handlers.
//!
//! Handlers are grouped by topic and registered once in [`Registry`].

mod channel;
mod connection;
pub mod core;
pub mod helpers;
mod messaging;
mod mode;
mod server_query;
mod user_query;

pub use self::connection::welcome::welcome_burst;
pub use self::core::Registry;
