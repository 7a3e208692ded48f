//! Server query handlers (VERSION, TIME).

mod time;
mod version;

pub use time::TimeHandler;
pub use version::VersionHandler;
