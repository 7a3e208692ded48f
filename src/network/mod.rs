//! Network layer: the listening gateway and per-client connections.

mod connection;
mod gateway;

pub use connection::Connection;
pub use gateway::Gateway;
