//! State management module.
//!
//! Contains the Matrix (shared server state), the user and channel
//! registries, channel actors and per-connection session state.

pub mod actor;
pub mod channel;
pub mod managers;
mod matrix;
pub mod session;
mod uid;
mod user;

pub use matrix::{Matrix, MatrixConfig, ServerInfo};
pub use session::{RegisteredState, SessionState, UnregisteredState};
pub use uid::{Uid, UidGenerator};
pub use user::{User, UserModes};
