pub mod channel;
pub mod lifecycle;
pub mod user;
