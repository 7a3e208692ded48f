//! Connection and registration handlers.

mod nick;
mod ping;
mod quit;
mod user;
pub mod welcome;

pub use nick::NickHandler;
pub use ping::{PingHandler, PongHandler};
pub use quit::QuitHandler;
pub use user::UserHandler;
