//! Handler core: per-command context, handler traits and the dispatch registry.

pub mod context;
pub mod registry;
pub mod traits;

pub use context::Context;
pub use registry::Registry;
pub use traits::{PostRegHandler, PreRegHandler, UniversalHandler};
