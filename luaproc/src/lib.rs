pub mod api;
pub mod backend;
pub mod canvas;
pub mod cli;
pub mod core;
pub mod prelude;
pub mod runtime;

pub use crate::core::logging;
pub use runtime::ScriptHost;
