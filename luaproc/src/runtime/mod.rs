pub mod deferred;
pub mod host;
pub mod lifecycle;
pub mod state;
pub mod window;

pub use host::ScriptHost;
pub use lifecycle::{LifecycleController, LifecycleState};
pub use state::HostState;
pub use window::{WindowConfig, WindowFlags};
