pub use crate::backend::{
    Backend, CursorShape, DrawCommand, HeadlessBackend, HeadlessProbe, Rect,
    WindowBackend,
};
pub use crate::canvas::{
    Camera2D, Camera3D, CanvasState, Color, ColorMode, Projection, Renderer,
    TransformStack,
};
pub use crate::core::error::{HostError, HostResult, Origin};
pub use crate::core::logging::init_logger;
pub use crate::core::logging::{debug, error, info, trace, warn};
pub use crate::runtime::{
    HostState, LifecycleController, LifecycleState, ScriptHost, WindowConfig,
    WindowFlags,
};
