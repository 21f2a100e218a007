pub mod color;
pub mod state;
pub mod transform;

pub use color::{Color, ColorMode};
pub use state::{Camera2D, Camera3D, CanvasState, Projection, Renderer};
pub use transform::TransformStack;
