//! The seam between the host and whatever draws pixels.
//!
//! [`Backend`] is deliberately immediate-mode: the host owns the frame loop
//! and calls into the backend in the same order the script issues API calls.

use glam::Vec3;
use serde::Serialize;

use crate::canvas::{Camera2D, Camera3D, Color};
use crate::core::error::HostResult;
use crate::runtime::window::WindowConfig;

pub mod frame_clock;
pub mod headless;
pub mod mesh;
pub mod window;

mod gpu;

pub use headless::{HeadlessBackend, HeadlessProbe};
pub use window::WindowBackend;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum CursorShape {
    #[default]
    Default,
    Arrow,
    IBeam,
    Crosshair,
    PointingHand,
    ResizeEw,
    ResizeNs,
    ResizeNwse,
    ResizeNesw,
    ResizeAll,
    NotAllowed,
}

impl CursorShape {
    pub const ALL: [(&'static str, CursorShape); 11] = [
        ("DEFAULT", Self::Default),
        ("ARROW", Self::Arrow),
        ("IBEAM", Self::IBeam),
        ("CROSSHAIR", Self::Crosshair),
        ("POINTING_HAND", Self::PointingHand),
        ("RESIZE_EW", Self::ResizeEw),
        ("RESIZE_NS", Self::ResizeNs),
        ("RESIZE_NWSE", Self::ResizeNwse),
        ("RESIZE_NESW", Self::ResizeNesw),
        ("RESIZE_ALL", Self::ResizeAll),
        ("NOT_ALLOWED", Self::NotAllowed),
    ];

    pub fn id(self) -> i64 {
        Self::ALL
            .iter()
            .position(|(_, shape)| *shape == self)
            .unwrap_or_default() as i64
    }

    pub fn from_id(id: i64) -> Option<Self> {
        usize::try_from(id)
            .ok()
            .and_then(|index| Self::ALL.get(index))
            .map(|(_, shape)| *shape)
    }
}

/// Everything the host asks of the native layer.
pub trait Backend {
    /// Creates the window and rendering surface. Called once.
    fn create_surface(&mut self, config: &WindowConfig) -> HostResult<()>;

    fn has_surface(&self) -> bool;

    /// Processes pending native events. Returns `false` once the window
    /// should close.
    fn pump(&mut self) -> bool;

    /// Latest surface size if it changed since the previous call.
    fn take_resize(&mut self) -> Option<(u32, u32)>;

    fn begin_frame(&mut self, clear: Color) -> HostResult<()>;
    fn end_frame(&mut self) -> HostResult<()>;

    fn begin_2d(&mut self, camera: &Camera2D);
    fn end_2d(&mut self);
    fn begin_3d(&mut self, camera: &Camera3D);
    fn end_3d(&mut self);

    fn push_matrix(&mut self);
    fn pop_matrix(&mut self);
    /// `angle` in radians.
    fn rotate(&mut self, angle: f32, axis: Vec3);
    fn translate(&mut self, offset: Vec3);
    fn scale(&mut self, factor: Vec3);

    fn draw_line(&mut self, start: Vec3, end: Vec3, color: Color);
    fn draw_rect(&mut self, rect: Rect, z: f32, color: Color);
    fn draw_rect_outline(
        &mut self,
        rect: Rect,
        z: f32,
        thickness: f32,
        color: Color,
    );
    fn draw_box(&mut self, size: Vec3, color: Color);
    fn draw_box_wires(&mut self, size: Vec3, color: Color);
    fn draw_sphere(&mut self, radius: f32, color: Color);

    fn show_cursor(&mut self);
    fn hide_cursor(&mut self);
    fn set_cursor(&mut self, shape: CursorShape);

    fn set_window_position(&mut self, x: i32, y: i32);
    fn set_window_size(&mut self, width: u32, height: u32);
    fn set_title(&mut self, title: &str);
    fn set_target_fps(&mut self, fps: u32);
    fn set_fullscreen(&mut self, fullscreen: bool);
    fn set_resizable(&mut self, resizable: bool);

    fn screen_size(&self) -> (u32, u32);
    fn display_size(&self) -> (u32, u32);
    fn is_focused(&self) -> bool;
}

/// One recorded backend call. The headless backend logs these and the
/// `--trace` flag dumps them as JSON.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    CreateSurface {
        width: u32,
        height: u32,
        title: String,
        fps: u32,
        fullscreen: bool,
        resizable: bool,
    },
    BeginFrame {
        clear: Color,
    },
    EndFrame,
    Begin2d {
        offset: [f32; 2],
        target: [f32; 2],
        zoom: f32,
    },
    End2d,
    Begin3d {
        position: [f32; 3],
        target: [f32; 3],
        fovy: f32,
        orthographic: bool,
    },
    End3d,
    PushMatrix,
    PopMatrix,
    Rotate {
        angle: f32,
        axis: [f32; 3],
    },
    Translate {
        offset: [f32; 3],
    },
    Scale {
        factor: [f32; 3],
    },
    Line {
        start: [f32; 3],
        end: [f32; 3],
        color: Color,
    },
    Rect {
        rect: Rect,
        z: f32,
        color: Color,
    },
    RectOutline {
        rect: Rect,
        z: f32,
        thickness: f32,
        color: Color,
    },
    Box {
        size: [f32; 3],
        color: Color,
    },
    BoxWires {
        size: [f32; 3],
        color: Color,
    },
    Sphere {
        radius: f32,
        color: Color,
    },
    ShowCursor,
    HideCursor,
    SetCursor {
        shape: CursorShape,
    },
    WindowPosition {
        x: i32,
        y: i32,
    },
    WindowSize {
        width: u32,
        height: u32,
    },
    Title {
        title: String,
    },
    TargetFps {
        fps: u32,
    },
    Fullscreen {
        enabled: bool,
    },
    Resizable {
        enabled: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_ids_cover_every_shape() {
        for (index, (_, shape)) in CursorShape::ALL.iter().enumerate() {
            assert_eq!(shape.id(), index as i64);
            assert_eq!(CursorShape::from_id(index as i64), Some(*shape));
        }
        assert_eq!(CursorShape::from_id(11), None);
        assert_eq!(CursorShape::from_id(-1), None);
    }

    #[test]
    fn commands_serialize_with_op_tag() {
        let json = serde_json::to_string(&DrawCommand::Translate {
            offset: [1.0, 2.0, 0.0],
        })
        .unwrap();
        assert_eq!(json, r#"{"op":"translate","offset":[1.0,2.0,0.0]}"#);
    }
}
