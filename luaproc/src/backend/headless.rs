use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;

use super::{Backend, CursorShape, DrawCommand, Rect};
use crate::canvas::{Camera2D, Camera3D, Color, Projection};
use crate::core::error::{HostError, HostResult};
use crate::runtime::window::{WindowConfig, WindowFlags};

const DISPLAY_SIZE: (u32, u32) = (1920, 1080);

#[derive(Debug)]
struct HeadlessLog {
    commands: Vec<DrawCommand>,
    surface: Option<(u32, u32)>,
    pending_resize: Option<(u32, u32)>,
    close_requested: bool,
    frames: u64,
    matrix_depth: usize,
    max_matrix_depth: usize,
    cursor_visible: bool,
    cursor: CursorShape,
    position: (i32, i32),
    title: String,
    target_fps: u32,
    fullscreen: bool,
    resizable: bool,
    focused: bool,
}

impl Default for HeadlessLog {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            surface: None,
            pending_resize: None,
            close_requested: false,
            frames: 0,
            matrix_depth: 0,
            max_matrix_depth: 0,
            cursor_visible: true,
            cursor: CursorShape::Default,
            position: (0, 0),
            title: String::new(),
            target_fps: 0,
            fullscreen: false,
            resizable: false,
            focused: true,
        }
    }
}

/// Deterministic in-memory backend. Every call is appended to a command log
/// shared with any [`HeadlessProbe`] handed out by [`HeadlessBackend::probe`].
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    log: Rc<RefCell<HeadlessLog>>,
    frame_budget: Option<u64>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the loop after `frames` completed draw passes.
    pub fn with_frame_budget(frames: u64) -> Self {
        Self {
            log: Rc::default(),
            frame_budget: Some(frames),
        }
    }

    pub fn probe(&self) -> HeadlessProbe {
        HeadlessProbe {
            log: Rc::clone(&self.log),
        }
    }

    fn record(&self, command: DrawCommand) {
        self.log.borrow_mut().commands.push(command);
    }
}

impl Backend for HeadlessBackend {
    fn create_surface(&mut self, config: &WindowConfig) -> HostResult<()> {
        let (width, height) = config.size()?;
        let mut log = self.log.borrow_mut();
        if log.surface.is_some() {
            return Err(HostError::backend("surface already created"));
        }

        log.surface = Some((width, height));
        log.title = config.title.clone();
        log.target_fps = config.frame_rate;
        let fullscreen = config.flags.contains(WindowFlags::FULLSCREEN);
        let resizable = config.flags.contains(WindowFlags::RESIZABLE);
        log.fullscreen = fullscreen;
        log.resizable = resizable;
        log.commands.push(DrawCommand::CreateSurface {
            width,
            height,
            title: config.title.clone(),
            fps: config.frame_rate,
            fullscreen,
            resizable,
        });
        Ok(())
    }

    fn has_surface(&self) -> bool {
        self.log.borrow().surface.is_some()
    }

    fn pump(&mut self) -> bool {
        let log = self.log.borrow();
        if log.close_requested {
            return false;
        }
        match self.frame_budget {
            Some(budget) => log.frames < budget,
            None => true,
        }
    }

    fn take_resize(&mut self) -> Option<(u32, u32)> {
        let mut log = self.log.borrow_mut();
        let size = log.pending_resize.take()?;
        log.surface = Some(size);
        Some(size)
    }

    fn begin_frame(&mut self, clear: Color) -> HostResult<()> {
        if !self.has_surface() {
            return Err(HostError::backend("frame started without a surface"));
        }
        self.record(DrawCommand::BeginFrame { clear });
        Ok(())
    }

    fn end_frame(&mut self) -> HostResult<()> {
        let mut log = self.log.borrow_mut();
        log.frames += 1;
        log.commands.push(DrawCommand::EndFrame);
        Ok(())
    }

    fn begin_2d(&mut self, camera: &Camera2D) {
        self.record(DrawCommand::Begin2d {
            offset: camera.offset.to_array(),
            target: camera.target.to_array(),
            zoom: camera.zoom,
        });
    }

    fn end_2d(&mut self) {
        self.record(DrawCommand::End2d);
    }

    fn begin_3d(&mut self, camera: &Camera3D) {
        self.record(DrawCommand::Begin3d {
            position: camera.position.to_array(),
            target: camera.target.to_array(),
            fovy: camera.fovy,
            orthographic: camera.projection == Projection::Orthographic,
        });
    }

    fn end_3d(&mut self) {
        self.record(DrawCommand::End3d);
    }

    fn push_matrix(&mut self) {
        let mut log = self.log.borrow_mut();
        log.matrix_depth += 1;
        log.max_matrix_depth = log.max_matrix_depth.max(log.matrix_depth);
        log.commands.push(DrawCommand::PushMatrix);
    }

    fn pop_matrix(&mut self) {
        let mut log = self.log.borrow_mut();
        log.matrix_depth = log.matrix_depth.saturating_sub(1);
        log.commands.push(DrawCommand::PopMatrix);
    }

    fn rotate(&mut self, angle: f32, axis: Vec3) {
        self.record(DrawCommand::Rotate {
            angle,
            axis: axis.to_array(),
        });
    }

    fn translate(&mut self, offset: Vec3) {
        self.record(DrawCommand::Translate {
            offset: offset.to_array(),
        });
    }

    fn scale(&mut self, factor: Vec3) {
        self.record(DrawCommand::Scale {
            factor: factor.to_array(),
        });
    }

    fn draw_line(&mut self, start: Vec3, end: Vec3, color: Color) {
        self.record(DrawCommand::Line {
            start: start.to_array(),
            end: end.to_array(),
            color,
        });
    }

    fn draw_rect(&mut self, rect: Rect, z: f32, color: Color) {
        self.record(DrawCommand::Rect { rect, z, color });
    }

    fn draw_rect_outline(
        &mut self,
        rect: Rect,
        z: f32,
        thickness: f32,
        color: Color,
    ) {
        self.record(DrawCommand::RectOutline {
            rect,
            z,
            thickness,
            color,
        });
    }

    fn draw_box(&mut self, size: Vec3, color: Color) {
        self.record(DrawCommand::Box {
            size: size.to_array(),
            color,
        });
    }

    fn draw_box_wires(&mut self, size: Vec3, color: Color) {
        self.record(DrawCommand::BoxWires {
            size: size.to_array(),
            color,
        });
    }

    fn draw_sphere(&mut self, radius: f32, color: Color) {
        self.record(DrawCommand::Sphere { radius, color });
    }

    fn show_cursor(&mut self) {
        let mut log = self.log.borrow_mut();
        log.cursor_visible = true;
        log.commands.push(DrawCommand::ShowCursor);
    }

    fn hide_cursor(&mut self) {
        let mut log = self.log.borrow_mut();
        log.cursor_visible = false;
        log.commands.push(DrawCommand::HideCursor);
    }

    fn set_cursor(&mut self, shape: CursorShape) {
        let mut log = self.log.borrow_mut();
        log.cursor = shape;
        log.commands.push(DrawCommand::SetCursor { shape });
    }

    fn set_window_position(&mut self, x: i32, y: i32) {
        let mut log = self.log.borrow_mut();
        log.position = (x, y);
        log.commands.push(DrawCommand::WindowPosition { x, y });
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        let mut log = self.log.borrow_mut();
        log.pending_resize = Some((width, height));
        log.commands.push(DrawCommand::WindowSize { width, height });
    }

    fn set_title(&mut self, title: &str) {
        let mut log = self.log.borrow_mut();
        log.title = title.to_string();
        log.commands.push(DrawCommand::Title {
            title: title.to_string(),
        });
    }

    fn set_target_fps(&mut self, fps: u32) {
        let mut log = self.log.borrow_mut();
        log.target_fps = fps;
        log.commands.push(DrawCommand::TargetFps { fps });
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        let mut log = self.log.borrow_mut();
        log.fullscreen = fullscreen;
        log.commands.push(DrawCommand::Fullscreen {
            enabled: fullscreen,
        });
    }

    fn set_resizable(&mut self, resizable: bool) {
        let mut log = self.log.borrow_mut();
        log.resizable = resizable;
        log.commands.push(DrawCommand::Resizable { enabled: resizable });
    }

    fn screen_size(&self) -> (u32, u32) {
        self.log.borrow().surface.unwrap_or_default()
    }

    fn display_size(&self) -> (u32, u32) {
        DISPLAY_SIZE
    }

    fn is_focused(&self) -> bool {
        self.log.borrow().focused
    }
}

/// Read side of a [`HeadlessBackend`], usable after the backend has been
/// moved into a host.
#[derive(Clone, Debug)]
pub struct HeadlessProbe {
    log: Rc<RefCell<HeadlessLog>>,
}

impl HeadlessProbe {
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.log.borrow().commands.clone()
    }

    pub fn frames(&self) -> u64 {
        self.log.borrow().frames
    }

    pub fn has_surface(&self) -> bool {
        self.log.borrow().surface.is_some()
    }

    pub fn screen_size(&self) -> (u32, u32) {
        self.log.borrow().surface.unwrap_or_default()
    }

    pub fn matrix_depth(&self) -> usize {
        self.log.borrow().matrix_depth
    }

    pub fn max_matrix_depth(&self) -> usize {
        self.log.borrow().max_matrix_depth
    }

    pub fn cursor_visible(&self) -> bool {
        self.log.borrow().cursor_visible
    }

    pub fn cursor(&self) -> CursorShape {
        self.log.borrow().cursor
    }

    pub fn window_position(&self) -> (i32, i32) {
        self.log.borrow().position
    }

    pub fn title(&self) -> String {
        self.log.borrow().title.clone()
    }

    pub fn target_fps(&self) -> u32 {
        self.log.borrow().target_fps
    }

    pub fn fullscreen(&self) -> bool {
        self.log.borrow().fullscreen
    }

    pub fn resizable(&self) -> bool {
        self.log.borrow().resizable
    }

    /// Simulates the user resizing the window.
    pub fn request_resize(&self, width: u32, height: u32) {
        self.log.borrow_mut().pending_resize = Some((width, height));
    }

    /// Simulates the user closing the window.
    pub fn request_close(&self) {
        self.log.borrow_mut().close_requested = true;
    }

    pub fn set_focused(&self, focused: bool) {
        self.log.borrow_mut().focused = focused;
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.log.borrow().commands)
    }
}
