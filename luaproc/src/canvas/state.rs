use std::f32::consts::FRAC_PI_3;

use glam::{Vec2, Vec3};

use super::color::{Color, ColorMode};
use super::transform::TransformStack;
use crate::core::error::{HostError, HostResult};

/// Depth offset added per filled rect so successive overlays never z-fight.
pub const Z_ORDER_STEP: f32 = 0.1;

/// Vertical field of view used by the perspective camera.
pub const PERSPECTIVE_FOV: f32 = FRAC_PI_3;

/// Added to the larger window side to form the orthographic far plane.
pub const ORTHO_DEPTH_MARGIN: f32 = 800.0;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Renderer {
    #[default]
    P2D,
    P3D,
}

impl Renderer {
    pub fn id(self) -> i64 {
        match self {
            Self::P2D => 0,
            Self::P3D => 1,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            0 => Some(Self::P2D),
            1 => Some(Self::P3D),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// Screen-space camera. `target` is mapped to `offset` on screen; y grows
/// downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera2D {
    pub offset: Vec2,
    pub target: Vec2,
    pub rotation: f32,
    pub zoom: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            target: Vec2::ZERO,
            rotation: 0.0,
            zoom: 1.0,
        }
    }
}

impl Camera2D {
    pub fn centered(width: f32, height: f32) -> Self {
        let center = Vec2::new(width / 2.0, height / 2.0);
        Self {
            offset: center,
            target: center,
            rotation: 0.0,
            zoom: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// World-space height framed at the target plane.
    pub fovy: f32,
    /// Vertical view angle in radians. Only meaningful for perspective.
    pub fov_angle: f32,
    pub projection: Projection,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera3D {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy: 0.0,
            fov_angle: PERSPECTIVE_FOV,
            projection: Projection::Perspective,
            near: 0.01,
            far: 1000.0,
        }
    }
}

impl Camera3D {
    /// Perspective camera on the +z axis that exactly frames `height` world
    /// units at the window center.
    pub fn framing(width: f32, height: f32) -> Self {
        let distance = (height / 2.0) / (PERSPECTIVE_FOV / 2.0).tan();
        Self {
            position: Vec3::new(width / 2.0, height / 2.0, distance),
            target: Vec3::new(width / 2.0, height / 2.0, 0.0),
            up: Vec3::Y,
            fovy: height,
            fov_angle: PERSPECTIVE_FOV,
            projection: Projection::Perspective,
            near: distance / 10.0,
            far: distance * 10.0,
        }
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }
}

/// Mutable drawing attributes shared by every API call.
#[derive(Clone, Debug)]
pub struct CanvasState {
    pub color_mode: ColorMode,
    pub background: Color,
    pub fill: Color,
    pub stroke: Color,
    pub no_fill: bool,
    pub no_stroke: bool,
    pub z_order: f32,
    pub renderer: Renderer,
    pub camera_2d: Camera2D,
    pub camera_3d: Camera3D,
    pub transform: TransformStack,
    width: f32,
    height: f32,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Rgb,
            background: Color::new(128, 128, 128, 255),
            fill: Color::new(255, 255, 255, 255),
            stroke: Color::new(0, 0, 0, 255),
            no_fill: false,
            no_stroke: false,
            z_order: 0.0,
            renderer: Renderer::P2D,
            camera_2d: Camera2D::default(),
            camera_3d: Camera3D::default(),
            transform: TransformStack::default(),
            width: 0.0,
            height: 0.0,
        }
    }
}

impl CanvasState {
    pub fn apply_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn apply_fill(&mut self, color: Color) {
        self.fill = color;
        self.no_fill = false;
    }

    pub fn apply_stroke(&mut self, color: Color) {
        self.stroke = color;
        self.no_stroke = false;
    }

    pub fn set_no_fill(&mut self) {
        self.no_fill = true;
    }

    pub fn set_no_stroke(&mut self) {
        self.no_stroke = true;
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
    }

    pub fn projection(&self) -> Projection {
        self.camera_3d.projection
    }

    pub fn configure_renderer(
        &mut self,
        width: f32,
        height: f32,
        renderer: Renderer,
    ) {
        self.width = width;
        self.height = height;
        self.renderer = renderer;

        match renderer {
            Renderer::P2D => self.camera_2d = Camera2D::centered(width, height),
            Renderer::P3D => self.camera_3d = Camera3D::framing(width, height),
        }
    }

    /// Switches a P3D canvas to an orthographic projection framing the
    /// whole window.
    pub fn ortho(&mut self) -> HostResult<()> {
        if self.renderer != Renderer::P3D {
            return Err(HostError::invalid_call(
                "ortho",
                "is only available with the P3D renderer",
            ));
        }

        let camera = &mut self.camera_3d;
        camera.position.z = self.height;
        camera.fovy = self.height;
        camera.projection = Projection::Orthographic;
        camera.near = 0.0;
        camera.far = self.width.max(self.height) + ORTHO_DEPTH_MARGIN;

        Ok(())
    }

    /// Surface size changed. Only the 2D camera follows it.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        if self.renderer == Renderer::P2D {
            self.camera_2d = Camera2D::centered(width, height);
        }
    }

    pub fn reset_frame(&mut self) {
        self.z_order = 0.0;
    }

    /// Returns the depth for the next filled overlay and advances the
    /// counter.
    pub fn next_z_order(&mut self) -> f32 {
        let z = self.z_order;
        self.z_order += Z_ORDER_STEP;
        z
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let canvas = CanvasState::default();
        assert_eq!(canvas.background, Color::new(128, 128, 128, 255));
        assert_eq!(canvas.fill, Color::new(255, 255, 255, 255));
        assert_eq!(canvas.stroke, Color::new(0, 0, 0, 255));
        assert!(!canvas.no_fill && !canvas.no_stroke);
        assert_eq!(canvas.renderer, Renderer::P2D);
        assert_eq!(canvas.color_mode, ColorMode::Rgb);
    }

    #[test]
    fn p2d_camera_centers_on_window() {
        let mut canvas = CanvasState::default();
        canvas.configure_renderer(640.0, 360.0, Renderer::P2D);
        assert_eq!(canvas.camera_2d.offset, Vec2::new(320.0, 180.0));
        assert_eq!(canvas.camera_2d.target, Vec2::new(320.0, 180.0));
        assert_eq!(canvas.camera_2d.zoom, 1.0);
    }

    #[test]
    fn p3d_camera_frames_window_height() {
        let mut canvas = CanvasState::default();
        canvas.configure_renderer(640.0, 360.0, Renderer::P2D);
        let before = canvas.camera_3d;
        canvas.configure_renderer(640.0, 360.0, Renderer::P3D);

        let camera = canvas.camera_3d;
        assert_ne!(camera, before);
        assert_eq!(camera.fovy, 360.0);
        assert_eq!(camera.projection, Projection::Perspective);
        assert_eq!(camera.target, Vec3::new(320.0, 180.0, 0.0));
        assert_eq!(camera.up, Vec3::Y);

        let half_extent = camera.distance() * (camera.fov_angle / 2.0).tan();
        assert!((half_extent - 180.0).abs() < 1e-3);
        assert!((camera.near - camera.distance() / 10.0).abs() < 1e-3);
        assert!((camera.far - camera.distance() * 10.0).abs() < 1e-2);
    }

    #[test]
    fn ortho_requires_p3d() {
        let mut canvas = CanvasState::default();
        canvas.configure_renderer(640.0, 360.0, Renderer::P2D);
        assert!(matches!(canvas.ortho(), Err(HostError::InvalidCall { .. })));

        canvas.configure_renderer(640.0, 360.0, Renderer::P3D);
        canvas.ortho().unwrap();
        assert_eq!(canvas.projection(), Projection::Orthographic);
        assert_eq!(canvas.camera_3d.far, 640.0 + ORTHO_DEPTH_MARGIN);
    }

    #[test]
    fn resize_only_moves_2d_camera() {
        let mut canvas = CanvasState::default();
        canvas.configure_renderer(640.0, 360.0, Renderer::P2D);
        canvas.on_resize(800.0, 600.0);
        assert_eq!(canvas.camera_2d.offset, Vec2::new(400.0, 300.0));

        let mut canvas = CanvasState::default();
        canvas.configure_renderer(640.0, 360.0, Renderer::P3D);
        let camera = canvas.camera_3d;
        canvas.on_resize(800.0, 600.0);
        assert_eq!(canvas.camera_3d, camera);
        assert_eq!(canvas.size(), (800.0, 600.0));
    }

    #[test]
    fn z_order_steps_and_resets() {
        let mut canvas = CanvasState::default();
        assert_eq!(canvas.next_z_order(), 0.0);
        assert_eq!(canvas.next_z_order(), Z_ORDER_STEP);
        canvas.reset_frame();
        assert_eq!(canvas.z_order, 0.0);
    }

    #[test]
    fn fill_and_stroke_reenable_after_no_fill() {
        let mut canvas = CanvasState::default();
        canvas.set_no_fill();
        canvas.set_no_stroke();
        canvas.apply_fill(Color::gray(10));
        assert!(!canvas.no_fill);
        assert!(canvas.no_stroke);
    }
}
