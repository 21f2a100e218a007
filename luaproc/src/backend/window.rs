use std::sync::Arc;
use std::time::Duration;

use glam::{Mat4, Vec3};
use log::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{CursorIcon, Fullscreen, Window, WindowAttributes, WindowId};

use super::frame_clock::FrameClock;
use super::gpu::GpuRenderer;
use super::mesh::{self, MeshBatch};
use super::{Backend, CursorShape, Rect};
use crate::canvas::{Camera2D, Camera3D, Color};
use crate::core::error::{HostError, HostResult};
use crate::runtime::window::{WindowConfig, WindowFlags};

/// Pump iterations to wait for the platform to hand out a window.
const CREATE_ATTEMPTS: usize = 200;

const FPS_LOG_INTERVAL: u64 = 300;

#[derive(Default)]
struct WindowApp {
    pending: Option<WindowAttributes>,
    window: Option<Arc<Window>>,
    window_id: Option<WindowId>,
    gpu: Option<GpuRenderer>,
    init_error: Option<String>,
    close_requested: bool,
    resized: Option<(u32, u32)>,
}

impl WindowApp {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), String> {
        let Some(attrs) = self.pending.take() else {
            return Ok(());
        };

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|err| err.to_string())?,
        );
        let gpu = GpuRenderer::new(window.clone())?;

        self.window_id = Some(window.id());
        self.window = Some(window);
        self.gpu = Some(gpu);
        Ok(())
    }
}

impl ApplicationHandler for WindowApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            error!("failed to create window: {}", err);
            self.init_error = Some(err);
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window_id != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(size.width, size.height);
                }
                self.resized = Some((size.width, size.height));
            }
            WindowEvent::ScaleFactorChanged {
                scale_factor,
                mut inner_size_writer,
            } => {
                // Keep the surface at the pixel size the script asked for.
                let Some(gpu) = self.gpu.as_ref() else {
                    return;
                };
                let (width, height) = gpu.size();
                debug!("scale factor changed to {}", scale_factor);
                if let Err(err) = inner_size_writer
                    .request_inner_size(PhysicalSize::new(width, height))
                {
                    debug!("could not keep window size: {}", err);
                }
            }
            _ => {}
        }
    }
}

/// Sizes are physical pixels everywhere: at creation, on `windowResize` and
/// in `screen_size`, so the 2D projection and `width()` agree with `size()`.
fn window_attributes(
    config: &WindowConfig,
    width: u32,
    height: u32,
) -> WindowAttributes {
    let fullscreen = config
        .flags
        .contains(WindowFlags::FULLSCREEN)
        .then_some(Fullscreen::Borderless(None));

    WindowAttributes::default()
        .with_title(config.title.clone())
        .with_inner_size(PhysicalSize::new(width, height))
        .with_resizable(config.flags.contains(WindowFlags::RESIZABLE))
        .with_fullscreen(fullscreen)
}

/// Native window backed by winit and wgpu. The host keeps the loop: each
/// [`Backend::pump`] drains pending events without blocking.
pub struct WindowBackend {
    event_loop: EventLoop<()>,
    app: WindowApp,
    clock: FrameClock,
    clear: Color,
    view_proj: Mat4,
    model: Mat4,
    model_stack: Vec<Mat4>,
    batch: MeshBatch,
}

impl WindowBackend {
    pub fn new() -> HostResult<Self> {
        let event_loop = EventLoop::new().map_err(HostError::backend)?;
        Ok(Self {
            event_loop,
            app: WindowApp::default(),
            clock: FrameClock::new(60),
            clear: Color::default(),
            view_proj: Mat4::IDENTITY,
            model: Mat4::IDENTITY,
            model_stack: Vec::new(),
            batch: MeshBatch::default(),
        })
    }

    fn window(&self) -> Option<&Window> {
        self.app.window.as_deref()
    }

    fn pump_once(&mut self) -> PumpStatus {
        self.event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app)
    }

    fn aspect(&self) -> f32 {
        let (width, height) = self.screen_size();
        width.max(1) as f32 / height.max(1) as f32
    }
}

fn cursor_icon(shape: CursorShape) -> CursorIcon {
    match shape {
        CursorShape::Default => CursorIcon::Default,
        CursorShape::Arrow => CursorIcon::Default,
        CursorShape::IBeam => CursorIcon::Text,
        CursorShape::Crosshair => CursorIcon::Crosshair,
        CursorShape::PointingHand => CursorIcon::Pointer,
        CursorShape::ResizeEw => CursorIcon::EwResize,
        CursorShape::ResizeNs => CursorIcon::NsResize,
        CursorShape::ResizeNwse => CursorIcon::NwseResize,
        CursorShape::ResizeNesw => CursorIcon::NeswResize,
        CursorShape::ResizeAll => CursorIcon::AllScroll,
        CursorShape::NotAllowed => CursorIcon::NotAllowed,
    }
}

impl Backend for WindowBackend {
    fn create_surface(&mut self, config: &WindowConfig) -> HostResult<()> {
        let (width, height) = config.size()?;
        if self.app.window.is_some() || self.app.pending.is_some() {
            return Err(HostError::backend("surface already created"));
        }

        self.app.pending = Some(window_attributes(config, width, height));

        for _ in 0..CREATE_ATTEMPTS {
            if let PumpStatus::Exit(code) = self.pump_once() {
                return Err(HostError::backend(format!(
                    "event loop exited with {} while creating window",
                    code
                )));
            }
            if let Some(err) = self.app.init_error.take() {
                return Err(HostError::backend(err));
            }
            if self.app.gpu.is_some() {
                self.clock = FrameClock::new(config.frame_rate);
                // Creation may report an initial size; that is not a resize.
                self.app.resized = None;
                info!("window ready at {} fps", config.frame_rate);
                return Ok(());
            }
            std::thread::sleep(Duration::from_millis(5));
        }

        Err(HostError::backend("timed out waiting for the window"))
    }

    fn has_surface(&self) -> bool {
        self.app.gpu.is_some()
    }

    fn pump(&mut self) -> bool {
        if let PumpStatus::Exit(code) = self.pump_once() {
            debug!("event loop exited with {}", code);
            return false;
        }
        !self.app.close_requested
    }

    fn take_resize(&mut self) -> Option<(u32, u32)> {
        self.app.resized.take()
    }

    fn begin_frame(&mut self, clear: Color) -> HostResult<()> {
        if self.app.gpu.is_none() {
            return Err(HostError::backend("frame started without a surface"));
        }
        self.clear = clear;
        self.view_proj = Mat4::IDENTITY;
        self.model = Mat4::IDENTITY;
        self.model_stack.clear();
        self.batch.clear();
        Ok(())
    }

    fn end_frame(&mut self) -> HostResult<()> {
        let gpu = self
            .app
            .gpu
            .as_mut()
            .ok_or_else(|| HostError::backend("frame ended without a surface"))?;
        gpu.render(self.clear, self.view_proj, &self.batch)
            .map_err(HostError::backend)?;
        self.clock.wait_and_finish();

        if self.clock.frame_count() % FPS_LOG_INTERVAL == 0 {
            debug!("running at {:.1} fps", self.clock.average_fps());
        }
        Ok(())
    }

    fn begin_2d(&mut self, camera: &Camera2D) {
        let (width, height) = self.screen_size();
        self.view_proj =
            mesh::view_projection_2d(camera, width as f32, height as f32);
    }

    fn end_2d(&mut self) {}

    fn begin_3d(&mut self, camera: &Camera3D) {
        self.view_proj = mesh::view_projection_3d(camera, self.aspect());
    }

    fn end_3d(&mut self) {}

    fn push_matrix(&mut self) {
        self.model_stack.push(self.model);
    }

    fn pop_matrix(&mut self) {
        if let Some(model) = self.model_stack.pop() {
            self.model = model;
        }
    }

    fn rotate(&mut self, angle: f32, axis: Vec3) {
        self.model *= Mat4::from_axis_angle(axis.normalize_or_zero(), angle);
    }

    fn translate(&mut self, offset: Vec3) {
        self.model *= Mat4::from_translation(offset);
    }

    fn scale(&mut self, factor: Vec3) {
        self.model *= Mat4::from_scale(factor);
    }

    fn draw_line(&mut self, start: Vec3, end: Vec3, color: Color) {
        self.batch.line(&self.model, start, end, color);
    }

    fn draw_rect(&mut self, rect: Rect, z: f32, color: Color) {
        self.batch.rect(&self.model, rect, z, color);
    }

    fn draw_rect_outline(
        &mut self,
        rect: Rect,
        z: f32,
        thickness: f32,
        color: Color,
    ) {
        self.batch
            .rect_outline(&self.model, rect, z, thickness, color);
    }

    fn draw_box(&mut self, size: Vec3, color: Color) {
        self.batch.cuboid(&self.model, size, color);
    }

    fn draw_box_wires(&mut self, size: Vec3, color: Color) {
        self.batch.cuboid_wires(&self.model, size, color);
    }

    fn draw_sphere(&mut self, radius: f32, color: Color) {
        self.batch.sphere(&self.model, radius, color);
    }

    fn show_cursor(&mut self) {
        if let Some(window) = self.window() {
            window.set_cursor_visible(true);
        }
    }

    fn hide_cursor(&mut self) {
        if let Some(window) = self.window() {
            window.set_cursor_visible(false);
        }
    }

    fn set_cursor(&mut self, shape: CursorShape) {
        if let Some(window) = self.window() {
            window.set_cursor(cursor_icon(shape));
        }
    }

    fn set_window_position(&mut self, x: i32, y: i32) {
        if let Some(window) = self.window() {
            window.set_outer_position(PhysicalPosition::new(x, y));
        }
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        let Some(window) = self.app.window.clone() else {
            return;
        };
        if let Some(size) =
            window.request_inner_size(PhysicalSize::new(width, height))
        {
            if let Some(gpu) = self.app.gpu.as_mut() {
                gpu.resize(size.width, size.height);
            }
            self.app.resized = Some((size.width, size.height));
        }
    }

    fn set_title(&mut self, title: &str) {
        if let Some(window) = self.window() {
            window.set_title(title);
        }
    }

    fn set_target_fps(&mut self, fps: u32) {
        self.clock.set_fps(fps);
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        if let Some(window) = self.window() {
            window.set_fullscreen(
                fullscreen.then_some(Fullscreen::Borderless(None)),
            );
        }
    }

    fn set_resizable(&mut self, resizable: bool) {
        if let Some(window) = self.window() {
            window.set_resizable(resizable);
        }
    }

    fn screen_size(&self) -> (u32, u32) {
        self.app.gpu.as_ref().map(GpuRenderer::size).unwrap_or_default()
    }

    fn display_size(&self) -> (u32, u32) {
        self.window()
            .and_then(Window::current_monitor)
            .map(|monitor| {
                let size = monitor.size();
                (size.width, size.height)
            })
            .unwrap_or_default()
    }

    fn is_focused(&self) -> bool {
        self.window().is_some_and(Window::has_focus)
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::Size;

    use super::*;

    #[test]
    fn window_is_created_in_physical_pixels() {
        let mut config = WindowConfig::default();
        config.width = 640;
        config.height = 360;
        config.set_flag(WindowFlags::RESIZABLE, true);

        let attrs = window_attributes(&config, 640, 360);
        assert_eq!(
            attrs.inner_size,
            Some(Size::Physical(PhysicalSize::new(640, 360)))
        );
        assert!(attrs.resizable);
        assert_eq!(attrs.fullscreen, None);
        assert_eq!(attrs.title, "LuaProc");
    }

    #[test]
    fn fullscreen_flag_requests_borderless() {
        let mut config = WindowConfig::default();
        config.set_flag(WindowFlags::FULLSCREEN, true);
        let attrs = window_attributes(&config, 10, 10);
        assert_eq!(attrs.fullscreen, Some(Fullscreen::Borderless(None)));
    }

    #[test]
    fn every_cursor_shape_has_an_icon() {
        assert_eq!(cursor_icon(CursorShape::IBeam), CursorIcon::Text);
        assert_eq!(cursor_icon(CursorShape::Crosshair), CursorIcon::Crosshair);
    }
}
