use std::cell::{Ref, RefCell};
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

use log::{debug, info, trace};
use mlua::{Function, Lua, Value};

use super::lifecycle::LifecycleState;
use super::state::HostState;
use crate::api;
use crate::api::lua::script_error;
use crate::backend::Backend;
use crate::canvas::Renderer;
use crate::core::error::{HostError, HostResult};

/// Owns the Lua state and the host state, and drives a script through
/// Setup, PostSetup and the Draw loop.
pub struct ScriptHost {
    lua: Lua,
    state: Rc<RefCell<HostState>>,
    draw: Option<Function>,
    frame_limit: Option<u64>,
}

impl ScriptHost {
    pub fn new(backend: Box<dyn Backend>) -> HostResult<Self> {
        Self::with_state(HostState::new(backend))
    }

    pub fn with_state(state: HostState) -> HostResult<Self> {
        let lua = Lua::new();
        let state = Rc::new(RefCell::new(state));
        api::lua::register(&lua, &state)?;

        Ok(Self {
            lua,
            state,
            draw: None,
            frame_limit: None,
        })
    }

    pub fn with_output(self, output: Box<dyn Write>) -> Self {
        self.state.borrow_mut().output = output;
        self
    }

    /// Stops the draw loop after `frames` passes.
    pub fn with_frame_limit(mut self, frames: Option<u64>) -> Self {
        self.frame_limit = frames;
        self
    }

    pub fn state(&self) -> Ref<'_, HostState> {
        self.state.borrow()
    }

    pub fn phase(&self) -> LifecycleState {
        self.state.borrow().phase()
    }

    pub fn load_file(&self, path: &Path) -> HostResult<()> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            HostError::Usage(format!(
                "could not read lua file '{}': {}",
                path.display(),
                e
            ))
        })?;
        self.load_source(&source, &path.display().to_string())
    }

    /// Executes the chunk's top level, which defines `setup` and `draw`.
    pub fn load_source(&self, source: &str, name: &str) -> HostResult<()> {
        debug!("loading '{}'", name);
        let result = self.lua.load(source).set_name(name).exec();
        self.settle(result)
    }

    /// Runs Setup, creates the surface, flushes deferred calls and enters
    /// Draw.
    pub fn setup(&mut self) -> HostResult<()> {
        let setup = self.callback("setup")?;
        let result = setup.call::<()>(());
        self.settle(result)?;

        {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;

            state.window.validate()?;
            state.backend.create_surface(&state.window)?;
            info!(
                "created {}x{} {:?} surface '{}'",
                state.window.width,
                state.window.height,
                state.canvas.renderer,
                state.window.title
            );

            state.lifecycle.transition(LifecycleState::PostSetup);
            state.flush_deferred()?;
        }

        self.draw = Some(self.callback("draw")?);
        self.state
            .borrow_mut()
            .lifecycle
            .transition(LifecycleState::Draw);

        Ok(())
    }

    /// One frame: bookkeeping, clear, the script's `draw`, then transform
    /// and drawing-block teardown.
    pub fn draw_pass(&mut self) -> HostResult<()> {
        let Some(draw) = self.draw.clone() else {
            return Err(HostError::invalid_call(
                "draw",
                "pass requested before setup completed",
            ));
        };

        {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;

            if let Some((width, height)) = state.backend.take_resize() {
                debug!("surface resized to {}x{}", width, height);
                state.window.width = width as i32;
                state.window.height = height as i32;
                state.canvas.on_resize(width as f32, height as f32);
            }

            state.window.frame_count += 1;
            state.canvas.reset_frame();
            trace!("frame {}", state.window.frame_count);

            state.backend.begin_frame(state.canvas.background)?;
            match state.canvas.renderer {
                Renderer::P2D => state.backend.begin_2d(&state.canvas.camera_2d),
                Renderer::P3D => state.backend.begin_3d(&state.canvas.camera_3d),
            }
        }

        let result = draw.call::<()>(());
        self.settle(result)?;

        let mut state = self.state.borrow_mut();
        let HostState {
            canvas, backend, ..
        } = &mut *state;

        canvas.transform.end_frame(backend.as_mut());
        match canvas.renderer {
            Renderer::P2D => backend.end_2d(),
            Renderer::P3D => backend.end_3d(),
        }
        backend.end_frame()
    }

    /// Full lifecycle. Returns the number of completed draw passes.
    pub fn run(&mut self) -> HostResult<u64> {
        self.setup()?;

        let mut frames = 0;
        loop {
            if self.frame_limit.is_some_and(|limit| frames >= limit) {
                break;
            }
            if !self.state.borrow_mut().backend.pump() {
                break;
            }
            self.draw_pass()?;
            frames += 1;
        }

        info!("shutting down after {} frame(s)", frames);
        Ok(frames)
    }

    fn callback(&self, name: &str) -> HostResult<Function> {
        match self.lua.globals().get::<Value>(name) {
            Ok(Value::Function(function)) => Ok(function),
            _ => Err(HostError::missing_function(name)),
        }
    }

    /// A fatal error latched by a handler wins over whatever the script
    /// did with it.
    fn settle<T>(&self, result: mlua::Result<T>) -> HostResult<T> {
        if let Some(error) = self.state.borrow_mut().fatal.take() {
            return Err(error);
        }
        result.map_err(script_error)
    }
}
