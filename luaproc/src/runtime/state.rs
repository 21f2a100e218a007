use std::io::{self, Write};

use log::debug;

use super::deferred::DeferredCallQueue;
use super::lifecycle::{LifecycleController, LifecycleState};
use super::window::WindowConfig;
use crate::backend::Backend;
use crate::canvas::CanvasState;
use crate::core::error::{HostError, HostResult};

/// Everything a command handler may touch. Owned by the host and lent to
/// one handler at a time.
pub struct HostState {
    pub window: WindowConfig,
    pub canvas: CanvasState,
    pub lifecycle: LifecycleController,
    pub deferred: DeferredCallQueue<HostState>,
    pub backend: Box<dyn Backend>,
    /// Destination of `print`/`println`.
    pub output: Box<dyn Write>,
    /// First fatal error raised by a handler. Kept here so a script cannot
    /// swallow it with `pcall`.
    pub fatal: Option<HostError>,
}

impl HostState {
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self {
            window: WindowConfig::default(),
            canvas: CanvasState::default(),
            lifecycle: LifecycleController::new(),
            deferred: DeferredCallQueue::new(),
            backend,
            output: Box::new(io::stdout()),
            fatal: None,
        }
    }

    pub fn with_output(mut self, output: Box<dyn Write>) -> Self {
        self.output = output;
        self
    }

    pub fn phase(&self) -> LifecycleState {
        self.lifecycle.current_state()
    }

    /// Whether calls that touch the live window should go straight to the
    /// backend.
    pub fn surface_ready(&self) -> bool {
        self.phase() > LifecycleState::Setup && self.backend.has_surface()
    }

    /// Replays everything recorded during Setup. The queue left behind is
    /// sealed.
    pub fn flush_deferred(&mut self) -> HostResult<usize> {
        let queue =
            std::mem::replace(&mut self.deferred, DeferredCallQueue::sealed());
        let count = queue.flush(self)?;
        debug!("flushed {} deferred call(s)", count);
        Ok(count)
    }

    /// Size scripts observe through `width()`/`height()`.
    pub fn surface_size(&self) -> (i64, i64) {
        if self.backend.has_surface() {
            let (width, height) = self.backend.screen_size();
            (width as i64, height as i64)
        } else {
            (self.window.width as i64, self.window.height as i64)
        }
    }

    pub fn latch(&mut self, error: &HostError) {
        if self.fatal.is_none() {
            self.fatal = Some(error.clone());
        }
    }
}
