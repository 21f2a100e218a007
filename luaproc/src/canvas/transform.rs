use crate::backend::Backend;
use crate::core::error::{Origin, report_warning};

/// Lazy push/pop discipline over the backend's matrix stack.
///
/// Every transform primitive calls [`TransformStack::begin_if_needed`] so the
/// first one in a frame pushes a matrix, and [`TransformStack::end_frame`]
/// pops it once the script's `draw` returns. Manual `pushMatrix` calls are
/// tracked separately so `popMatrix` unwinds them before the automatic one.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TransformStack {
    need_to_pop: bool,
    manual_depth: usize,
}

impl TransformStack {
    pub fn need_to_pop(&self) -> bool {
        self.need_to_pop
    }

    pub fn manual_depth(&self) -> usize {
        self.manual_depth
    }

    pub fn begin_if_needed(&mut self, backend: &mut dyn Backend) {
        if !self.need_to_pop {
            backend.push_matrix();
            self.need_to_pop = true;
        }
    }

    pub fn explicit_push(&mut self, backend: &mut dyn Backend) {
        backend.push_matrix();
        self.manual_depth += 1;
    }

    /// Pops the innermost tracked matrix. With nothing to pop the call
    /// only warns and leaves the backend stack alone.
    pub fn explicit_pop(&mut self, backend: &mut dyn Backend) {
        if self.manual_depth > 0 {
            self.manual_depth -= 1;
        } else if self.need_to_pop {
            self.need_to_pop = false;
        } else {
            report_warning(
                Origin::Script,
                "'popMatrix' called without a matching 'pushMatrix'",
            );
            return;
        }
        backend.pop_matrix();
    }

    /// Returns the backend matrix stack to the depth it had before the
    /// frame started.
    pub fn end_frame(&mut self, backend: &mut dyn Backend) {
        if self.manual_depth > 0 {
            report_warning(
                Origin::Script,
                format!(
                    "'pushMatrix' called {} more time(s) than 'popMatrix' this frame",
                    self.manual_depth
                ),
            );
            for _ in 0..self.manual_depth {
                backend.pop_matrix();
            }
            self.manual_depth = 0;
        }

        if self.need_to_pop {
            backend.pop_matrix();
            self.need_to_pop = false;
        }
    }
}
