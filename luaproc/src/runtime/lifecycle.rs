use log::info;

/// Host phase. Ordering follows declaration order, which is also the only
/// legal direction of travel.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub enum LifecycleState {
    #[default]
    Setup,
    PostSetup,
    Draw,
}

#[derive(Debug, Default)]
pub struct LifecycleController {
    state: LifecycleState,
}

impl LifecycleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_state(&self) -> LifecycleState {
        self.state
    }

    /// Moves forward to `to`.
    ///
    /// # Panics
    ///
    /// Panics on any transition that is not strictly forward. The host
    /// drives this itself so a backward step is a bug, not a script error.
    pub fn transition(&mut self, to: LifecycleState) {
        assert!(
            to > self.state,
            "illegal lifecycle transition {:?} -> {:?}",
            self.state,
            to
        );
        info!("lifecycle {:?} -> {:?}", self.state, to);
        self.state = to;
    }
}
