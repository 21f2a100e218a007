use super::{ArgKind, Args, Arity, Command, Ret};
use crate::core::error::HostResult;
use crate::runtime::state::HostState;

pub const COMMANDS: &[Command] =
    &[Command::new("ortho", Arity::Exact(0), ArgKind::Number, ortho)];

fn ortho(state: &mut HostState, _: &Args) -> HostResult<Ret> {
    state.canvas.ortho()?;
    Ok(Ret::None)
}
