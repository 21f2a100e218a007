use glam::Vec3;

use super::{ArgKind, Args, Arity, Command, Ret};
use crate::core::error::HostResult;
use crate::runtime::state::HostState;

pub const COMMANDS: &[Command] = &[
    Command::new("rotateX", Arity::Exact(1), ArgKind::Number, rotate_x)
        .draw_only(),
    Command::new("rotateY", Arity::Exact(1), ArgKind::Number, rotate_y)
        .draw_only(),
    Command::new("rotateZ", Arity::Exact(1), ArgKind::Number, rotate_z)
        .draw_only(),
    Command::new("rotate", Arity::Exact(1), ArgKind::Number, rotate_z)
        .draw_only(),
    Command::new("translate", Arity::Range(2, 3), ArgKind::Number, translate)
        .draw_only(),
    Command::new("scale", Arity::Range(1, 3), ArgKind::Number, scale)
        .draw_only(),
    Command::new("pushMatrix", Arity::Exact(0), ArgKind::Number, push_matrix)
        .draw_only(),
    Command::new("popMatrix", Arity::Exact(0), ArgKind::Number, pop_matrix)
        .draw_only(),
];

fn rotate_about(state: &mut HostState, args: &Args, axis: Vec3) -> Ret {
    let HostState {
        canvas, backend, ..
    } = state;
    canvas.transform.begin_if_needed(backend.as_mut());
    backend.rotate(args.float(0), axis);
    Ret::None
}

fn rotate_x(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    Ok(rotate_about(state, args, Vec3::X))
}

fn rotate_y(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    Ok(rotate_about(state, args, Vec3::Y))
}

fn rotate_z(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    Ok(rotate_about(state, args, Vec3::Z))
}

fn translate(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    let z = if args.len() == 3 { args.float(2) } else { 0.0 };
    let offset = Vec3::new(args.float(0), args.float(1), z);

    let HostState {
        canvas, backend, ..
    } = state;
    canvas.transform.begin_if_needed(backend.as_mut());
    backend.translate(offset);
    Ok(Ret::None)
}

/// `scale(s)` is uniform; `scale(x, y)` leaves depth untouched.
fn scale(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    let x = args.float(0);
    let factor = match args.len() {
        1 => Vec3::splat(x),
        2 => Vec3::new(x, args.float(1), 1.0),
        _ => Vec3::new(x, args.float(1), args.float(2)),
    };

    let HostState {
        canvas, backend, ..
    } = state;
    canvas.transform.begin_if_needed(backend.as_mut());
    backend.scale(factor);
    Ok(Ret::None)
}

fn push_matrix(state: &mut HostState, _: &Args) -> HostResult<Ret> {
    state.canvas.transform.explicit_push(state.backend.as_mut());
    Ok(Ret::None)
}

fn pop_matrix(state: &mut HostState, _: &Args) -> HostResult<Ret> {
    state.canvas.transform.explicit_pop(state.backend.as_mut());
    Ok(Ret::None)
}
