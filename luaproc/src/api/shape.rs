use glam::Vec3;

use super::{ArgKind, Args, Arity, Command, Ret};
use crate::backend::Rect;
use crate::canvas::Renderer;
use crate::core::error::HostResult;
use crate::runtime::state::HostState;

const STROKE_WEIGHT: f32 = 1.0;

pub const COMMANDS: &[Command] = &[
    Command::new("line", Arity::OneOf(&[4, 6]), ArgKind::Number, line)
        .draw_only(),
    Command::new("rect", Arity::Exact(4), ArgKind::Number, rect).draw_only(),
    Command::new("box", Arity::OneOf(&[1, 3]), ArgKind::Number, cube)
        .draw_only(),
    Command::new("sphere", Arity::Exact(1), ArgKind::Number, sphere)
        .draw_only(),
];

fn line(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    let v = |i| args.float(i);
    let (start, end) = if args.len() == 4 {
        (Vec3::new(v(0), v(1), 0.0), Vec3::new(v(2), v(3), 0.0))
    } else {
        (Vec3::new(v(0), v(1), v(2)), Vec3::new(v(3), v(4), v(5)))
    };

    // Lines are outlines, so they follow the stroke flag.
    if !state.canvas.no_stroke {
        state.backend.draw_line(start, end, state.canvas.stroke);
    }
    Ok(Ret::None)
}

/// In P3D each filled rect sits on its own z-order plane so later rects
/// overlay earlier ones.
fn rect(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    let rect =
        Rect::new(args.float(0), args.float(1), args.float(2), args.float(3));
    let HostState {
        canvas, backend, ..
    } = state;

    let z = match canvas.renderer {
        Renderer::P2D => 0.0,
        Renderer::P3D if !canvas.no_fill => canvas.next_z_order(),
        Renderer::P3D => canvas.z_order,
    };

    if !canvas.no_fill {
        backend.draw_rect(rect, z, canvas.fill);
    }
    if !canvas.no_stroke {
        backend.draw_rect_outline(rect, z, STROKE_WEIGHT, canvas.stroke);
    }
    Ok(Ret::None)
}

fn cube(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    let size = if args.len() == 1 {
        Vec3::splat(args.float(0))
    } else {
        Vec3::new(args.float(0), args.float(1), args.float(2))
    };

    if !state.canvas.no_fill {
        state.backend.draw_box(size, state.canvas.fill);
    }
    if !state.canvas.no_stroke {
        state.backend.draw_box_wires(size, state.canvas.stroke);
    }
    Ok(Ret::None)
}

fn sphere(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    if !state.canvas.no_fill {
        state.backend.draw_sphere(args.float(0), state.canvas.fill);
    }
    Ok(Ret::None)
}
