use super::{ArgKind, Args, Arity, Command, Constant, Ret};
use crate::backend::CursorShape;
use crate::canvas::Renderer;
use crate::core::error::{HostError, HostResult, Origin, report_warning};
use crate::runtime::state::HostState;
use crate::runtime::window::WindowFlags;

pub const COMMANDS: &[Command] = &[
    Command::new("size", Arity::Range(2, 3), ArgKind::Number, size).setup_only(),
    Command::new("frameCount", Arity::Exact(0), ArgKind::Number, frame_count),
    Command::new("frameRate", Arity::Range(0, 1), ArgKind::Number, frame_rate),
    Command::new("fullScreen", Arity::Exact(0), ArgKind::Number, full_screen),
    Command::new(
        "windowResizable",
        Arity::Exact(1),
        ArgKind::Boolean,
        window_resizable,
    ),
    Command::new("windowTitle", Arity::Exact(1), ArgKind::String, window_title),
    Command::new("windowMove", Arity::Exact(2), ArgKind::Number, window_move)
        .deferred(),
    Command::new(
        "windowResize",
        Arity::Exact(2),
        ArgKind::Number,
        window_resize,
    )
    .deferred(),
    Command::new("cursor", Arity::Range(0, 1), ArgKind::Number, cursor)
        .deferred(),
    Command::new("noCursor", Arity::Exact(0), ArgKind::Number, no_cursor)
        .deferred(),
    Command::new("width", Arity::Exact(0), ArgKind::Number, width),
    Command::new("height", Arity::Exact(0), ArgKind::Number, height),
    Command::new(
        "displayWidth",
        Arity::Exact(0),
        ArgKind::Number,
        display_width,
    ),
    Command::new(
        "displayHeight",
        Arity::Exact(0),
        ArgKind::Number,
        display_height,
    ),
    Command::new("focused", Arity::Exact(0), ArgKind::Number, focused),
];

pub fn constants() -> Vec<(&'static str, Constant)> {
    let mut constants = vec![
        ("P2D", Constant::Int(Renderer::P2D.id())),
        ("P3D", Constant::Int(Renderer::P3D.id())),
    ];
    constants.extend(
        CursorShape::ALL
            .iter()
            .map(|(name, shape)| (*name, Constant::Int(shape.id()))),
    );
    constants
}

fn size(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    let renderer = if args.len() == 3 {
        Renderer::from_id(args.int(2)).ok_or_else(|| {
            HostError::out_of_range("size", "expects P2D or P3D as renderer")
        })?
    } else {
        Renderer::P2D
    };

    state.window.width = dimension("size", args.int(0))?;
    state.window.height = dimension("size", args.int(1))?;
    state.canvas.configure_renderer(
        state.window.width as f32,
        state.window.height as f32,
        renderer,
    );
    Ok(Ret::None)
}

/// Window coordinates and sizes must fit an `i32`. Wrapping would turn a
/// huge request into an unrelated valid one.
fn dimension(name: &str, value: i64) -> HostResult<i32> {
    i32::try_from(value).map_err(|_| {
        HostError::out_of_range(name, format!("value {} is out of range", value))
    })
}

fn frame_count(state: &mut HostState, _: &Args) -> HostResult<Ret> {
    Ok(Ret::Int(state.window.frame_count as i64))
}

fn frame_rate(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    if !args.is_empty() {
        let fps = args.int(0);
        if fps <= 0 {
            return Err(HostError::out_of_range(
                "frameRate",
                "expects a value greater than 0",
            ));
        }
        state.window.frame_rate = u32::try_from(fps).map_err(|_| {
            HostError::out_of_range("frameRate", "value is too large")
        })?;
        if state.surface_ready() {
            state.backend.set_target_fps(state.window.frame_rate);
        }
    }
    Ok(Ret::Int(state.window.frame_rate as i64))
}

fn full_screen(state: &mut HostState, _: &Args) -> HostResult<Ret> {
    state.window.set_flag(WindowFlags::FULLSCREEN, true);
    if state.surface_ready() {
        state.backend.set_fullscreen(true);
    }
    Ok(Ret::None)
}

fn window_resizable(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    let resizable = args.boolean(0);
    state.window.set_flag(WindowFlags::RESIZABLE, resizable);
    if state.surface_ready() {
        state.backend.set_resizable(resizable);
    }
    Ok(Ret::None)
}

fn window_title(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    state.window.title = args.string(0).to_string();
    if state.surface_ready() {
        state.backend.set_title(&state.window.title);
    }
    Ok(Ret::None)
}

fn window_move(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    let x = dimension("windowMove", args.int(0))?;
    let y = dimension("windowMove", args.int(1))?;
    state.backend.set_window_position(x, y);
    Ok(Ret::None)
}

fn window_resize(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    let width = dimension("windowResize", args.int(0))?;
    let height = dimension("windowResize", args.int(1))?;
    if width <= 0 || height <= 0 {
        return Err(HostError::out_of_range(
            "windowResize",
            "expects a width and height greater than 0",
        ));
    }
    state.window.width = width;
    state.window.height = height;
    state.backend.set_window_size(width as u32, height as u32);
    Ok(Ret::None)
}

fn cursor(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    state.backend.show_cursor();
    if args.is_empty() {
        return Ok(Ret::None);
    }

    let id = args.int(0);
    let shape = CursorShape::from_id(id).unwrap_or_else(|| {
        report_warning(
            Origin::Script,
            format!(
                "'{}' was passed as an invalid argument to 'cursor'. Using default cursor",
                id
            ),
        );
        CursorShape::Default
    });
    state.backend.set_cursor(shape);
    Ok(Ret::None)
}

fn no_cursor(state: &mut HostState, _: &Args) -> HostResult<Ret> {
    state.backend.hide_cursor();
    Ok(Ret::None)
}

fn width(state: &mut HostState, _: &Args) -> HostResult<Ret> {
    Ok(Ret::Int(state.surface_size().0))
}

fn height(state: &mut HostState, _: &Args) -> HostResult<Ret> {
    Ok(Ret::Int(state.surface_size().1))
}

fn display_width(state: &mut HostState, _: &Args) -> HostResult<Ret> {
    Ok(Ret::Int(state.backend.display_size().0 as i64))
}

fn display_height(state: &mut HostState, _: &Args) -> HostResult<Ret> {
    Ok(Ret::Int(state.backend.display_size().1 as i64))
}

fn focused(state: &mut HostState, _: &Args) -> HostResult<Ret> {
    Ok(Ret::Bool(state.backend.is_focused()))
}
