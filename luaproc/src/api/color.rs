use super::{Arg, ArgKind, Args, Arity, Command, Constant, Ret};
use crate::canvas::color::{ColorSource, lerp_color, parse_color};
use crate::canvas::{Color, ColorMode};
use crate::core::error::{HostError, HostResult};
use crate::runtime::state::HostState;

const COLOR_ARITY: Arity = Arity::Range(1, 4);

pub const COMMANDS: &[Command] = &[
    Command::new("background", COLOR_ARITY, ArgKind::Number, background),
    Command::new("fill", COLOR_ARITY, ArgKind::Number, fill),
    Command::new("stroke", COLOR_ARITY, ArgKind::Number, stroke),
    Command::new("noFill", Arity::Exact(0), ArgKind::Number, no_fill),
    Command::new("noStroke", Arity::Exact(0), ArgKind::Number, no_stroke),
    Command::new("colorMode", Arity::Exact(1), ArgKind::Number, color_mode),
    Command::new("color", COLOR_ARITY, ArgKind::Number, color),
    Command::new(
        "lerpColor",
        Arity::Exact(3),
        ArgKind::ColorOrNumber,
        lerp,
    ),
];

pub fn constants() -> Vec<(&'static str, Constant)> {
    vec![
        ("RGB", Constant::Int(ColorMode::Rgb.id())),
        ("HSB", Constant::Int(ColorMode::Hsb.id())),
    ]
}

fn parse(state: &HostState, name: &str, args: &Args) -> HostResult<Color> {
    parse_color(name, state.canvas.color_mode, &args.numbers())
}

fn background(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    let color = parse(state, "background", args)?;
    state.canvas.apply_background(color);
    Ok(Ret::None)
}

fn fill(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    let color = parse(state, "fill", args)?;
    state.canvas.apply_fill(color);
    Ok(Ret::None)
}

fn stroke(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    let color = parse(state, "stroke", args)?;
    state.canvas.apply_stroke(color);
    Ok(Ret::None)
}

fn no_fill(state: &mut HostState, _: &Args) -> HostResult<Ret> {
    state.canvas.set_no_fill();
    Ok(Ret::None)
}

fn no_stroke(state: &mut HostState, _: &Args) -> HostResult<Ret> {
    state.canvas.set_no_stroke();
    Ok(Ret::None)
}

fn color_mode(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    let mode = ColorMode::from_id(args.int(0)).ok_or_else(|| {
        HostError::out_of_range("colorMode", "expects RGB or HSB")
    })?;
    state.canvas.set_color_mode(mode);
    Ok(Ret::None)
}

fn color(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    parse(state, "color", args).map(Ret::Color)
}

fn lerp(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    let source = |arg: Option<&Arg>| match arg {
        Some(Arg::Color(color)) => ColorSource::Color(*color),
        Some(Arg::Number(value)) => ColorSource::Hex(*value),
        _ => ColorSource::Hex(0.0),
    };

    let Some(Arg::Number(t)) = args.get(2) else {
        return Err(HostError::arg_type(
            "lerpColor",
            "color, color, number",
        ));
    };

    lerp_color(
        "lerpColor",
        state.canvas.color_mode,
        source(args.get(0)),
        source(args.get(1)),
        *t,
    )
    .map(Ret::Color)
}
