use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use super::{ArgKind, Args, Arity, Command, Constant, Ret};
use crate::core::error::{HostError, HostResult};
use crate::runtime::state::HostState;

const ONE: Arity = Arity::Exact(1);
const NUM: ArgKind = ArgKind::Number;

pub const COMMANDS: &[Command] = &[
    Command::new("abs", ONE, NUM, abs),
    Command::new("cos", ONE, NUM, cos),
    Command::new("sin", ONE, NUM, sin),
    Command::new("tan", ONE, NUM, tan),
    Command::new("sqrt", ONE, NUM, sqrt),
    Command::new("pow", Arity::Exact(2), NUM, pow),
    Command::new("degrees", ONE, NUM, degrees),
    Command::new("radians", ONE, NUM, radians),
    Command::new("min", Arity::AtLeast(1), NUM, min),
    Command::new("max", Arity::AtLeast(1), NUM, max),
    Command::new("constrain", Arity::Exact(3), NUM, constrain),
    Command::new("lerp", Arity::Exact(3), NUM, lerp),
    Command::new("map", Arity::Exact(5), NUM, map),
];

pub fn constants() -> Vec<(&'static str, Constant)> {
    vec![
        ("HALF_PI", Constant::Number(FRAC_PI_2)),
        ("PI", Constant::Number(PI)),
        ("QUARTER_PI", Constant::Number(FRAC_PI_4)),
        ("TWO_PI", Constant::Number(TAU)),
        ("TAU", Constant::Number(TAU)),
    ]
}

fn unary(args: &Args, f: fn(f64) -> f64) -> HostResult<Ret> {
    Ok(Ret::Number(f(args.number(0))))
}

fn abs(_: &mut HostState, args: &Args) -> HostResult<Ret> {
    unary(args, f64::abs)
}

fn cos(_: &mut HostState, args: &Args) -> HostResult<Ret> {
    unary(args, f64::cos)
}

fn sin(_: &mut HostState, args: &Args) -> HostResult<Ret> {
    unary(args, f64::sin)
}

fn tan(_: &mut HostState, args: &Args) -> HostResult<Ret> {
    unary(args, f64::tan)
}

fn sqrt(_: &mut HostState, args: &Args) -> HostResult<Ret> {
    if args.number(0) < 0.0 {
        return Err(HostError::out_of_range(
            "sqrt",
            "argument should be non-negative",
        ));
    }
    unary(args, f64::sqrt)
}

fn pow(_: &mut HostState, args: &Args) -> HostResult<Ret> {
    Ok(Ret::Number(args.number(0).powf(args.number(1))))
}

fn degrees(_: &mut HostState, args: &Args) -> HostResult<Ret> {
    unary(args, f64::to_degrees)
}

fn radians(_: &mut HostState, args: &Args) -> HostResult<Ret> {
    unary(args, f64::to_radians)
}

fn min(_: &mut HostState, args: &Args) -> HostResult<Ret> {
    let value = args.numbers().into_iter().fold(f64::INFINITY, f64::min);
    Ok(Ret::Number(value))
}

fn max(_: &mut HostState, args: &Args) -> HostResult<Ret> {
    let value = args.numbers().into_iter().fold(f64::NEG_INFINITY, f64::max);
    Ok(Ret::Number(value))
}

fn constrain(_: &mut HostState, args: &Args) -> HostResult<Ret> {
    let (value, low, high) = (args.number(0), args.number(1), args.number(2));
    Ok(Ret::Number(value.max(low).min(high)))
}

fn lerp(_: &mut HostState, args: &Args) -> HostResult<Ret> {
    let (start, stop, t) = (args.number(0), args.number(1), args.number(2));
    Ok(Ret::Number(start + (stop - start) * t))
}

/// Re-maps a value from one range into another, unclamped.
fn map(_: &mut HostState, args: &Args) -> HostResult<Ret> {
    let value = args.number(0);
    let (start1, stop1) = (args.number(1), args.number(2));
    let (start2, stop2) = (args.number(3), args.number(4));

    if stop1 == start1 {
        return Err(HostError::out_of_range(
            "map",
            "expects an input range with distinct bounds",
        ));
    }

    Ok(Ret::Number(
        start2 + (stop2 - start2) * ((value - start1) / (stop1 - start1)),
    ))
}
