use std::io::Write;

use super::{Arg, ArgKind, Args, Arity, Command, Ret};
use crate::core::error::{HostError, HostResult};
use crate::runtime::state::HostState;

pub const COMMANDS: &[Command] = &[
    Command::new("print", Arity::Any, ArgKind::Any, print),
    Command::new("println", Arity::Any, ArgKind::Any, println),
];

/// Integral values print without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn format_arg(arg: &Arg) -> String {
    match arg {
        Arg::Nil => "nil".to_string(),
        Arg::Bool(value) => value.to_string(),
        Arg::Number(value) => format_number(*value),
        Arg::Str(text) => text.clone(),
        Arg::Color(color) => color.to_string(),
        Arg::Other { text, .. } => text.clone(),
    }
}

pub fn format_line(args: &Args) -> String {
    args.iter().map(format_arg).collect::<Vec<_>>().join(" ")
}

fn write(state: &mut HostState, text: &str) -> HostResult<Ret> {
    state
        .output
        .write_all(text.as_bytes())
        .and_then(|_| state.output.flush())
        .map_err(|e| HostError::backend(format!("output failed: {}", e)))?;
    Ok(Ret::None)
}

fn print(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    write(state, &format_line(args))
}

fn println(state: &mut HostState, args: &Args) -> HostResult<Ret> {
    write(state, &format!("{}\n", format_line(args)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Color;

    #[test]
    fn numbers_print_in_shortest_form() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }

    #[test]
    fn line_is_space_joined() {
        let args = Args::new(vec![
            Arg::Str("frame".into()),
            Arg::Number(12.0),
            Arg::Nil,
            Arg::Bool(false),
            Arg::Color(Color::new(1, 2, 3, 255)),
        ]);
        assert_eq!(
            format_line(&args),
            "frame 12 nil false Color(1, 2, 3, 255)"
        );
        assert_eq!(format_line(&Args::default()), "");
    }
}
