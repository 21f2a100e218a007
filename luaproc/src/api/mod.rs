//! The script-facing command table.
//!
//! Every host function is a [`Command`]: a name, the argument contract it
//! accepts, when it may run, and a plain function pointer. Contracts are
//! checked in [`dispatch`] so handlers only ever see validated arguments.

use std::collections::HashSet;
use std::fmt;

use crate::canvas::Color;
use crate::core::error::{HostError, HostResult};
use crate::runtime::deferred::Handler;
use crate::runtime::lifecycle::LifecycleState;
use crate::runtime::state::HostState;

pub mod camera;
pub mod color;
pub mod environment;
pub mod lua;
pub mod math;
pub mod output;
pub mod shape;
pub mod transform;

/// A single script value after conversion.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Nil,
    Bool(bool),
    Number(f64),
    Str(String),
    Color(Color),
    /// Anything else, kept only as its type name and display text.
    Other {
        type_name: &'static str,
        text: String,
    },
}

impl Arg {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args(Vec<Arg>);

impl Args {
    pub fn new(args: Vec<Arg>) -> Self {
        Self(args)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arg> {
        self.0.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Arg> {
        self.0.get(index)
    }

    /// Numeric argument at `index`. Validation has already run, so a
    /// missing or non-numeric slot reads as zero.
    pub fn number(&self, index: usize) -> f64 {
        self.get(index).and_then(Arg::as_number).unwrap_or_default()
    }

    pub fn float(&self, index: usize) -> f32 {
        self.number(index) as f32
    }

    pub fn int(&self, index: usize) -> i64 {
        self.number(index) as i64
    }

    pub fn boolean(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Arg::Bool(true)))
    }

    pub fn string(&self, index: usize) -> &str {
        match self.get(index) {
            Some(Arg::Str(text)) => text,
            _ => "",
        }
    }

    pub fn numbers(&self) -> Vec<f64> {
        self.0.iter().filter_map(Arg::as_number).collect()
    }
}

/// Value handed back to the script.
#[derive(Clone, Debug, PartialEq)]
pub enum Ret {
    None,
    Number(f64),
    Int(i64),
    Bool(bool),
    Color(Color),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
    Range(usize, usize),
    AtLeast(usize),
    Any,
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(n) => count == n,
            Self::OneOf(counts) => counts.contains(&count),
            Self::Range(min, max) => (min..=max).contains(&count),
            Self::AtLeast(min) => count >= min,
            Self::Any => true,
        }
    }

    fn is_well_formed(self) -> bool {
        match self {
            Self::OneOf(counts) => !counts.is_empty(),
            Self::Range(min, max) => min <= max,
            _ => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{}", n),
            Self::OneOf(counts) => {
                let counts: Vec<String> =
                    counts.iter().map(ToString::to_string).collect();
                write!(f, "{}", counts.join(" or "))
            }
            Self::Range(min, max) => write!(f, "{} to {}", min, max),
            Self::AtLeast(min) => write!(f, "at least {}", min),
            Self::Any => write!(f, "any number of"),
        }
    }
}

/// Type every argument of a command must have.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ArgKind {
    Number,
    Boolean,
    String,
    ColorOrNumber,
    Any,
}

impl ArgKind {
    pub fn accepts(self, arg: &Arg) -> bool {
        match self {
            Self::Number => matches!(arg, Arg::Number(_)),
            Self::Boolean => matches!(arg, Arg::Bool(_)),
            Self::String => matches!(arg, Arg::Str(_)),
            Self::ColorOrNumber => matches!(arg, Arg::Number(_) | Arg::Color(_)),
            Self::Any => true,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::ColorOrNumber => "color or number",
            Self::Any => "any",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Deferral {
    Immediate,
    /// Recorded while in Setup and replayed once the surface exists.
    UntilSurface,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Any,
    SetupOnly,
    DrawOnly,
}

pub struct Command {
    pub name: &'static str,
    pub arity: Arity,
    pub kind: ArgKind,
    pub deferral: Deferral,
    pub phase: Phase,
    pub handler: Handler<HostState>,
}

impl Command {
    pub const fn new(
        name: &'static str,
        arity: Arity,
        kind: ArgKind,
        handler: Handler<HostState>,
    ) -> Self {
        Self {
            name,
            arity,
            kind,
            deferral: Deferral::Immediate,
            phase: Phase::Any,
            handler,
        }
    }

    pub const fn deferred(mut self) -> Self {
        self.deferral = Deferral::UntilSurface;
        self
    }

    pub const fn setup_only(mut self) -> Self {
        self.phase = Phase::SetupOnly;
        self
    }

    pub const fn draw_only(mut self) -> Self {
        self.phase = Phase::DrawOnly;
        self
    }

    /// Argument count and type contract.
    pub fn check(&self, args: &Args) -> HostResult<()> {
        if !self.arity.accepts(args.len()) {
            return Err(HostError::arg_count(self.name, self.arity, args.len()));
        }
        if args.iter().any(|arg| !self.kind.accepts(arg)) {
            return Err(HostError::arg_type(self.name, self.kind.describe()));
        }
        Ok(())
    }

    fn check_phase(&self, state: LifecycleState) -> HostResult<()> {
        match (self.phase, state) {
            (Phase::SetupOnly, LifecycleState::Setup)
            | (Phase::DrawOnly, LifecycleState::Draw)
            | (Phase::Any, _) => Ok(()),
            (Phase::SetupOnly, _) => Err(HostError::invalid_call(
                self.name,
                "can only be called inside 'setup'",
            )),
            (Phase::DrawOnly, _) => Err(HostError::invalid_call(
                self.name,
                "can only be called inside 'draw'",
            )),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("kind", &self.kind)
            .field("deferral", &self.deferral)
            .field("phase", &self.phase)
            .finish()
    }
}

/// Global value registered next to the commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Constant {
    Int(i64),
    Number(f64),
}

/// The full command table, in registration order.
pub fn commands() -> Vec<&'static Command> {
    [
        color::COMMANDS,
        environment::COMMANDS,
        math::COMMANDS,
        output::COMMANDS,
        transform::COMMANDS,
        camera::COMMANDS,
        shape::COMMANDS,
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn constants() -> Vec<(&'static str, Constant)> {
    let mut constants = Vec::new();
    constants.extend(color::constants());
    constants.extend(environment::constants());
    constants.extend(math::constants());
    constants
}

/// Rejects a malformed table before anything is exposed to a script.
pub fn validate_table(commands: &[&Command]) -> HostResult<()> {
    let mut seen = HashSet::new();

    for command in commands {
        if command.name.is_empty() {
            return Err(HostError::Registration("empty command name".into()));
        }
        if !seen.insert(command.name) {
            return Err(HostError::Registration(format!(
                "'{}' registered twice",
                command.name
            )));
        }
        if !command.arity.is_well_formed() {
            return Err(HostError::Registration(format!(
                "'{}' has an empty arity",
                command.name
            )));
        }
        if command.deferral == Deferral::UntilSurface
            && command.phase != Phase::Any
        {
            return Err(HostError::Registration(format!(
                "'{}' is deferred but restricted to one phase",
                command.name
            )));
        }
    }

    Ok(())
}

/// Validates `args` against `command` and either runs it or records it for
/// replay after the surface exists.
pub fn dispatch(
    state: &mut HostState,
    command: &'static Command,
    args: Args,
) -> HostResult<Ret> {
    command.check(&args)?;
    let phase = state.lifecycle.current_state();
    command.check_phase(phase)?;

    if command.deferral == Deferral::UntilSurface
        && phase == LifecycleState::Setup
    {
        state.deferred.enqueue(command.name, command.handler, args);
        return Ok(Ret::None);
    }

    (command.handler)(state, &args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut HostState, _: &Args) -> HostResult<Ret> {
        Ok(Ret::None)
    }

    #[test]
    fn shipped_table_is_valid() {
        validate_table(&commands()).unwrap();
    }

    #[test]
    fn duplicate_names_are_rejected() {
        static A: Command =
            Command::new("dup", Arity::Exact(0), ArgKind::Number, noop);
        static B: Command =
            Command::new("dup", Arity::Exact(1), ArgKind::Number, noop);
        assert!(matches!(
            validate_table(&[&A, &B]),
            Err(HostError::Registration(_))
        ));
    }

    #[test]
    fn deferred_commands_cannot_be_phase_restricted() {
        static BAD: Command =
            Command::new("bad", Arity::Any, ArgKind::Any, noop)
                .deferred()
                .draw_only();
        assert!(validate_table(&[&BAD]).is_err());
    }

    #[test]
    fn arity_messages() {
        assert_eq!(Arity::Exact(2).to_string(), "2");
        assert_eq!(Arity::OneOf(&[4, 6]).to_string(), "4 or 6");
        assert_eq!(Arity::Range(1, 4).to_string(), "1 to 4");
        assert!(Arity::OneOf(&[1, 3]).accepts(3));
        assert!(!Arity::OneOf(&[1, 3]).accepts(2));
    }

    #[test]
    fn check_reports_count_before_type() {
        static CMD: Command =
            Command::new("line", Arity::OneOf(&[4, 6]), ArgKind::Number, noop);

        let err = CMD
            .check(&Args::new(vec![Arg::Str("x".into())]))
            .unwrap_err();
        assert_eq!(err.to_string(), "'line' expects 4 or 6 arguments but got 1");

        let err = CMD
            .check(&Args::new(vec![
                Arg::Number(0.0),
                Arg::Number(0.0),
                Arg::Nil,
                Arg::Number(0.0),
            ]))
            .unwrap_err();
        assert_eq!(err.to_string(), "'line' expects arguments of type 'number'");
    }

    #[test]
    fn args_accessors() {
        let args = Args::new(vec![
            Arg::Number(2.9),
            Arg::Bool(true),
            Arg::Str("title".into()),
        ]);
        assert_eq!(args.int(0), 2);
        assert!(args.boolean(1));
        assert_eq!(args.string(2), "title");
        assert_eq!(args.numbers(), [2.9]);
        assert_eq!(args.number(7), 0.0);
    }
}
