use std::fmt;

use log::{error, warn};

/// Result type used by every host operation.
pub type HostResult<T> = Result<T, HostError>;

/// Which side of the scripting boundary an error or warning belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Origin {
    Host,
    Script,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    Warning,
    Error,
}

impl Origin {
    pub fn prefix(self, severity: Severity) -> &'static str {
        match (severity, self) {
            (Severity::Warning, Origin::Host) => "[LUAPROC WARNING (HOST)]",
            (Severity::Error, Origin::Host) => "[LUAPROC ERROR (HOST)]",
            (Severity::Warning, Origin::Script) => "[LUAPROC WARNING (LUA)]",
            (Severity::Error, Origin::Script) => "[LUAPROC ERROR (LUA)]",
        }
    }
}

/// Categorized failure. Every variant is fatal once it reaches the top-level
/// reporter; soft failures go through [`report_warning`] instead.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum HostError {
    #[error("'{name}' expects {expected} arguments but got {got}")]
    ArgCount {
        name: String,
        expected: String,
        got: usize,
    },

    #[error("'{name}' expects arguments of type '{expected}'")]
    ArgType { name: String, expected: String },

    #[error("'{name}' {message}")]
    OutOfRange { name: String, message: String },

    #[error("'{name}' function not found")]
    MissingFunction { name: String },

    #[error("{0}")]
    Script(String),

    #[error(
        "window size not valid ({width}x{height}), width and height must be greater than 0"
    )]
    InvalidWindow { width: i32, height: i32 },

    #[error("'{name}' {message}")]
    InvalidCall { name: String, message: String },

    #[error("backend failure: {0}")]
    Backend(String),

    #[error("{0}")]
    Usage(String),

    #[error("command table: {0}")]
    Registration(String),
}

impl HostError {
    pub fn arg_count(
        name: &str,
        expected: impl fmt::Display,
        got: usize,
    ) -> Self {
        Self::ArgCount {
            name: name.to_string(),
            expected: expected.to_string(),
            got,
        }
    }

    pub fn arg_type(name: &str, expected: impl fmt::Display) -> Self {
        Self::ArgType {
            name: name.to_string(),
            expected: expected.to_string(),
        }
    }

    pub fn out_of_range(name: &str, message: impl Into<String>) -> Self {
        Self::OutOfRange {
            name: name.to_string(),
            message: message.into(),
        }
    }

    pub fn missing_function(name: &str) -> Self {
        Self::MissingFunction {
            name: name.to_string(),
        }
    }

    pub fn invalid_call(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidCall {
            name: name.to_string(),
            message: message.into(),
        }
    }

    pub fn backend(message: impl fmt::Display) -> Self {
        Self::Backend(message.to_string())
    }

    pub fn origin(&self) -> Origin {
        match self {
            Self::Backend(_) | Self::Usage(_) | Self::Registration(_) => {
                Origin::Host
            }
            _ => Origin::Script,
        }
    }

    /// Logs the categorized message without terminating.
    pub fn report(&self) {
        error!("{} {}", self.origin().prefix(Severity::Error), self);
    }

    /// Crash-only policy: log, then terminate the process.
    pub fn report_and_exit(&self) -> ! {
        self.report();
        std::process::exit(1);
    }
}

/// The one soft-failure path: logs a categorized warning and returns.
pub fn report_warning(origin: Origin, message: impl fmt::Display) {
    warn!("{} {}", origin.prefix(Severity::Warning), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_follow_categorized_templates() {
        assert_eq!(
            HostError::arg_count("size", "2 to 3", 1).to_string(),
            "'size' expects 2 to 3 arguments but got 1"
        );
        assert_eq!(
            HostError::arg_type("windowTitle", "string").to_string(),
            "'windowTitle' expects arguments of type 'string'"
        );
        assert_eq!(
            HostError::missing_function("draw").to_string(),
            "'draw' function not found"
        );
    }

    #[test]
    fn origins_split_host_and_script_failures() {
        assert_eq!(
            HostError::InvalidWindow {
                width: 0,
                height: 360
            }
            .origin(),
            Origin::Script
        );
        assert_eq!(HostError::backend("no adapter").origin(), Origin::Host);
        assert_eq!(
            HostError::Usage("no lua file provided".into()).origin(),
            Origin::Host
        );
        assert_eq!(
            Origin::Script.prefix(Severity::Error),
            "[LUAPROC ERROR (LUA)]"
        );
    }
}
