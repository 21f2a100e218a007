//! Binding between the command table and the Lua state.

use std::cell::RefCell;
use std::rc::Rc;

use mlua::{
    Function, Lua, MetaMethod, MultiValue, UserData, UserDataFields,
    UserDataMethods, Value,
};

use super::{Arg, Args, Command, Constant, Ret, commands, constants, dispatch};
use crate::canvas::Color;
use crate::core::error::{HostError, HostResult};
use crate::runtime::state::HostState;

impl UserData for Color {
    fn add_fields<F: UserDataFields<Self>>(fields: &mut F) {
        fields.add_field_method_get("r", |_, this| Ok(this.r));
        fields.add_field_method_get("g", |_, this| Ok(this.g));
        fields.add_field_method_get("b", |_, this| Ok(this.b));
        fields.add_field_method_get("a", |_, this| Ok(this.a));
    }

    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| {
            Ok(this.to_string())
        });
        methods.add_meta_method(MetaMethod::Eq, |_, this, other: Color| {
            Ok(*this == other)
        });
    }
}

impl mlua::FromLua for Color {
    fn from_lua(value: Value, _: &Lua) -> mlua::Result<Self> {
        match value {
            Value::UserData(ud) => Ok(*ud.borrow::<Color>()?),
            other => Err(mlua::Error::FromLuaConversionError {
                from: other.type_name(),
                to: "Color".to_string(),
                message: None,
            }),
        }
    }
}

fn describe(lua: &Lua, value: &Value) -> String {
    lua.globals()
        .get::<Function>("tostring")
        .and_then(|tostring| tostring.call::<String>(value.clone()))
        .unwrap_or_else(|_| value.type_name().to_string())
}

pub fn to_arg(lua: &Lua, value: &Value) -> Arg {
    match value {
        Value::Nil => Arg::Nil,
        Value::Boolean(b) => Arg::Bool(*b),
        Value::Integer(i) => Arg::Number(*i as f64),
        Value::Number(n) => Arg::Number(*n),
        Value::String(s) => Arg::Str(s.to_string_lossy().to_string()),
        Value::UserData(ud) => match ud.borrow::<Color>() {
            Ok(color) => Arg::Color(*color),
            Err(_) => Arg::Other {
                type_name: value.type_name(),
                text: describe(lua, value),
            },
        },
        other => Arg::Other {
            type_name: other.type_name(),
            text: describe(lua, other),
        },
    }
}

pub fn to_args(lua: &Lua, values: &MultiValue) -> Args {
    Args::new(values.iter().map(|value| to_arg(lua, value)).collect())
}

pub fn into_value(lua: &Lua, ret: Ret) -> mlua::Result<Value> {
    Ok(match ret {
        Ret::None => Value::Nil,
        Ret::Number(n) => Value::Number(n),
        Ret::Int(i) => Value::Integer(i),
        Ret::Bool(b) => Value::Boolean(b),
        Ret::Color(color) => Value::UserData(lua.create_userdata(color)?),
    })
}

/// Recovers a host error that travelled through Lua as an external error.
pub fn host_error(error: &mlua::Error) -> Option<HostError> {
    match error {
        mlua::Error::ExternalError(inner) => {
            inner.downcast_ref::<HostError>().cloned()
        }
        mlua::Error::CallbackError { cause, .. } => host_error(cause),
        mlua::Error::WithContext { cause, .. } => host_error(cause),
        _ => None,
    }
}

/// Maps any Lua failure into the host taxonomy.
pub fn script_error(error: mlua::Error) -> HostError {
    host_error(&error).unwrap_or_else(|| HostError::Script(error.to_string()))
}

fn lua_err(error: mlua::Error) -> HostError {
    HostError::Registration(error.to_string())
}

fn create_command(
    lua: &Lua,
    shared: &Rc<RefCell<HostState>>,
    command: &'static Command,
) -> mlua::Result<Function> {
    let shared = Rc::clone(shared);

    lua.create_function(move |lua, values: MultiValue| {
        let args = to_args(lua, &values);
        let result = {
            let mut state = shared.borrow_mut();
            if let Some(error) = &state.fatal {
                return Err(mlua::Error::external(error.clone()));
            }
            let result = dispatch(&mut state, command, args);
            if let Err(error) = &result {
                state.latch(error);
            }
            result
        };

        match result {
            Ok(ret) => into_value(lua, ret),
            Err(error) => Err(mlua::Error::external(error)),
        }
    })
}

/// Installs every command and constant as a Lua global.
pub fn register(lua: &Lua, shared: &Rc<RefCell<HostState>>) -> HostResult<()> {
    let table = commands();
    super::validate_table(&table)?;

    let globals = lua.globals();
    for command in table {
        let function = create_command(lua, shared, command).map_err(lua_err)?;
        globals.set(command.name, function).map_err(lua_err)?;
    }

    for (name, constant) in constants() {
        match constant {
            Constant::Int(value) => globals.set(name, value),
            Constant::Number(value) => globals.set(name, value),
        }
        .map_err(lua_err)?;
    }

    Ok(())
}
