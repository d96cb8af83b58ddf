// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Runtime execution for content files.
//!
//! Every content file runs as a Lua chunk inside its own environment
//! table. The environment inherits from the sandboxed globals through its
//! metatable, and the caller's variables are bound directly in it:
//!
//! ```text
//! env = { title = "Home", ... }   -- injected variables
//! setmetatable(env, { __index = _G })
//! ```
//!
//! Assignments made by the file land in `env`, so they never leak into the
//! globals, into the caller, or into the next file that runs.

use mlua::{DeserializeOptions, Lua, LuaSerdeExt, Result as LuaResult, Table, Value};
use serde_json::Value as JsonValue;

/// A mapping of names to values, used for injected variables, template
/// variables and config values.
pub type Vars = serde_json::Map<String, JsonValue>;

/// Sandboxes the Lua environment by disabling dangerous functions and libraries.
///
/// This removes access to:
/// - `io` library (file I/O)
/// - `debug` library (introspection)
/// - `load`, `loadstring`, `loadfile`, `dofile` (dynamic code execution)
/// - `require` and `package` (content files include each other through the API)
/// - Most of `os` library (keeps only `os.date`, `os.time`, `os.clock`, `os.difftime`)
pub fn sandbox_lua(lua: &Lua) -> LuaResult<()> {
    let globals = lua.globals();

    // Save safe os functions before removing the library
    let os_table: Table = globals.get("os")?;
    let safe_os = lua.create_table()?;
    for name in ["date", "time", "clock", "difftime"] {
        let func: mlua::Function = os_table.get(name)?;
        safe_os.set(name, func)?;
    }

    for name in ["io", "debug", "load", "loadstring", "loadfile", "dofile", "require", "package"] {
        globals.set(name, Value::Nil)?;
    }
    globals.set("os", safe_os)?;

    Ok(())
}

/// Converts variables to a Lua table.
pub fn vars_to_table(lua: &Lua, vars: &Vars) -> LuaResult<Table> {
    let table = lua.create_table()?;
    for (name, value) in vars {
        table.set(name.as_str(), lua.to_value(value)?)?;
    }
    Ok(table)
}

/// Converts a Lua value to JSON.
///
/// Functions, threads and userdata have no JSON form and are skipped.
pub fn lua_to_json(lua: &Lua, value: Value) -> LuaResult<JsonValue> {
    let options = DeserializeOptions::new().deny_unsupported_types(false);
    lua.from_value_with(value, options)
}

/// Converts an optional Lua table argument to variables.
///
/// `nil` becomes `None`; a table must convert to a JSON object.
pub fn table_to_vars(lua: &Lua, value: Option<Table>) -> LuaResult<Option<Vars>> {
    let Some(table) = value else {
        return Ok(None);
    };
    if table.is_empty() {
        return Ok(Some(Vars::new()));
    }
    match lua_to_json(lua, Value::Table(table))? {
        JsonValue::Object(map) => Ok(Some(map)),
        _ => Err(mlua::Error::runtime(
            "variables must be a table with string keys",
        )),
    }
}

/// Runtime executor for content files.
///
/// This struct provides methods to execute content sources on a shared
/// Lua instance.
pub struct Runtime<'lua> {
    lua: &'lua Lua,
}

impl<'lua> Runtime<'lua> {
    /// Creates a new runtime with the given Lua instance.
    pub fn new(lua: &'lua Lua) -> Self {
        Self { lua }
    }

    /// Runs `source` with `variables` bound in a fresh environment.
    ///
    /// # Arguments
    ///
    /// * `source` - The Lua source code
    /// * `name` - Chunk name for error reporting (the file path)
    /// * `variables` - Values visible as top-level names inside the chunk
    ///
    /// # Returns
    ///
    /// Whatever the chunk returns (`nil` when it returns nothing).
    pub fn run(&self, source: &str, name: &str, variables: Option<&Vars>) -> LuaResult<Value> {
        let env = self.create_environment(variables)?;

        self.lua
            .load(source)
            .set_name(format!("@{}", name))
            .set_environment(env)
            .call(())
    }

    /// Creates an environment table that inherits from globals.
    fn create_environment(&self, variables: Option<&Vars>) -> LuaResult<Table> {
        let env = match variables {
            Some(vars) => vars_to_table(self.lua, vars)?,
            None => self.lua.create_table()?,
        };

        // Set metatable so env inherits from globals
        let mt = self.lua.create_table()?;
        mt.set("__index", self.lua.globals())?;
        env.set_metatable(Some(mt));

        Ok(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(value: JsonValue) -> Vars {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_run_binds_variables_and_returns_value() {
        let lua = Lua::new();
        let runtime = Runtime::new(&lua);
        let result = runtime
            .run("return greeting .. ', ' .. user.name", "test.lua", Some(&vars(json!({
                "greeting": "Hello",
                "user": { "name": "Ada" }
            }))))
            .unwrap();
        assert_eq!(lua.unpack::<String>(result).unwrap(), "Hello, Ada");
    }

    #[test]
    fn test_assignments_do_not_leak_between_runs() {
        let lua = Lua::new();
        let runtime = Runtime::new(&lua);
        runtime
            .run("counter = 1; title = 'changed'", "first.lua", Some(&vars(json!({ "title": "orig" }))))
            .unwrap();

        let leaked = runtime.run("return counter", "second.lua", None).unwrap();
        assert!(leaked.is_nil());
        let globals_title: Value = lua.globals().get("title").unwrap();
        assert!(globals_title.is_nil());
    }

    #[test]
    fn test_sandbox_removes_dangerous_globals() {
        let lua = Lua::new();
        sandbox_lua(&lua).unwrap();
        let runtime = Runtime::new(&lua);

        let result = runtime
            .run("return io == nil and require == nil and load == nil and os.execute == nil and os.time ~= nil", "sandbox.lua", None)
            .unwrap();
        assert_eq!(result, Value::Boolean(true));
    }

    #[test]
    fn test_table_to_vars() {
        let lua = Lua::new();
        let table: Table = lua.load("return { title = 'x', tags = { 'a', 'b' } }").eval().unwrap();
        let converted = table_to_vars(&lua, Some(table)).unwrap().unwrap();
        assert_eq!(JsonValue::Object(converted), json!({ "title": "x", "tags": ["a", "b"] }));

        let list: Table = lua.load("return { 1, 2 }").eval().unwrap();
        assert!(table_to_vars(&lua, Some(list)).is_err());
        assert!(table_to_vars(&lua, None).unwrap().is_none());
    }
}
