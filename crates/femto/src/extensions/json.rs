// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! JSON module registration for Lua.
//!
//! Provides `json.encode`, `json.decode`, `json.encode_pretty`, and `json.null`.
//! Content files use it to embed data for client-side scripts:
//!
//! ```lua
//! echo('<script>window.site = ', json.encode({ title = getConfig("site", "title") }), '</script>')
//! ```

use mlua::{Lua, LuaSerdeExt, Result as LuaResult, Value};

use crate::runtime::lua_to_json;

/// Register the json module as a global on the given Lua instance.
///
/// The content sandbox has no `require`, so the module is only reachable
/// through the `json` global.
///
/// # Example
///
/// ```rust
/// use mlua::Lua;
/// use femto::register_json_module;
///
/// let lua = Lua::new();
/// register_json_module(&lua).unwrap();
/// let encoded: String = lua.load("return json.encode({ a = 1 })").eval().unwrap();
/// assert_eq!(encoded, r#"{"a":1}"#);
/// ```
pub fn register_json_module(lua: &Lua) -> LuaResult<()> {
    let json_module = lua.create_table()?;

    // Lua table -> JSON string
    let encode = lua.create_function(|lua, value: Value| {
        let json = lua_to_json(lua, value)?;
        serde_json::to_string(&json)
            .map_err(|err| mlua::Error::external(format!("JSON encode error: {}", err)))
    })?;
    json_module.set("encode", encode)?;

    // Same, with indentation
    let encode_pretty = lua.create_function(|lua, value: Value| {
        let json = lua_to_json(lua, value)?;
        serde_json::to_string_pretty(&json)
            .map_err(|err| mlua::Error::external(format!("JSON encode error: {}", err)))
    })?;
    json_module.set("encode_pretty", encode_pretty)?;

    // JSON string -> Lua table
    let decode = lua.create_function(|lua, json_str: String| {
        match serde_json::from_str::<serde_json::Value>(&json_str) {
            Ok(json_value) => lua.to_value(&json_value),
            Err(err) => Err(mlua::Error::external(format!("JSON decode error: {}", err))),
        }
    })?;
    json_module.set("decode", decode)?;

    // Lua has no native null
    json_module.set("null", lua.null())?;

    lua.globals().set("json", json_module)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_then_read_fields() {
        let lua = Lua::new();
        register_json_module(&lua).unwrap();
        let name: String = lua
            .load(r#"local t = json.decode('{"user":{"name":"Ada"}}'); return t.user.name"#)
            .eval()
            .unwrap();
        assert_eq!(name, "Ada");
    }

    #[test]
    fn test_decode_error_is_raised() {
        let lua = Lua::new();
        register_json_module(&lua).unwrap();
        let err = lua.load("return json.decode('{nope')").exec().unwrap_err();
        assert!(err.to_string().contains("JSON decode error"));
    }
}
