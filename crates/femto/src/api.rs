// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The API injected into every content file.
//!
//! | Global | Effect |
//! |---|---|
//! | `echo(...)` | writes its arguments to the active buffer |
//! | `print(...)` | like Lua's `print`, into the active buffer |
//! | `escape(s)` | HTML-escapes a value |
//! | `useTemplate(name, vars)` | selects the template wrapping the page |
//! | `useFragment(name, vars)` | renders a fragment in place |
//! | `templateContent()` | emits the captured page output |
//! | `getConfig(type, key)` | reads a config value |
//! | `getUrlPart(n)` | n-th segment of the request path (whole `n` from 1), or `nil` |
//! | `femto.page`, `femto.template` | read-only view of the render context |

use std::rc::Rc;

use mlua::{Function, Lua, LuaSerdeExt, Number, Result as LuaResult, Table, Value, Variadic};

use crate::error::FemtoError;
use crate::render::ScopeInner;
use crate::runtime::table_to_vars;

/// Escapes text for safe inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn stringify(lua: &Lua, args: Variadic<Value>, separator: &str) -> LuaResult<String> {
    let tostring: Function = lua.globals().get("tostring")?;
    let mut parts = Vec::with_capacity(args.len());
    for value in args {
        parts.push(tostring.call::<String>(value)?);
    }
    Ok(parts.join(separator))
}

/// Registers the injected API as globals of `lua`, bound to one request scope.
pub(crate) fn register_api(lua: &Lua, scope: Rc<ScopeInner>) -> LuaResult<()> {
    let globals = lua.globals();

    let echo_scope = scope.clone();
    globals.set(
        "echo",
        lua.create_function(move |lua, args: Variadic<Value>| {
            let text = stringify(lua, args, "")?;
            echo_scope.write(&text);
            Ok(())
        })?,
    )?;

    let print_scope = scope.clone();
    globals.set(
        "print",
        lua.create_function(move |lua, args: Variadic<Value>| {
            let mut text = stringify(lua, args, "\t")?;
            text.push('\n');
            print_scope.write(&text);
            Ok(())
        })?,
    )?;

    globals.set(
        "escape",
        lua.create_function(|lua, value: Value| {
            if value.is_nil() {
                return Ok(String::new());
            }
            let tostring: Function = lua.globals().get("tostring")?;
            let text: String = tostring.call(value)?;
            Ok(escape_html(&text))
        })?,
    )?;

    let template_scope = scope.clone();
    globals.set(
        "useTemplate",
        lua.create_function(move |lua, (name, vars): (String, Option<Table>)| {
            let vars = table_to_vars(lua, vars)?;
            template_scope.use_template(name, vars);
            Ok(())
        })?,
    )?;

    let fragment_scope = scope.clone();
    globals.set(
        "useFragment",
        lua.create_function(move |lua, (name, vars): (String, Option<Table>)| {
            let vars = table_to_vars(lua, vars)?;
            fragment_scope
                .use_fragment(lua, &name, vars.as_ref())
                .map_err(FemtoError::into_lua)
        })?,
    )?;

    let content_scope = scope.clone();
    globals.set(
        "templateContent",
        lua.create_function(move |_, ()| content_scope.template_content().map_err(FemtoError::into_lua))?,
    )?;

    let config_scope = scope.clone();
    globals.set(
        "getConfig",
        lua.create_function(move |lua, (config_type, key): (String, String)| {
            let value = config_scope
                .get_config(lua, &config_type, &key)
                .map_err(FemtoError::into_lua)?;
            lua.to_value(&value)
        })?,
    )?;

    let uri_scope = scope.clone();
    globals.set(
        "getUrlPart",
        lua.create_function(move |_, n: Number| {
            // 1.5 names no segment; only whole numbers index
            if n.fract() != 0.0 {
                return Ok(None);
            }
            Ok(uri_scope.uri().url_part(n as i64).map(str::to_string))
        })?,
    )?;

    globals.set("femto", create_femto_table(lua, scope)?)?;

    Ok(())
}

/// Builds the read-only `femto` table exposing `page` and `template`.
fn create_femto_table(lua: &Lua, scope: Rc<ScopeInner>) -> LuaResult<Table> {
    let femto = lua.create_table()?;
    let mt = lua.create_table()?;

    mt.set(
        "__index",
        lua.create_function(move |_, (_, key): (Table, String)| {
            let context = scope.context();
            Ok(match key.as_str() {
                "page" => Some(context.page),
                "template" => context.template,
                _ => None,
            })
        })?,
    )?;
    mt.set(
        "__newindex",
        lua.create_function(|_, (_, key): (Table, Value)| -> LuaResult<()> {
            Err(mlua::Error::runtime(format!(
                "femto is read-only (tried to set {:?})",
                key
            )))
        })?,
    )?;
    femto.set_metatable(Some(mt));

    Ok(femto)
}
