// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Variable-scope loading of resolved content files.

use mlua::{Lua, Value};

use crate::error::{FemtoError, Result};
use crate::resolver::ResolvedPath;
use crate::runtime::{Runtime, Vars};
use crate::store::SourceStore;

/// Reads `file` from `store` and executes it with `variables` in scope.
///
/// Fails with [`FemtoError::NotFound`] for the file's kind when the store
/// has no such file. Text the file emits goes to whatever buffer the
/// injected `echo`/`print` functions currently write to; the chunk's
/// return value is handed back (only config files return something useful).
pub fn load(
    lua: &Lua,
    store: &dyn SourceStore,
    file: &ResolvedPath,
    variables: Option<&Vars>,
) -> Result<Value> {
    let Some(source) = store.read(file)? else {
        return Err(FemtoError::NotFound {
            kind: file.kind(),
            path: file.absolute_path().to_path_buf(),
        });
    };

    tracing::debug!(
        "Executing {} {} with {} variable(s)",
        file.kind(),
        file.display_path(),
        variables.map_or(0, |vars| vars.len())
    );

    let value = Runtime::new(lua).run(&source, &file.display_path(), variables)?;
    Ok(value)
}
