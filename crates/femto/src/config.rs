// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Config file caching.
//!
//! A config type `site` is backed by `config/site.lua`, a Lua file that
//! returns a table of named values:
//!
//! ```lua
//! return {
//!     title = "My Site",
//!     nav = { "home", "about" },
//! }
//! ```
//!
//! # Cache Layers
//!
//! - [`ConfigCache`]: per-request map, created with every request scope.
//!   Once a type is cached it is never read again in that request.
//! - [`SharedConfigCache`]: optional process-wide layer for long-lived
//!   hosts. Entries are inserted once and never replaced, so concurrent
//!   requests only ever observe fully loaded configs.
//!
//! Loading itself (resolving and executing the file) is done by the request
//! scope; this module only stores and validates what was loaded.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use mlua::{Lua, Value};
use serde_json::Value as JsonValue;

use crate::error::{FemtoError, Result};
use crate::runtime::{lua_to_json, Vars};

/// The values of one loaded config type.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    config_type: String,
    path: PathBuf,
    values: Vars,
}

impl ConfigEntry {
    /// Creates an entry from already converted values.
    pub fn new(config_type: impl Into<String>, path: impl Into<PathBuf>, values: Vars) -> Self {
        Self {
            config_type: config_type.into(),
            path: path.into(),
            values,
        }
    }

    /// Validates the value a config file returned.
    ///
    /// The value must be a table convertible to a string-keyed mapping.
    /// An empty table is an empty config.
    pub fn from_lua_value(lua: &Lua, config_type: &str, path: &Path, value: Value) -> Result<Self> {
        let parse_error = || FemtoError::ConfigParseError {
            config_type: config_type.to_string(),
            path: path.to_path_buf(),
        };

        let Value::Table(table) = value else {
            return Err(parse_error());
        };
        if table.is_empty() {
            return Ok(Self::new(config_type, path, Vars::new()));
        }
        match lua_to_json(lua, Value::Table(table)) {
            Ok(JsonValue::Object(values)) => Ok(Self::new(config_type, path, values)),
            Ok(_) => Err(parse_error()),
            Err(e) => {
                tracing::debug!("Config {} did not convert: {}", config_type, e);
                Err(parse_error())
            }
        }
    }

    /// Looks up `key`, failing with [`FemtoError::ConfigKeyNotFound`].
    pub fn get(&self, key: &str) -> Result<&JsonValue> {
        self.values.get(key).ok_or_else(|| FemtoError::ConfigKeyNotFound {
            key: key.to_string(),
            config_type: self.config_type.clone(),
            path: self.path.clone(),
        })
    }

    /// The config type this entry was loaded for.
    pub fn config_type(&self) -> &str {
        &self.config_type
    }

    /// The file the values came from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All values.
    pub fn values(&self) -> &Vars {
        &self.values
    }
}

/// Per-request config cache keyed by config type.
#[derive(Debug, Default)]
pub struct ConfigCache {
    entries: HashMap<String, Arc<ConfigEntry>>,
}

impl ConfigCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves a cached config type.
    pub fn get(&self, config_type: &str) -> Option<Arc<ConfigEntry>> {
        self.entries.get(config_type).cloned()
    }

    /// Caches a config type.
    ///
    /// An already cached type keeps its first entry; the kept entry is returned.
    pub fn insert(&mut self, entry: Arc<ConfigEntry>) -> Arc<ConfigEntry> {
        self.entries
            .entry(entry.config_type().to_string())
            .or_insert(entry)
            .clone()
    }

    /// Checks if a config type is cached.
    pub fn contains(&self, config_type: &str) -> bool {
        self.entries.contains_key(config_type)
    }

    /// Number of cached types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Process-wide, insert-once config cache.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct SharedConfigCache {
    entries: Arc<RwLock<HashMap<String, Arc<ConfigEntry>>>>,
}

impl SharedConfigCache {
    /// Creates an empty shared cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves a cached config type.
    pub fn get(&self, config_type: &str) -> Option<Arc<ConfigEntry>> {
        let entries = self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.get(config_type).cloned()
    }

    /// Publishes a loaded config type.
    ///
    /// If another request published the same type first, that entry wins
    /// and is returned.
    pub fn publish(&self, entry: Arc<ConfigEntry>) -> Arc<ConfigEntry> {
        let mut entries = self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries
            .entry(entry.config_type().to_string())
            .or_insert(entry)
            .clone()
    }

    /// Number of published types.
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Returns true if nothing was published.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_from_table() {
        let lua = Lua::new();
        let value: Value = lua.load("return { title = 'Femto', year = 2024 }").eval().unwrap();
        let entry = ConfigEntry::from_lua_value(&lua, "site", Path::new("/s/config/site.lua"), value).unwrap();

        assert_eq!(entry.get("title").unwrap(), &json!("Femto"));
        assert_eq!(entry.get("year").unwrap(), &json!(2024));

        let err = entry.get("missing").unwrap_err();
        match err {
            FemtoError::ConfigKeyNotFound { key, config_type, path } => {
                assert_eq!(key, "missing");
                assert_eq!(config_type, "site");
                assert_eq!(path, PathBuf::from("/s/config/site.lua"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_entry_rejects_non_mappings() {
        let lua = Lua::new();
        for source in ["return 'text'", "return { 'a', 'b' }", "return nil"] {
            let value: Value = lua.load(source).eval().unwrap();
            let err = ConfigEntry::from_lua_value(&lua, "site", Path::new("site.lua"), value).unwrap_err();
            assert!(matches!(err, FemtoError::ConfigParseError { .. }), "{source}");
        }

        let empty: Value = lua.load("return {}").eval().unwrap();
        let entry = ConfigEntry::from_lua_value(&lua, "empty", Path::new("empty.lua"), empty).unwrap();
        assert!(entry.values().is_empty());
    }

    #[test]
    fn test_caches_keep_first_entry() {
        let first = Arc::new(ConfigEntry::new("site", "a.lua", Vars::new()));
        let second = Arc::new(ConfigEntry::new("site", "b.lua", Vars::new()));

        let mut cache = ConfigCache::new();
        cache.insert(first.clone());
        let kept = cache.insert(second.clone());
        assert_eq!(kept.path(), Path::new("a.lua"));
        assert!(cache.contains("site"));
        assert_eq!(cache.len(), 1);

        let shared = SharedConfigCache::new();
        shared.publish(first);
        let kept = shared.publish(second);
        assert_eq!(kept.path(), Path::new("a.lua"));
        assert_eq!(shared.len(), 1);
    }
}
