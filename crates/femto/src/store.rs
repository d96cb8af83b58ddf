// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Source loading for resolved content files.
//!
//! This module provides the [`SourceStore`] trait and implementations
//! for reading the source of a [`ResolvedPath`].
//!
//! # Store Implementations
//!
//! - [`FileSystemStore`]: Reads files from disk (native builds)
//! - [`MemoryStore`]: Serves sources from an in-memory map (testing, embedding)
//!
//! A store reports a missing file as `Ok(None)`; turning that into the
//! kind-specific not-found error is the loader's job.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::resolver::ResolvedPath;

#[cfg(feature = "filesystem")]
use crate::error::FemtoError;

/// Trait for reading content file sources.
///
/// Implementations must be thread-safe (`Send + Sync`) because one store
/// is shared by every request an [`Engine`](crate::Engine) serves.
pub trait SourceStore: Send + Sync + 'static {
    /// Reads the source behind `path`, or `None` when it does not exist.
    fn read(&self, path: &ResolvedPath) -> Result<Option<String>>;
}

impl<S: SourceStore + ?Sized> SourceStore for Arc<S> {
    fn read(&self, path: &ResolvedPath) -> Result<Option<String>> {
        (**self).read(path)
    }
}

/// Filesystem-backed store.
///
/// Only regular files count as existing; a directory at the resolved path
/// is reported as missing.
#[cfg(feature = "filesystem")]
#[derive(Debug, Clone, Default)]
pub struct FileSystemStore;

#[cfg(feature = "filesystem")]
impl FileSystemStore {
    /// Creates a new filesystem store.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "filesystem")]
impl SourceStore for FileSystemStore {
    fn read(&self, path: &ResolvedPath) -> Result<Option<String>> {
        let file = path.absolute_path();
        if !file.is_file() {
            tracing::debug!("No {} file at {}", path.kind(), file.display());
            return Ok(None);
        }
        match std::fs::read_to_string(file) {
            Ok(source) => Ok(Some(source)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FemtoError::Io(e)),
        }
    }
}

/// Memory-based store keyed by the resolved path with forward slashes.
///
/// # Examples
///
/// ```rust
/// use femto::{FileKind, MemoryStore, PathResolver, SourceStore};
///
/// let store = MemoryStore::new();
/// store.add_source("/site/pages/index.lua", "echo('hi')");
///
/// let path = PathResolver::new("/site").resolve("index", FileKind::Page).unwrap();
/// assert_eq!(store.read(&path).unwrap().as_deref(), Some("echo('hi')"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sources: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_sources_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut HashMap<String, String>) -> R,
    {
        let mut sources = self.sources.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut sources)
    }

    /// Adds (or replaces) the source stored at `path`.
    pub fn add_source(&self, path: &str, source: &str) {
        self.with_sources_mut(|sources| {
            sources.insert(path.to_string(), source.to_string());
        });
    }

    /// Removes the source stored at `path`.
    pub fn remove_source(&self, path: &str) {
        self.with_sources_mut(|sources| {
            sources.remove(path);
        });
    }

    /// Removes every source.
    pub fn clear(&self) {
        self.with_sources_mut(|sources| sources.clear());
    }

    /// Number of stored sources.
    pub fn len(&self) -> usize {
        self.with_sources_mut(|sources| sources.len())
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SourceStore for MemoryStore {
    fn read(&self, path: &ResolvedPath) -> Result<Option<String>> {
        let key = path.display_path();
        Ok(self.with_sources_mut(|sources| sources.get(&key).cloned()))
    }
}
