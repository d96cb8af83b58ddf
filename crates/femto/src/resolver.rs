// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Logical name to file path resolution.
//!
//! [`PathResolver`] maps a `(name, kind)` pair to the file that backs it:
//!
//! ```text
//! {app_root}/{kind directory}/{sanitized name}.lua
//! ```
//!
//! Resolution is purely lexical and never touches the filesystem. Whether
//! the file exists is decided later by the [`SourceStore`](crate::store::SourceStore).
//!
//! # Traversal protection
//!
//! Names come straight from request paths, so [`sanitize_name`] removes every
//! `..` before the path is built. Removing all occurrences in one pass leaves
//! no `..` behind: a run of dots collapses to at most one dot, and the removed
//! text is itself only dots, so two runs can never meet. Leading separators
//! are stripped as well so a name can not replace the kind directory.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::kind::FileKind;

/// Parent-directory marker removed from every logical name.
pub const PARENT_DIR_MARKER: &str = "..";

/// Converts a Path to a normalized string with forward slashes.
/// On Windows, uses path components to rebuild with `/` separators.
#[inline]
pub fn path_to_string<P: AsRef<Path>>(path: P) -> String {
    #[cfg(windows)]
    {
        use std::path::Component;
        let path = path.as_ref();
        let mut result = String::new();
        for (i, component) in path.components().enumerate() {
            if i > 0 {
                result.push('/');
            }
            match component {
                Component::Prefix(p) => result.push_str(&p.as_os_str().to_string_lossy()),
                Component::RootDir => result.push('/'),
                Component::CurDir => result.push('.'),
                Component::ParentDir => result.push_str(".."),
                Component::Normal(s) => result.push_str(&s.to_string_lossy()),
            }
        }
        result
    }
    #[cfg(not(windows))]
    {
        path.as_ref().to_string_lossy().to_string()
    }
}

/// Strips directory-traversal sequences from a logical name.
///
/// Every occurrence of `..` is removed, then leading `/` and `\` are
/// trimmed.
pub fn sanitize_name(name: &str) -> String {
    name.replace(PARENT_DIR_MARKER, "")
        .trim_start_matches(['/', '\\'])
        .to_string()
}

/// A logical name resolved to a concrete file path.
///
/// Only [`PathResolver::resolve`] constructs these, so `absolute_path`
/// never contains a parent-directory segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    kind: FileKind,
    logical_name: String,
    absolute_path: PathBuf,
}

impl ResolvedPath {
    /// The kind this path was resolved for.
    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// The name as requested, before sanitizing.
    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    /// The full path of the backing file.
    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    /// The path with forward slashes, used as chunk name and store key.
    pub fn display_path(&self) -> String {
        path_to_string(&self.absolute_path)
    }
}

/// Resolves logical names below an app root.
///
/// # Examples
///
/// ```rust
/// use femto::{FileKind, PathResolver};
///
/// let resolver = PathResolver::new("/srv/site");
/// let page = resolver.resolve("blog/../../etc/passwd", FileKind::Page).unwrap();
/// assert!(!page.display_path().contains(".."));
///
/// let config = resolver.resolve("site", FileKind::Config).unwrap();
/// assert_eq!(config.display_path(), "/srv/site/config/site.lua");
/// ```
#[derive(Debug, Clone)]
pub struct PathResolver {
    app_root: PathBuf,
}

impl PathResolver {
    /// Creates a resolver for the given app root.
    pub fn new<P: AsRef<Path>>(app_root: P) -> Self {
        Self {
            app_root: app_root.as_ref().to_path_buf(),
        }
    }

    /// The app root this resolver builds paths under.
    pub fn app_root(&self) -> &Path {
        &self.app_root
    }

    /// Maps `(name, kind)` to its file path.
    ///
    /// Never fails for a well-formed [`FileKind`]; the `Result` carries
    /// [`FemtoError::UnsupportedKind`](crate::FemtoError::UnsupportedKind)
    /// through [`resolve_str`](Self::resolve_str).
    pub fn resolve(&self, name: &str, kind: FileKind) -> Result<ResolvedPath> {
        let sanitized = sanitize_name(name);
        let file_name = format!("{}.{}", sanitized, kind.extension());
        let absolute_path = self.app_root.join(kind.directory()).join(file_name);

        tracing::debug!("Resolved {} '{}' to {}", kind, name, absolute_path.display());

        Ok(ResolvedPath {
            kind,
            logical_name: name.to_string(),
            absolute_path,
        })
    }

    /// Like [`resolve`](Self::resolve), with the kind given by name.
    pub fn resolve_str(&self, name: &str, kind: &str) -> Result<ResolvedPath> {
        self.resolve(name, kind.parse()?)
    }
}
