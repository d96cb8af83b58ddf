// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Error types for the femto rendering pipeline.
//!
//! This module defines [`FemtoError`], the single error enum returned by
//! every fallible operation in the crate.
//!
//! # Error Categories
//!
//! - **Bootstrap errors**: the app root was never set, or set twice
//! - **Resolution errors**: unknown file kinds, files missing on disk
//! - **Composition errors**: `templateContent()` without a selected template
//! - **Config errors**: config files that do not return a mapping, missing keys
//! - **Lua errors**: anything raised while executing a content file
//!
//! Errors raised by the injected API (for example a missing fragment) cross
//! the Lua boundary as external errors. [`FemtoError::femto_cause`] digs the
//! original variant back out so callers can match on it.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::kind::FileKind;

/// The main error type for femto operations.
#[derive(Error, Debug)]
pub enum FemtoError {
    /// The pipeline was launched before an app root was configured.
    #[error("App root not set: call Engine::set_app_root before launching")]
    AppRootNotSet,

    /// The app root was configured a second time.
    #[error("App root already set to {0}")]
    AppRootAlreadySet(PathBuf),

    /// A file kind name outside of page, template, fragment and config.
    #[error("Unsupported file kind: {0:?}")]
    UnsupportedKind(String),

    /// A resolved file does not exist.
    #[error("{}NotFound: {}", kind_label(.kind), .path.display())]
    NotFound {
        /// The kind of file that was looked up.
        kind: FileKind,
        /// The path that was tried.
        path: PathBuf,
    },

    /// `templateContent()` was called while no template was selected.
    #[error("NoTemplateSet: templateContent() called but no template was selected")]
    NoTemplateSet,

    /// A config file did not return a string-keyed table.
    #[error("ConfigParseError: config {config_type:?} ({}) must return a table of named values", .path.display())]
    ConfigParseError {
        /// The config type (file name without extension).
        config_type: String,
        /// The config file path.
        path: PathBuf,
    },

    /// The requested key is absent from a loaded config.
    #[error("ConfigKeyNotFound: key {key:?} not found in config {config_type:?} ({})", .path.display())]
    ConfigKeyNotFound {
        /// The requested key.
        key: String,
        /// The config type.
        config_type: String,
        /// The config file path.
        path: PathBuf,
    },

    /// Lua execution error (syntax errors, runtime errors, errors raised by the API).
    #[error("Lua execution error: {0}")]
    Lua(#[from] mlua::Error),

    /// File I/O error other than a missing file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn kind_label(kind: &FileKind) -> &'static str {
    match kind {
        FileKind::Page => "Page",
        FileKind::Template => "Template",
        FileKind::Fragment => "Fragment",
        FileKind::Config => "Config",
    }
}

impl FemtoError {
    /// Returns true if this is a not-found error for a page.
    pub fn is_page_not_found(&self) -> bool {
        matches!(self, FemtoError::NotFound { kind: FileKind::Page, .. })
    }

    /// Returns the femto error that caused this one.
    ///
    /// For errors that travelled through Lua (an API call failing inside a
    /// content file) this unwraps the callback chain down to the original
    /// variant. Everything else returns `self`.
    pub fn femto_cause(&self) -> &FemtoError {
        match self {
            FemtoError::Lua(err) => find_in_lua_error(err).unwrap_or(self),
            _ => self,
        }
    }

    /// A stable, short name for the error variant.
    ///
    /// This is the value exposed as `e.kind` to the server error page.
    pub fn kind_name(&self) -> &'static str {
        match self.femto_cause() {
            FemtoError::AppRootNotSet => "AppRootNotSet",
            FemtoError::AppRootAlreadySet(_) => "AppRootAlreadySet",
            FemtoError::UnsupportedKind(_) => "UnsupportedKind",
            FemtoError::NotFound { kind, .. } => match kind {
                FileKind::Page => "PageNotFound",
                FileKind::Template => "TemplateNotFound",
                FileKind::Fragment => "FragmentNotFound",
                FileKind::Config => "ConfigNotFound",
            },
            FemtoError::NoTemplateSet => "NoTemplateSet",
            FemtoError::ConfigParseError { .. } => "ConfigParseError",
            FemtoError::ConfigKeyNotFound { .. } => "ConfigKeyNotFound",
            FemtoError::Lua(err) => lua_kind_name(err),
            FemtoError::Io(_) => "IoError",
        }
    }

    /// Wraps this error for raising from inside a Lua callback.
    ///
    /// Lua errors are passed through unchanged so nested content files do
    /// not pile up wrappers.
    pub fn into_lua(self) -> mlua::Error {
        match self {
            FemtoError::Lua(err) => err,
            other => mlua::Error::external(other),
        }
    }
}

fn find_in_lua_error(err: &mlua::Error) -> Option<&FemtoError> {
    match err {
        mlua::Error::ExternalError(inner) => inner.downcast_ref::<FemtoError>(),
        mlua::Error::CallbackError { cause, .. } => find_in_lua_error(cause),
        mlua::Error::WithContext { cause, .. } => find_in_lua_error(cause),
        _ => None,
    }
}

fn lua_kind_name(err: &mlua::Error) -> &'static str {
    match err {
        mlua::Error::SyntaxError { .. } => "SyntaxError",
        mlua::Error::CallbackError { cause, .. } => lua_kind_name(cause),
        mlua::Error::WithContext { cause, .. } => lua_kind_name(cause),
        mlua::Error::MemoryError(_) => "MemoryError",
        _ => "RuntimeError",
    }
}

/// Display helper that prints a [`FemtoError`] without Lua tracebacks.
///
/// Used for the `e.message` value handed to the server error page.
pub struct ShortMessage<'a>(pub &'a FemtoError);

impl fmt::Display for ShortMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.femto_cause() {
            FemtoError::Lua(err) => write!(f, "{}", short_lua_message(err)),
            other => write!(f, "{}", other),
        }
    }
}

/// Marker Lua puts in front of a traceback inside an error message.
const TRACEBACK_MARKER: &str = "\nstack traceback:";

fn short_lua_message(err: &mlua::Error) -> String {
    let message = match err {
        mlua::Error::CallbackError { cause, .. } => return short_lua_message(cause),
        mlua::Error::WithContext { cause, .. } => return short_lua_message(cause),
        mlua::Error::RuntimeError(msg) => msg.clone(),
        mlua::Error::SyntaxError { message, .. } => message.clone(),
        other => other.to_string(),
    };
    match message.split_once(TRACEBACK_MARKER) {
        Some((head, _)) => head.to_string(),
        None => message,
    }
}

/// Convenience type alias for Results with [`FemtoError`].
pub type Result<T> = std::result::Result<T, FemtoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display_names_kind_and_path() {
        let err = FemtoError::NotFound {
            kind: FileKind::Fragment,
            path: PathBuf::from("/site/fragments/nav.lua"),
        };
        assert_eq!(err.to_string(), "FragmentNotFound: /site/fragments/nav.lua");
        assert_eq!(err.kind_name(), "FragmentNotFound");
        assert!(!err.is_page_not_found());
    }

    #[test]
    fn test_femto_cause_unwraps_callback_errors() {
        let original = FemtoError::NoTemplateSet.into_lua();
        let wrapped = mlua::Error::CallbackError {
            traceback: "stack traceback:".to_string(),
            cause: std::sync::Arc::new(original),
        };
        let err = FemtoError::from(wrapped);
        assert!(matches!(err.femto_cause(), FemtoError::NoTemplateSet));
        assert_eq!(err.kind_name(), "NoTemplateSet");
        assert!(ShortMessage(&err).to_string().starts_with("NoTemplateSet"));
    }

    #[test]
    fn test_short_message_drops_traceback() {
        let err = FemtoError::from(mlua::Error::RuntimeError(
            "C stack overflow\nstack traceback:\n\t[C]: in ?\n\t[C]: in function 'useFragment'".into(),
        ));
        assert_eq!(ShortMessage(&err).to_string(), "C stack overflow");
        assert!(err.to_string().contains("stack traceback:"));
    }

    #[test]
    fn test_plain_runtime_error_kind() {
        let err = FemtoError::from(mlua::Error::RuntimeError("boom".into()));
        assert_eq!(err.kind_name(), "RuntimeError");
        assert_eq!(ShortMessage(&err).to_string(), "boom");
    }
}
