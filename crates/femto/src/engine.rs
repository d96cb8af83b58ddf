// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The femto engine: request in, rendered response out.
//!
//! This module provides the [`Engine`] type, the long-lived half of the
//! pipeline. It holds what every request shares (the source store, the app
//! root, the optional shared config cache) and builds a fresh
//! [`RequestScope`] for each request.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use femto::{Engine, FileSystemStore, Request};
//!
//! let engine = Engine::new(FileSystemStore::new());
//! engine.set_app_root("./site")?;
//!
//! let response = engine.launch(&Request::new("/about"))?;
//! println!("{} {}", response.status_code(), response.body);
//! ```
//!
//! # Error Fallback
//!
//! [`Engine::launch`] wraps the render in a small state machine:
//!
//! - **Normal**: render the requested page.
//! - **NotFound**: the page does not exist. Status 404, the template
//!   selection is reset and page `404` is rendered instead.
//! - **ServerError**: anything else failed. Partial output is dropped,
//!   status 500, the template selection is reset and page `500` is
//!   rendered with the failure bound to `e` (`e.kind`, `e.message`).
//!
//! Failures while rendering page `404` or `500` are logged and end in an
//! empty body; they never trigger another fallback.
//!
//! # Thread Safety
//!
//! The engine is `Send + Sync`. Request scopes are not: each one owns a
//! single-threaded Lua state and lives only for its request.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use serde_json::json;

use crate::config::SharedConfigCache;
use crate::error::{FemtoError, Result, ShortMessage};
use crate::render::RequestScope;
use crate::request::Request;
use crate::resolver::PathResolver;
use crate::response::{Response, STATUS_NOT_FOUND, STATUS_SERVER_ERROR};
use crate::runtime::Vars;
use crate::store::SourceStore;

/// Page rendered when the requested page does not exist.
pub const NOT_FOUND_PAGE: &str = "404";

/// Page rendered when rendering failed.
pub const SERVER_ERROR_PAGE: &str = "500";

/// Name of the variable carrying the failure into the server error page.
pub const ERROR_VARIABLE: &str = "e";

/// Main femto engine.
///
/// # Examples
///
/// ```rust
/// use femto::{Engine, MemoryStore, Request};
///
/// let store = MemoryStore::new();
/// store.add_source("/site/pages/index.lua", "echo('<h1>Home</h1>')");
///
/// let engine = Engine::new(store);
/// engine.set_app_root("/site").unwrap();
///
/// let response = engine.launch(&Request::new("/")).unwrap();
/// assert_eq!(response.body, "<h1>Home</h1>");
/// assert_eq!(response.status, None);
/// ```
pub struct Engine {
    store: Arc<dyn SourceStore>,
    app_root: OnceLock<PathBuf>,
    shared_config: Option<SharedConfigCache>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("app_root", &self.app_root.get())
            .field("shared_config", &self.shared_config)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an engine reading content through `store`.
    ///
    /// The app root must be set with [`set_app_root`](Self::set_app_root)
    /// before the first request.
    pub fn new<S: SourceStore>(store: S) -> Self {
        Self {
            store: Arc::new(store),
            app_root: OnceLock::new(),
            shared_config: None,
        }
    }

    /// Creates an engine reading content from disk.
    #[cfg(feature = "filesystem")]
    pub fn with_filesystem() -> Self {
        Self::new(crate::store::FileSystemStore::new())
    }

    /// Keeps loaded config types for the lifetime of the engine.
    ///
    /// Without this every request loads its config files again.
    pub fn with_shared_config_cache(mut self) -> Self {
        self.shared_config = Some(SharedConfigCache::new());
        self
    }

    /// The shared config cache, if enabled.
    pub fn shared_config_cache(&self) -> Option<&SharedConfigCache> {
        self.shared_config.as_ref()
    }

    /// Sets the directory holding `pages/`, `templates/`, `fragments/` and `config/`.
    ///
    /// # Errors
    ///
    /// Returns [`FemtoError::AppRootAlreadySet`] on a second call.
    pub fn set_app_root<P: AsRef<Path>>(&self, root: P) -> Result<()> {
        let root = root.as_ref().to_path_buf();
        self.app_root
            .set(root)
            .map_err(|_| FemtoError::AppRootAlreadySet(self.app_root.get().cloned().unwrap_or_default()))?;
        tracing::info!("App root set to {}", root_display(self.app_root.get()));
        Ok(())
    }

    /// The configured app root.
    pub fn app_root(&self) -> Option<&Path> {
        self.app_root.get().map(PathBuf::as_path)
    }

    /// A resolver for the configured app root.
    ///
    /// # Errors
    ///
    /// Returns [`FemtoError::AppRootNotSet`] before the app root is set.
    pub fn resolver(&self) -> Result<PathResolver> {
        self.app_root()
            .map(PathResolver::new)
            .ok_or(FemtoError::AppRootNotSet)
    }

    /// Builds a fresh scope for `request`.
    pub fn scope(&self, request: &Request) -> Result<RequestScope> {
        let resolver = self.resolver()?;
        RequestScope::new(
            resolver,
            self.store.clone(),
            self.shared_config.clone(),
            request.uri(),
        )
    }

    /// Renders `request`, falling back to the `404` and `500` pages.
    ///
    /// # Errors
    ///
    /// Only fails when the request can not start: the app root is not set
    /// or the Lua runtime can not be created. Render failures are turned
    /// into 404/500 responses.
    pub fn launch(&self, request: &Request) -> Result<Response> {
        let scope = self.scope(request)?;
        let page = scope.uri().page_name().to_string();
        tracing::debug!("Rendering page '{}' for {}", page, request.path);

        let err = match scope.render_page(&page, None) {
            Ok(body) => return Ok(Response::ok(body)),
            Err(err) => err,
        };

        if err.is_page_not_found() {
            tracing::info!("{}", err);
            scope.reset();
            let body = scope.render_page(NOT_FOUND_PAGE, None).unwrap_or_else(|fallback_err| {
                tracing::warn!("Not-found page failed to render: {}", fallback_err);
                String::new()
            });
            return Ok(Response::with_status(STATUS_NOT_FOUND, body));
        }

        tracing::error!("Rendering page '{}' failed: {}", page, err);
        scope.reset();
        let vars = error_vars(&err);
        let body = scope
            .render_page(SERVER_ERROR_PAGE, Some(&vars))
            .unwrap_or_else(|fallback_err| {
                tracing::error!("Server error page failed to render: {}", fallback_err);
                String::new()
            });
        Ok(Response::with_status(STATUS_SERVER_ERROR, body))
    }
}

fn root_display(root: Option<&PathBuf>) -> String {
    root.map(|r| r.display().to_string()).unwrap_or_default()
}

/// Builds the variables handed to the server error page.
fn error_vars(err: &FemtoError) -> Vars {
    let mut vars = Vars::new();
    vars.insert(
        ERROR_VARIABLE.to_string(),
        json!({
            "kind": err.kind_name(),
            "message": ShortMessage(err).to_string(),
            "detail": err.to_string(),
        }),
    );
    vars
}
