// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! # femto
//!
//! Convention-over-configuration page rendering for flat Lua file trees.
//!
//! A site is a directory with four subdirectories:
//!
//! ```text
//! site/
//! ├── pages/       index.lua, about.lua, blog/first.lua, 404.lua, 500.lua
//! ├── templates/   layout.lua
//! ├── fragments/   nav.lua
//! └── config/      site.lua
//! ```
//!
//! A request path maps to one page file. The page runs in a sandboxed Lua
//! state, writes its output with `echo`, and may ask to be wrapped in a
//! template with `useTemplate`. Missing pages fall back to `pages/404.lua`,
//! failures to `pages/500.lua`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use femto::{Engine, FileSystemStore, Request};
//!
//! let engine = Engine::new(FileSystemStore::new()).with_shared_config_cache();
//! engine.set_app_root("./site")?;
//!
//! let response = engine.launch(&Request::new("/blog/first"))?;
//! assert_eq!(response.status_code(), 200);
//! ```
//!
//! ## A page and its template
//!
//! ```lua
//! -- pages/about.lua
//! useTemplate("layout", { title = "About" })
//! echo("<p>", escape(getConfig("site", "tagline")), "</p>")
//!
//! -- templates/layout.lua
//! echo("<html><head><title>", escape(title), "</title></head><body>")
//! useFragment("nav", { current = femto.page })
//! templateContent()
//! echo("</body></html>")
//! ```

/// The API injected into content files.
pub mod api;
/// Output buffer stack.
pub mod buffer;
/// Config values and their caches.
pub mod config;
/// Per-request render state.
pub mod context;
/// Main engine and error fallback.
pub mod engine;
/// Error types.
pub mod error;
/// Lua runtime extensions.
pub mod extensions;
/// Content file kinds.
pub mod kind;
/// Loading resolved files with injected variables.
pub mod loader;
/// Template composition for a single request.
pub mod render;
/// Request abstraction and URI normalization.
pub mod request;
/// Name to path resolution.
pub mod resolver;
/// Response returned to the host.
pub mod response;
/// Execution of content files.
pub mod runtime;
/// Content file sources (filesystem, memory).
pub mod store;

pub use config::{ConfigCache, ConfigEntry, SharedConfigCache};
pub use context::RenderContext;
pub use engine::{Engine, ERROR_VARIABLE, NOT_FOUND_PAGE, SERVER_ERROR_PAGE};
pub use error::*;
pub use extensions::register_json_module;
pub use kind::{FileKind, FILE_EXTENSION};
pub use loader::load;
pub use render::RequestScope;
pub use request::{Request, RequestUri, INDEX_PAGE};
pub use resolver::{sanitize_name, PathResolver, ResolvedPath};
pub use response::Response;
pub use runtime::{Runtime, Vars};
#[cfg(feature = "filesystem")]
pub use store::FileSystemStore;
pub use store::{MemoryStore, SourceStore};

// Re-export mlua value
pub use mlua::Value;
