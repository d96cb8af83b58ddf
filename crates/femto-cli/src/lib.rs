// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! femto CLI library.
//!
//! This crate provides the command-line interface and HTTP host for the
//! femto rendering engine.
//!
//! # Usage
//!
//! This crate is primarily used through the `femto` binary:
//!
//! ```bash
//! femto init my-site              # Create a starter site
//! femto serve                     # Serve the site over HTTP
//! femto render /blog/first        # Render one path to stdout
//! femto resolve fragment nav      # Show where a name resolves to
//! ```
//!
//! # Configuration
//!
//! Sites are configured via `femto.toml`.

/// CLI commands (init, serve, render, resolve).
pub mod commands;
/// Site configuration from `femto.toml`.
pub mod config;
/// HTTP server.
pub mod server;

use femto::Engine;

use crate::config::Config;

/// Builds an engine for the site described by `config`.
pub fn build_engine(config: &Config) -> anyhow::Result<Engine> {
    let mut engine = Engine::with_filesystem();
    if config.site.shared_config_cache {
        engine = engine.with_shared_config_cache();
    }
    engine.set_app_root(config.site_root())?;
    Ok(engine)
}
