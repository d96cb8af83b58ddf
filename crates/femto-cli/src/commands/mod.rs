// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! CLI command implementations.
//!
//! - `init`: Write a starter site
//! - `serve`: Serve a site over HTTP
//! - `render`: Render one request path to stdout
//! - `resolve`: Show which file a logical name maps to

/// Starter site command.
pub mod init;
/// One-shot render command.
pub mod render;
/// Name resolution command.
pub mod resolve;
/// HTTP server command.
pub mod serve;
