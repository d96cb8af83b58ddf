// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTTP server components.
//!
//! - `http`: router, shared state and the request handler that hands every
//!   non-static path to [`femto::Engine::launch`]

/// HTTP server implementation using Axum.
pub mod http;
