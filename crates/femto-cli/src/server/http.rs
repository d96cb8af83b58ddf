// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTTP server for femto sites.
//!
//! Static files are served from the public directory under `/public`.
//! Every other path goes through [`Engine::launch`] on the blocking thread
//! pool, since each render owns a single-threaded Lua state.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Router,
};
use femto::api::escape_html;
use femto::{Engine, Request};
use tower_http::services::ServeDir;

/// Shared application state for the server.
pub struct AppState {
    /// The engine every request renders with.
    pub engine: Engine,
    /// Directory served under `/public`.
    pub public_dir: PathBuf,
}

impl AppState {
    /// Creates the state for `engine`, serving assets from `public_dir`.
    pub fn new(engine: Engine, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            public_dir: public_dir.into(),
        }
    }
}

/// Builds the axum router for a site.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest_service("/public", ServeDir::new(&state.public_dir))
        .fallback(fallback_handler)
        .with_state(state)
}

/// Binds `addr` and serves the site until the process stops.
pub async fn create_server(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn fallback_handler(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let request = Request::new(uri.path()).with_query(uri.query().unwrap_or_default());
    tracing::debug!("Handling {}", uri);

    let rendered = tokio::task::spawn_blocking(move || state.engine.launch(&request)).await;
    match rendered {
        Ok(Ok(response)) => femto_response_to_http(response),
        Ok(Err(e)) => {
            tracing::error!("Request {} could not start: {}", uri, e);
            error_page(&e.to_string())
        }
        Err(e) => {
            tracing::error!("Render task for {} failed: {}", uri, e);
            error_page("Render task failed")
        }
    }
}

fn femto_response_to_http(response: femto::Response) -> Response {
    let status = StatusCode::from_u16(response.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Html(response.body)).into_response()
}

// Only reached when the engine itself is misconfigured; site errors render pages/500.lua
fn error_page(message: &str) -> Response {
    let body = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Error</title>
    <style>
        body {{ font-family: system-ui, sans-serif; padding: 2rem; background: #f5f5f5; color: #333; }}
        .error {{ background: white; border-left: 4px solid #e53e3e; padding: 1rem; border-radius: 4px; }}
    </style>
</head>
<body>
    <h1>Error</h1>
    <div class="error"><pre>{}</pre></div>
</body>
</html>"#,
        escape_html(message)
    );
    (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
}
