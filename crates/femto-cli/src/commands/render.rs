// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! One-shot render command.
//!
//! Runs a single request through the same pipeline the server uses and
//! writes the body to stdout. A 404 or 500 status is reported on stderr so
//! the body can be piped cleanly.

use std::io::Write;

use console::style;
use femto::{Request, Response};

use crate::build_engine;
use crate::config::Config;

/// Renders `path` (with `query`) for the site described by `config`.
pub fn render(config: &Config, path: &str, query: &str) -> anyhow::Result<Response> {
    let engine = build_engine(config)?;
    let request = Request::new(path).with_query(query);
    Ok(engine.launch(&request)?)
}

/// Renders `path` and prints the body.
pub async fn run(config: &Config, path: &str, query: &str) -> anyhow::Result<()> {
    let config = config.clone();
    let (path, query) = (path.to_string(), query.to_string());

    let response = tokio::task::spawn_blocking(move || render(&config, &path, &query)).await??;

    if let Some(status) = response.status {
        eprintln!("{} {}", style("Status:").yellow().bold(), status);
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(response.body.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn site_config(root: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.site.root = root.to_string_lossy().into_owned();
        config
    }

    #[test]
    fn test_render_page_and_fallback() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pages")).unwrap();
        fs::write(dir.path().join("pages/index.lua"), "echo('home ', getUrlPart(1) or '-')").unwrap();
        fs::write(dir.path().join("pages/404.lua"), "echo('missing ', getUrlPart(1))").unwrap();

        let config = site_config(dir.path());

        let home = render(&config, "/", "").unwrap();
        assert_eq!(home.status, None);
        assert_eq!(home.body, "home -");

        let missing = render(&config, "/nope", "x=1").unwrap();
        assert_eq!(missing.status, Some(404));
        assert_eq!(missing.body, "missing nope");
    }
}
