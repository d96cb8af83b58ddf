// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Server command.

use std::sync::Arc;

use console::style;

use crate::build_engine;
use crate::config::Config;
use crate::server::http::{create_server, AppState};

/// Serves the site, with `host` and `port` overriding `femto.toml`.
pub async fn run(config: &Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let site_root = config.site_root();
    if !site_root.join("pages").is_dir() {
        println!(
            "{} no pages/ directory in {}",
            style("Warning:").yellow().bold(),
            site_root.display()
        );
        println!("Run {} to create a starter site.", style("femto init").cyan());
        println!();
    }

    let engine = build_engine(config)?;
    let state = Arc::new(AppState::new(engine, &config.server.public_dir));

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let addr = format!("{}:{}", host, port);

    println!(
        "{} {}",
        style("Serving").cyan().bold(),
        style(site_root.display()).dim()
    );
    println!(
        "{} {}",
        style("Server running at").green().bold(),
        style(format!("http://{}", addr)).cyan().underlined()
    );
    println!("{}", style("Press Ctrl+C to stop").dim());

    create_server(&addr, state).await
}
