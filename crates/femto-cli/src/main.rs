// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use femto_cli::commands;
use femto_cli::config::{Config, CONFIG_FILE};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "femto")]
#[command(author = "Maravilla Labs")]
#[command(version)]
#[command(about = "Convention-over-configuration Lua page rendering", long_about = None)]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter site
    Init {
        /// Target directory (defaults to the current directory)
        dir: Option<PathBuf>,
    },
    /// Serve the site over HTTP
    Serve {
        /// Port to run the server on
        #[arg(short, long)]
        port: Option<u16>,
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },
    /// Render one request path to stdout
    Render {
        /// Request path, e.g. /blog/first
        path: String,
        /// Query string without the leading '?'
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Print the file a logical name resolves to
    Resolve {
        /// File kind: page, template, fragment or config
        kind: String,
        /// Logical name, e.g. blog/first
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with the specified log level
    let filter = EnvFilter::try_new(&cli.log_level)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { dir } => commands::init::run(dir).await,
        Commands::Serve { port, host } => {
            let config = Config::load_from(&cli.config)?;
            commands::serve::run(&config, host, port).await
        }
        Commands::Render { path, query } => {
            let config = Config::load_from(&cli.config)?;
            commands::render::run(&config, &path, &query).await
        }
        Commands::Resolve { kind, name } => {
            let config = Config::load_from(&cli.config)?;
            commands::resolve::run(&config, &kind, &name)
        }
    }
}
