// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Site configuration.
//!
//! Configuration is loaded from `femto.toml` next to the site.
//!
//! # Example Configuration
//!
//! ```toml
//! [site]
//! root = "."
//! shared_config_cache = true
//!
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//! public_dir = "public"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "femto.toml";

/// Main configuration structure loaded from `femto.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Site settings.
    #[serde(default)]
    pub site: SiteConfig,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where the site lives and how it is rendered.
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Directory holding `pages/`, `templates/`, `fragments/` and `config/` (default: ".").
    #[serde(default = "default_root")]
    pub root: String,

    /// Keep loaded config files for the lifetime of the process (default: true).
    #[serde(default = "default_shared_config_cache")]
    pub shared_config_cache: bool,
}

/// HTTP server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server host (default: "127.0.0.1").
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port (default: 3000).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Static assets directory, served under `/public` (default: "public").
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
}

fn default_root() -> String {
    ".".to_string()
}

fn default_shared_config_cache() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_public_dir() -> String {
    "public".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            shared_config_cache: default_shared_config_cache(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_dir: default_public_dir(),
        }
    }
}

impl Config {
    /// Loads configuration from `femto.toml` in the current directory.
    ///
    /// If no configuration file exists, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be parsed.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Loads configuration from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        // A relative site root is relative to the config file, not the working directory
        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if Path::new(&config.site.root).is_relative() {
                config.site.root = base.join(&config.site.root).to_string_lossy().into_owned();
            }
            if Path::new(&config.server.public_dir).is_relative() {
                config.server.public_dir = base
                    .join(&config.server.public_dir)
                    .to_string_lossy()
                    .into_owned();
            }
        }
        Ok(config)
    }

    /// The site root as a path.
    pub fn site_root(&self) -> PathBuf {
        PathBuf::from(&self.site.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.site.root, ".");
        assert!(config.site.shared_config_cache);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.public_dir, "public");
    }

    #[test]
    fn test_partial_file_and_relative_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[site]\nroot = \"site\"\n\n[server]\nport = 8080\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.site_root(), dir.path().join("site"));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(PathBuf::from(&config.server.public_dir), dir.path().join("public"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[server]\nport = \"not a number\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
