// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Name resolution command.

use console::style;
use femto::{PathResolver, ResolvedPath};

use crate::config::Config;

/// Resolves `name` of kind `kind` below the configured site root.
pub fn resolve(config: &Config, kind: &str, name: &str) -> anyhow::Result<ResolvedPath> {
    let resolver = PathResolver::new(config.site_root());
    Ok(resolver.resolve_str(name, kind)?)
}

/// Prints the resolved path, noting when the file does not exist.
pub fn run(config: &Config, kind: &str, name: &str) -> anyhow::Result<()> {
    let resolved = resolve(config, kind, name)?;
    println!("{}", resolved.display_path());
    if !resolved.absolute_path().is_file() {
        eprintln!("{} file does not exist", style("Note:").yellow());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use femto::FileKind;
    use std::path::Path;

    #[test]
    fn test_resolve_kinds() {
        let mut config = Config::default();
        config.site.root = "/srv/site".to_string();

        let fragment = resolve(&config, "fragment", "nav").unwrap();
        assert_eq!(fragment.kind(), FileKind::Fragment);
        assert_eq!(fragment.absolute_path(), Path::new("/srv/site/fragments/nav.lua"));

        let page = resolve(&config, "pages", "../../etc/passwd").unwrap();
        assert_eq!(page.absolute_path(), Path::new("/srv/site/pages/etc/passwd.lua"));

        let err = resolve(&config, "layout", "main").unwrap_err();
        assert!(err.to_string().contains("Unsupported file kind"));
    }
}
