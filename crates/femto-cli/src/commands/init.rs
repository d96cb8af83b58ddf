// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Site initialization command.

use console::style;
use include_dir::{include_dir, Dir, DirEntry};
use std::fs;
use std::path::{Path, PathBuf};

static STARTER_SITE: Dir = include_dir!("$CARGO_MANIFEST_DIR/starter");

/// Writes the starter site into `dir` (the current directory when `None`).
pub async fn run(dir: Option<PathBuf>) -> anyhow::Result<()> {
    let is_current_dir = dir.is_none();
    let target = match dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let written = write_starter(&target)?;
    print_success(&target, written, is_current_dir);
    Ok(())
}

/// Extracts the starter site below `target`, keeping files that already exist.
///
/// Returns the number of files written.
pub fn write_starter(target: &Path) -> anyhow::Result<usize> {
    if !target.exists() {
        fs::create_dir_all(target)?;
        tracing::info!("Created site directory: {}", target.display());
    }

    let mut written = 0;
    for entry in STARTER_SITE.entries() {
        written += extract_entry(entry, target)?;
    }
    Ok(written)
}

fn extract_entry(entry: &DirEntry, target: &Path) -> anyhow::Result<usize> {
    match entry {
        DirEntry::Dir(dir) => {
            fs::create_dir_all(target.join(dir.path()))?;
            let mut written = 0;
            for child in dir.entries() {
                written += extract_entry(child, target)?;
            }
            Ok(written)
        }
        DirEntry::File(file) => {
            let target_path = target.join(file.path());
            if target_path.exists() {
                tracing::warn!("Keeping existing file {}", target_path.display());
                return Ok(0);
            }

            // Ensure parent directory exists
            if let Some(parent) = target_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target_path, file.contents())?;
            Ok(1)
        }
    }
}

fn print_success(target: &Path, written: usize, is_current_dir: bool) {
    println!(
        "{} {} ({} files)",
        style("Created femto site:").green().bold(),
        target.display(),
        written
    );
    println!();
    println!("Next steps:");
    if !is_current_dir {
        println!("  cd {}", target.display());
    }
    println!("  femto serve");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_starter_has_reserved_pages() {
        let dir = tempdir().unwrap();
        let written = write_starter(dir.path()).unwrap();
        assert!(written > 0);
        for file in ["pages/index.lua", "pages/404.lua", "pages/500.lua", "femto.toml"] {
            assert!(dir.path().join(file).is_file(), "missing {}", file);
        }
    }

    #[test]
    fn test_existing_files_are_kept() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pages")).unwrap();
        fs::write(dir.path().join("pages/index.lua"), "echo('mine')").unwrap();

        write_starter(dir.path()).unwrap();
        let index = fs::read_to_string(dir.path().join("pages/index.lua")).unwrap();
        assert_eq!(index, "echo('mine')");
    }
}
