// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The kinds of content file a site is made of.

use std::fmt;
use std::str::FromStr;

use crate::error::FemtoError;

/// Extension shared by every content file.
pub const FILE_EXTENSION: &str = "lua";

/// Role of a file below the app root.
///
/// Each kind lives in its own directory: `pages/`, `templates/`,
/// `fragments/` and `config/` (config keeps its singular name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// A page addressed by the request path.
    Page,
    /// A wrapper selected by a page with `useTemplate`.
    Template,
    /// A reusable piece rendered inline with `useFragment`.
    Fragment,
    /// A Lua file returning a table of named values.
    Config,
}

impl FileKind {
    /// All supported kinds.
    pub const ALL: [FileKind; 4] = [
        FileKind::Page,
        FileKind::Template,
        FileKind::Fragment,
        FileKind::Config,
    ];

    /// Directory segment below the app root.
    pub fn directory(self) -> &'static str {
        match self {
            FileKind::Page => "pages",
            FileKind::Template => "templates",
            FileKind::Fragment => "fragments",
            FileKind::Config => "config",
        }
    }

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        FILE_EXTENSION
    }

    /// Lower-case name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Page => "page",
            FileKind::Template => "template",
            FileKind::Fragment => "fragment",
            FileKind::Config => "config",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = FemtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s) || kind.directory().eq_ignore_ascii_case(s))
            .ok_or_else(|| FemtoError::UnsupportedKind(s.to_string()))
    }
}
