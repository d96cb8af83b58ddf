// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Request abstraction and URI normalization.
//!
//! Hosts (the HTTP server, a one-shot CLI render, tests) hand the engine a
//! [`Request`] made of the raw request path and raw query string. The
//! engine derives a [`RequestUri`] from it: the logical page name and the
//! list of path segments pages can read with `getUrlPart(n)`.

/// Logical page name used for the site root.
pub const INDEX_PAGE: &str = "index";

/// A platform-agnostic request.
///
/// # Example
///
/// ```rust
/// use femto::Request;
///
/// let request = Request::new("/blog/hello?draft=1").with_query("draft=1");
/// assert_eq!(request.uri().page_name(), "blog/hello");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// The raw request path, possibly still carrying the query string.
    pub path: String,

    /// The raw query string, without the leading `?`.
    pub query: String,
}

impl Request {
    /// Creates a request for the given raw path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: String::new(),
        }
    }

    /// Sets the raw query string.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Normalizes the request path.
    pub fn uri(&self) -> RequestUri {
        RequestUri::parse(&self.path, &self.query)
    }
}

/// A normalized request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUri {
    path: String,
    parts: Vec<String>,
}

impl RequestUri {
    /// Normalizes a raw request path.
    ///
    /// The `?query` suffix is removed (anything after a stray `?` as well),
    /// then leading and trailing slashes are trimmed.
    pub fn parse(raw_path: &str, raw_query: &str) -> Self {
        let without_query = if raw_query.is_empty() {
            raw_path
        } else {
            raw_path
                .strip_suffix(raw_query)
                .and_then(|rest| rest.strip_suffix('?'))
                .unwrap_or(raw_path)
        };
        let without_query = without_query
            .split_once('?')
            .map_or(without_query, |(path, _)| path);

        let path = without_query.trim_matches('/').to_string();
        let parts = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        Self { path, parts }
    }

    /// The normalized path, without surrounding slashes.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The logical page name: the normalized path, or `"index"` for the root.
    pub fn page_name(&self) -> &str {
        if self.path.is_empty() {
            INDEX_PAGE
        } else {
            &self.path
        }
    }

    /// Non-empty path segments in order.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// The n-th path segment, 1-indexed. `None` when out of range.
    pub fn url_part(&self, n: i64) -> Option<&str> {
        let index = usize::try_from(n).ok()?.checked_sub(1)?;
        self.parts.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_maps_to_index() {
        for raw in ["/", "", "//", "/?a=1"] {
            let uri = RequestUri::parse(raw, "a=1");
            assert_eq!(uri.page_name(), "index", "raw path {:?}", raw);
            assert!(uri.parts().is_empty());
        }
    }

    #[test]
    fn test_query_suffix_removed() {
        let uri = RequestUri::parse("/blog/post/?page=2", "page=2");
        assert_eq!(uri.page_name(), "blog/post");

        let stray = RequestUri::parse("/about?", "");
        assert_eq!(stray.page_name(), "about");
    }

    #[test]
    fn test_url_parts() {
        let uri = RequestUri::parse("/a/b", "");
        assert_eq!(uri.url_part(1), Some("a"));
        assert_eq!(uri.url_part(2), Some("b"));
        assert_eq!(uri.url_part(5), None);
        assert_eq!(uri.url_part(0), None);
        assert_eq!(uri.url_part(-1), None);
    }

    #[test]
    fn test_empty_segments_skipped() {
        let uri = RequestUri::parse("//docs//intro/", "");
        assert_eq!(uri.page_name(), "docs//intro");
        assert_eq!(uri.parts(), &["docs".to_string(), "intro".to_string()]);
        assert_eq!(uri.url_part(2), Some("intro"));
    }
}
