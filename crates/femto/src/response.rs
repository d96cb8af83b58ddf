// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Response returned to the host after a request.
//!
//! The engine never writes status lines itself. It returns the rendered
//! body together with an optional status override; the host decides how
//! to put that on the wire.

/// Status signalled when the requested page does not exist.
pub const STATUS_NOT_FOUND: u16 = 404;

/// Status signalled when rendering failed.
pub const STATUS_SERVER_ERROR: u16 = 500;

/// Rendered output of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status override; `None` means the host's default success status.
    pub status: Option<u16>,
    /// The composed body.
    pub body: String,
}

impl Response {
    /// A successful response without a status override.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: None,
            body: body.into(),
        }
    }

    /// A response carrying a status override.
    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            body: body.into(),
        }
    }

    /// The status to send, defaulting to 200.
    pub fn status_code(&self) -> u16 {
        self.status.unwrap_or(200)
    }

    /// Returns true if the not-found fallback ran.
    pub fn is_not_found(&self) -> bool {
        self.status == Some(STATUS_NOT_FOUND)
    }

    /// Returns true if the server-error fallback ran.
    pub fn is_server_error(&self) -> bool {
        self.status == Some(STATUS_SERVER_ERROR)
    }
}
