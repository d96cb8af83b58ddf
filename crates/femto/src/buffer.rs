// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Stack of in-memory output buffers.
//!
//! Text emitted by content files always goes to the top buffer. The
//! composition engine pushes a buffer when a phase starts and pops it to
//! capture the phase's output.

/// A stack of text buffers.
#[derive(Debug, Default)]
pub struct OutputStack {
    buffers: Vec<String>,
}

impl OutputStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new, empty buffer on top of the stack.
    pub fn push(&mut self) {
        self.buffers.push(String::new());
    }

    /// Closes the top buffer and returns its contents.
    ///
    /// Popping an empty stack yields an empty string.
    pub fn pop(&mut self) -> String {
        self.buffers.pop().unwrap_or_default()
    }

    /// Appends text to the top buffer.
    ///
    /// With no open buffer the text is dropped.
    pub fn write(&mut self, text: &str) {
        match self.buffers.last_mut() {
            Some(buffer) => buffer.push_str(text),
            None => tracing::warn!("Discarding {} bytes of output: no open buffer", text.len()),
        }
    }

    /// Number of open buffers.
    pub fn depth(&self) -> usize {
        self.buffers.len()
    }

    /// Discards every buffer above `depth`, along with its contents.
    pub fn truncate(&mut self, depth: usize) {
        self.buffers.truncate(depth);
    }
}
