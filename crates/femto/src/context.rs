// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Per-request render state.

use crate::runtime::Vars;

/// Mutable state of one request's render.
///
/// Page files change it through `useTemplate`; the composition engine
/// fills in the captured page output before the template runs.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Logical name of the page being rendered.
    pub page: String,
    /// Template selected by the page, if any.
    pub template: Option<String>,
    /// Variables for the selected template.
    pub template_vars: Option<Vars>,
    /// The page's output, captured once a template takes over.
    pub buffered_page_output: Option<String>,
}

impl RenderContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the template a page wants to be wrapped in.
    ///
    /// A later call replaces an earlier one.
    pub fn use_template(&mut self, name: impl Into<String>, vars: Option<Vars>) {
        self.template = Some(name.into());
        self.template_vars = vars;
    }

    /// Forgets any template selection and captured page output.
    pub fn reset(&mut self) {
        self.template = None;
        self.template_vars = None;
        self.buffered_page_output = None;
    }
}
