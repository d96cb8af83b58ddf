// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Template composition for one request.
//!
//! A [`RequestScope`] owns everything a single request needs: its own Lua
//! state with the injected API, the [`RenderContext`], the output buffer
//! stack, the per-request config cache and the normalized URI. Nothing in
//! it is shared with other requests.
//!
//! # Phases
//!
//! ```text
//! push buffer ─► run page ─┬─ no template ─► pop ─► output
//!                          └─ template ───► pop into buffered_page_output
//!                                           push ─► run template ─► pop ─► output
//! ```
//!
//! When a phase fails every buffer it opened is dropped, so partially
//! rendered text never reaches the response.
//!
//! # Config loading
//!
//! With a [`SharedConfigCache`] a loaded config outlives the request that
//! loaded it. Such configs therefore run in a detached scope: a separate Lua
//! state with an empty URI, no page and no open output buffer. A config file
//! can not see which request triggered its load.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use mlua::Lua;
use serde_json::Value as JsonValue;

use crate::api::register_api;
use crate::buffer::OutputStack;
use crate::config::{ConfigCache, ConfigEntry, SharedConfigCache};
use crate::context::RenderContext;
use crate::error::{FemtoError, Result};
use crate::extensions::register_json_module;
use crate::kind::FileKind;
use crate::loader::load;
use crate::request::RequestUri;
use crate::resolver::PathResolver;
use crate::runtime::{sandbox_lua, Vars};
use crate::store::SourceStore;

/// Request state shared between the scope and the injected API closures.
pub(crate) struct ScopeInner {
    resolver: PathResolver,
    store: Arc<dyn SourceStore>,
    shared_config: Option<SharedConfigCache>,
    uri: RequestUri,
    context: RefCell<RenderContext>,
    output: RefCell<OutputStack>,
    config: RefCell<ConfigCache>,
    detached: bool,
}

impl ScopeInner {
    pub(crate) fn uri(&self) -> &RequestUri {
        &self.uri
    }

    pub(crate) fn context(&self) -> RenderContext {
        self.context.borrow().clone()
    }

    pub(crate) fn write(&self, text: &str) {
        self.output.borrow_mut().write(text);
    }

    pub(crate) fn use_template(&self, name: String, vars: Option<Vars>) {
        tracing::debug!("Page '{}' selected template '{}'", self.context.borrow().page, name);
        self.context.borrow_mut().use_template(name, vars);
    }

    /// Renders a fragment into the active buffer.
    pub(crate) fn use_fragment(&self, lua: &Lua, name: &str, vars: Option<&Vars>) -> Result<()> {
        let file = self.resolver.resolve(name, FileKind::Fragment)?;
        load(lua, self.store.as_ref(), &file, vars)?;
        Ok(())
    }

    /// Emits the captured page output into the active buffer.
    pub(crate) fn template_content(&self) -> Result<()> {
        let content = {
            let context = self.context.borrow();
            if context.template.is_none() {
                return Err(FemtoError::NoTemplateSet);
            }
            context.buffered_page_output.clone().unwrap_or_default()
        };
        self.write(&content);
        Ok(())
    }

    /// Looks up `key` in config `config_type`, loading it on first use.
    pub(crate) fn get_config(&self, lua: &Lua, config_type: &str, key: &str) -> Result<JsonValue> {
        let entry = self.config_entry(lua, config_type)?;
        entry.get(key).cloned()
    }

    fn config_entry(&self, lua: &Lua, config_type: &str) -> Result<Arc<ConfigEntry>> {
        if let Some(entry) = self.config.borrow().get(config_type) {
            return Ok(entry);
        }

        if let Some(entry) = self.shared_config.as_ref().and_then(|shared| shared.get(config_type)) {
            tracing::debug!("Config '{}' served from shared cache", config_type);
            return Ok(self.config.borrow_mut().insert(entry));
        }

        let entry = match &self.shared_config {
            Some(shared) if !self.detached => {
                let scope = RequestScope::detached(self.resolver.clone(), self.store.clone(), shared.clone())?;
                shared.publish(scope.inner.load_config(&scope.lua, config_type)?)
            }
            Some(shared) => shared.publish(self.load_config(lua, config_type)?),
            None => self.load_config(lua, config_type)?,
        };
        Ok(self.config.borrow_mut().insert(entry))
    }

    fn load_config(&self, lua: &Lua, config_type: &str) -> Result<Arc<ConfigEntry>> {
        // No borrow is held while the config file runs: it may call getConfig itself.
        let file = self.resolver.resolve(config_type, FileKind::Config)?;
        let value = load(lua, self.store.as_ref(), &file, None)?;
        let entry = ConfigEntry::from_lua_value(lua, config_type, file.absolute_path(), value)?;
        tracing::debug!("Loaded config '{}' ({} keys)", config_type, entry.values().len());
        Ok(Arc::new(entry))
    }

    fn render_page(&self, lua: &Lua, name: &str, vars: Option<&Vars>) -> Result<String> {
        let depth = self.output.borrow().depth();
        self.context.borrow_mut().page = name.to_string();
        self.output.borrow_mut().push();

        let result = self.compose(lua, name, vars);
        if result.is_err() {
            self.output.borrow_mut().truncate(depth);
        }
        result
    }

    fn compose(&self, lua: &Lua, name: &str, vars: Option<&Vars>) -> Result<String> {
        let page = self.resolver.resolve(name, FileKind::Page)?;
        load(lua, self.store.as_ref(), &page, vars)?;

        let selected = {
            let context = self.context.borrow();
            context
                .template
                .clone()
                .map(|template| (template, context.template_vars.clone()))
        };
        let Some((template, template_vars)) = selected else {
            return Ok(self.output.borrow_mut().pop());
        };

        let page_output = self.output.borrow_mut().pop();
        self.context.borrow_mut().buffered_page_output = Some(page_output);
        self.output.borrow_mut().push();

        let file = self.resolver.resolve(&template, FileKind::Template)?;
        load(lua, self.store.as_ref(), &file, template_vars.as_ref())?;

        Ok(self.output.borrow_mut().pop())
    }
}

/// Everything one request renders with.
///
/// Created by [`Engine::scope`](crate::Engine::scope) and
/// [`Engine::launch`](crate::Engine::launch); dropped when the request ends.
pub struct RequestScope {
    lua: Lua,
    inner: Rc<ScopeInner>,
}

impl RequestScope {
    /// Creates a scope with a fresh, sandboxed Lua state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Lua runtime fails to initialize.
    pub fn new(
        resolver: PathResolver,
        store: Arc<dyn SourceStore>,
        shared_config: Option<SharedConfigCache>,
        uri: RequestUri,
    ) -> Result<Self> {
        Self::build(resolver, store, shared_config, uri, false)
    }

    /// A scope for loading configs into the shared cache, free of request data.
    fn detached(
        resolver: PathResolver,
        store: Arc<dyn SourceStore>,
        shared_config: SharedConfigCache,
    ) -> Result<Self> {
        tracing::debug!("Loading shared config in a detached scope");
        Self::build(resolver, store, Some(shared_config), RequestUri::parse("", ""), true)
    }

    fn build(
        resolver: PathResolver,
        store: Arc<dyn SourceStore>,
        shared_config: Option<SharedConfigCache>,
        uri: RequestUri,
        detached: bool,
    ) -> Result<Self> {
        let lua = Lua::new();
        sandbox_lua(&lua)?;
        register_json_module(&lua)?;

        let inner = Rc::new(ScopeInner {
            resolver,
            store,
            shared_config,
            uri,
            context: RefCell::new(RenderContext::new()),
            output: RefCell::new(OutputStack::new()),
            config: RefCell::new(ConfigCache::new()),
            detached,
        });
        register_api(&lua, inner.clone())?;

        Ok(Self { lua, inner })
    }

    /// Renders page `name`, wrapped in its template if it selects one.
    ///
    /// On failure nothing the page or template emitted is kept.
    pub fn render_page(&self, name: &str, vars: Option<&Vars>) -> Result<String> {
        self.inner.render_page(&self.lua, name, vars)
    }

    /// Renders fragment `name` on its own and returns its output.
    pub fn render_fragment(&self, name: &str, vars: Option<&Vars>) -> Result<String> {
        let depth = self.inner.output.borrow().depth();
        self.inner.output.borrow_mut().push();
        match self.inner.use_fragment(&self.lua, name, vars) {
            Ok(()) => Ok(self.inner.output.borrow_mut().pop()),
            Err(e) => {
                self.inner.output.borrow_mut().truncate(depth);
                Err(e)
            }
        }
    }

    /// Looks up a config value, loading and caching the config type once.
    pub fn get_config(&self, config_type: &str, key: &str) -> Result<JsonValue> {
        self.inner.get_config(&self.lua, config_type, key)
    }

    /// Clears the template selection so it does not carry into a fallback render.
    pub fn reset(&self) {
        self.inner.context.borrow_mut().reset();
    }

    /// A snapshot of the render context.
    pub fn context(&self) -> RenderContext {
        self.inner.context()
    }

    /// The normalized request URI.
    pub fn uri(&self) -> &RequestUri {
        self.inner.uri()
    }

    /// Number of config types cached by this request.
    pub fn cached_config_types(&self) -> usize {
        self.inner.config.borrow().len()
    }

    /// The Lua state content files run in.
    pub fn lua(&self) -> &Lua {
        &self.lua
    }
}
