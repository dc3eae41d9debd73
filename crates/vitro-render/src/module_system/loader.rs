// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Vitro Contributors

//! Module loading: dependencies, message merges, entry execution.

use crate::context::ExecutionContext;
use crate::error::{RenderError, Result};
use crate::module_system::cache::ModuleScope;
use crate::module_system::executor;
use std::rc::Rc;
use tracing::debug;
use vitro_script::Value;

/// Loads a named module, returning its memoized export.
///
/// The first load walks declared dependencies in order (for their side
/// effects), merges the module's messages into the request store, then
/// executes the entry file in a fresh module scope. A module that is
/// already on the loading stack fails fast instead of recursing.
pub fn load_module(context: &Rc<ExecutionContext>, name: &str) -> Result<Value> {
    if let Some(exports) = context.memoized(name) {
        return Ok(exports);
    }

    if context.module(name).is_none() {
        return Err(RenderError::UnknownModule(name.to_string()));
    }

    if context.is_loading(name) {
        return Err(RenderError::CircularDependency(name.to_string()));
    }

    context.push_loading(name);
    let result = load_fresh(context, name);
    context.pop_loading();
    result
}

fn load_fresh(context: &Rc<ExecutionContext>, name: &str) -> Result<Value> {
    debug!(module = name, "loading module");

    // The definition outlives the recursion below; the registry itself
    // is never mutated during a request.
    let definition = context
        .module(name)
        .ok_or_else(|| RenderError::UnknownModule(name.to_string()))?;

    for dependency in &definition.dependencies {
        load_module(context, dependency)?;
    }

    if let Some(catalog) = &definition.messages {
        context.merge_messages(catalog)?;
    }

    let scope = ModuleScope::new(name, definition.files.clone());
    let exports = executor::resolve_file(context, &scope, &definition.entry)?;

    context.memoize(name, exports.clone());
    Ok(exports)
}
