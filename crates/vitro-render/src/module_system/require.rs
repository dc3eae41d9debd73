// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Vitro Contributors

//! The require() function injected into executed files.

use crate::context::ExecutionContext;
use crate::error::{RenderError, Result};
use crate::module_system::cache::ModuleScope;
use crate::module_system::{builtins, executor, loader, resolver};
use std::rc::Rc;
use vitro_script::{Callable, Value};

/// Builds the `require` function for one file, closed over the request
/// context, the module scope, and the requiring file's path.
pub fn bind_require(
    context: &Rc<ExecutionContext>,
    scope: &Rc<ModuleScope>,
    current_path: &str,
) -> Value {
    let context = Rc::clone(context);
    let scope = Rc::clone(scope);
    let current_path = current_path.to_string();

    Callable::native("require", move |args| {
        let spec = args.first().map(Value::to_display_string).unwrap_or_default();
        require_from(&context, &scope, &current_path, &spec).map_err(|e| {
            // The engine only carries a message; stash the typed error
            // so the executor can restore its kind after unwinding
            let message = e.to_string();
            context.stash_require_failure(e);
            vitro_script::Error::Host(message)
        })
    })
}

/// Resolves one require specifier. Relative specifiers must name a file
/// in the current module; bare names resolve to a built-in library
/// first, then to a registry module.
pub fn require_from(
    context: &Rc<ExecutionContext>,
    scope: &Rc<ModuleScope>,
    current_path: &str,
    spec: &str,
) -> Result<Value> {
    if let Some(path) = resolver::resolve_relative(spec, current_path) {
        if !scope.has_file(&path) {
            return Err(RenderError::UnknownFile {
                path,
                module: scope.name().to_string(),
            });
        }
        return executor::resolve_file(context, scope, &path);
    }

    if builtins::is_builtin(spec) {
        // Built-ins are seeded into the memo at context construction
        if let Some(exports) = context.memoized(spec) {
            return Ok(exports);
        }
    }

    if context.module(spec).is_some() {
        return loader::load_module(context, spec);
    }

    Err(RenderError::UnknownModule(spec.to_string()))
}
