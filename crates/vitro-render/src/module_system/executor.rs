// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Vitro Contributors

//! File execution: runs one virtual file and memoizes its export.

use crate::bundle::VirtualFile;
use crate::context::ExecutionContext;
use crate::error::{RenderError, Result};
use crate::markup;
use crate::module_system::cache::ModuleScope;
use crate::module_system::require::bind_require;
use std::rc::Rc;
use tracing::trace;
use vitro_script::{Engine, Value};

/// Extension marking a component-definition file.
const COMPONENT_EXTENSION: &str = ".comp";

/// Resolves a file within a module to its export, executing it on the
/// first visit. Repeat visits return the identical cached value.
///
/// Precomputed files are cached as-is without execution. Component
/// files whose trimmed source starts with a markup delimiter are split
/// first; their template is attached to the export afterwards. A file
/// that fails to execute caches nothing.
pub fn resolve_file(
    context: &Rc<ExecutionContext>,
    scope: &Rc<ModuleScope>,
    path: &str,
) -> Result<Value> {
    if let Some(cached) = scope.cached(path) {
        return Ok(cached);
    }

    let file = scope.file(path).ok_or_else(|| RenderError::UnknownFile {
        path: path.to_string(),
        module: scope.name().to_string(),
    })?;

    let source = match file {
        VirtualFile::Precomputed(value) => {
            let value = value.clone();
            scope.cache(path, value.clone());
            return Ok(value);
        }
        VirtualFile::Source(source) => source.clone(),
    };

    trace!(module = scope.name(), path, "executing file");

    let (script, template) = if is_component_markup(path, &source) {
        let parts = markup::split(&source)?;
        (parts.script, Some(parts.template))
    } else {
        (source, None)
    };

    let exports = execute_script(context, scope, path, &script)?;

    if let Some(template) = template {
        // Non-object exports cannot carry a template; it is dropped
        exports.set_property("template", Value::String(template));
    }

    scope.cache(path, exports.clone());
    Ok(exports)
}

fn is_component_markup(path: &str, source: &str) -> bool {
    path.ends_with(COMPONENT_EXTENSION) && source.trim_start().starts_with('<')
}

/// Runs script source in a fresh isolated scope exposing exactly
/// `module`, `exports`, `require`, and `env` (plus the ambient members
/// as bare names when the request opted in). Returns whatever
/// `module.exports` holds afterwards.
fn execute_script(
    context: &Rc<ExecutionContext>,
    scope: &Rc<ModuleScope>,
    path: &str,
    script: &str,
) -> Result<Value> {
    let exports = Value::object();
    let module = Value::object();
    module.set_property("exports", exports.clone());

    let mut bindings = vec![
        ("module".to_string(), module.clone()),
        ("exports".to_string(), exports),
        ("require".to_string(), bind_require(context, scope, path)),
        ("env".to_string(), context.env().clone()),
    ];

    if context.expose_env() {
        if let Value::Object(env) = context.env() {
            for (name, member) in env.borrow().entries() {
                bindings.push((name.to_string(), member.clone()));
            }
        }
    }

    let mut engine = Engine::new();
    if let Err(error) = engine.eval_with_bindings(script, bindings) {
        // A failed nested require crossed the engine boundary as an
        // opaque host error; restore the stashed original
        if matches!(error, vitro_script::Error::Host(_)) {
            if let Some(original) = context.take_require_failure() {
                return Err(original);
            }
        }
        return Err(error.into());
    }

    // The script may have reassigned module.exports wholesale
    Ok(module.get_property("exports").unwrap_or(Value::Undefined))
}
