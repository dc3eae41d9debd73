// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Vitro Contributors

//! # vitro-render
//!
//! A sandboxed, in-memory CommonJS-style module loader for server-side
//! component rendering.
//!
//! A request supplies a bundle of named modules, each mapping virtual
//! file paths to source text (or precomputed export values). The loader
//! executes that code with the embedded [`vitro_script`] engine and
//! produces a usable export graph (lazy evaluation, memoization,
//! relative-path resolution, dependency ordering) with no real
//! filesystem and no package manager.
//!
//! The supplied code is trusted. The engine has no I/O and hosts choose
//! every binding a script sees, but this is not a defense against
//! malicious input; that boundary belongs to whoever accepts the bundle.
//!
//! ## Example
//!
//! ```
//! let request = r#"{
//!     "modules": {
//!         "main": {
//!             "entry": "index.js",
//!             "files": {
//!                 "index.js": "exports.template = '<p>{{ name }}</p>';"
//!             }
//!         }
//!     },
//!     "props": { "name": "ada" }
//! }"#;
//! let markup = vitro_render::render_bundle_json(request).unwrap();
//! assert_eq!(markup, "<p>ada</p>");
//! ```

#![warn(clippy::all)]

pub mod bundle;
pub mod context;
pub mod error;
pub mod markup;
pub mod messages;
pub mod module_system;
pub mod render;

pub use bundle::{json_to_value, ModuleDefinition, RenderRequest, VirtualFile};
pub use context::ExecutionContext;
pub use error::{RenderError, Result};
pub use markup::{split, SplitComponent};
pub use messages::{format_message, MessageCatalog, MessageStore};
pub use render::{BasicRenderer, Renderer};

use vitro_script::Value;

/// Processes one render request end to end: build the context, load the
/// target module, select the component field if one was named, and hand
/// the component plus props to the renderer.
pub fn render_bundle(request: RenderRequest) -> Result<String> {
    let exports = load_target(&request)?;

    let component = match &request.component {
        Some(field) => exports.get_property(field).ok_or_else(|| {
            RenderError::Render(format!("target export has no field '{}'", field))
        })?,
        None => exports,
    };

    let props = json_to_value(&serde_json::Value::Object(request.props.clone()));
    BasicRenderer.render(&component, &props)
}

/// Parses a JSON request and renders it.
pub fn render_bundle_json(json: &str) -> Result<String> {
    let request: RenderRequest = serde_json::from_str(json)?;
    render_bundle(request)
}

/// Loads the request's target module and returns its raw export,
/// without rendering. Useful for hosts that own their own render step.
pub fn load_target(request: &RenderRequest) -> Result<Value> {
    let context = ExecutionContext::new(request.modules.clone(), request.expose_env);
    module_system::load_module(&context, &request.target)
}
