// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Vitro Contributors

//! The in-memory module system.
//!
//! CommonJS-style semantics over request-supplied virtual files:
//! - `require()` with relative-file and named-module resolution
//! - `module.exports` / `exports`
//! - Lazy execution with per-module and per-request memoization
//! - Declared dependencies loaded before a module's own entry

pub mod builtins;
pub mod cache;
pub mod executor;
pub mod loader;
pub mod require;
pub mod resolver;

pub use builtins::{is_builtin, BUILTIN_MODULES};
pub use cache::ModuleScope;
pub use loader::load_module;
pub use require::{bind_require, require_from};
pub use resolver::resolve_relative;
