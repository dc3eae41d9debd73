// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Vitro Contributors

//! Per-module scope: the module's files plus its file-export cache.

use crate::bundle::VirtualFile;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use vitro_script::Value;

/// The scope of one module while it loads: its file set and the cache
/// of exports produced so far. Created fresh for each module load and
/// discarded when the entry file's export is memoized.
pub struct ModuleScope {
    name: String,
    files: IndexMap<String, VirtualFile>,
    file_exports: RefCell<FxHashMap<String, Value>>,
}

impl ModuleScope {
    /// Creates a scope for loading the named module.
    pub fn new(name: impl Into<String>, files: IndexMap<String, VirtualFile>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            files,
            file_exports: RefCell::new(FxHashMap::default()),
        })
    }

    /// The module's name, for diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a file by virtual path.
    pub fn file(&self, path: &str) -> Option<&VirtualFile> {
        self.files.get(path)
    }

    /// Returns true if the path exists in this module's file set.
    pub fn has_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Returns the cached export for a path, if it already executed.
    pub fn cached(&self, path: &str) -> Option<Value> {
        self.file_exports.borrow().get(path).cloned()
    }

    /// Caches a path's export for the rest of this module load.
    pub fn cache(&self, path: &str, exports: Value) {
        self.file_exports
            .borrow_mut()
            .insert(path.to_string(), exports);
    }
}
