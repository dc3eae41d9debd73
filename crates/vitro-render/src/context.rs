// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Vitro Contributors

//! Per-request execution state.

use crate::bundle::ModuleDefinition;
use crate::error::{RenderError, Result};
use crate::messages::{MessageCatalog, MessageStore};
use crate::module_system::builtins;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use vitro_script::Value;

/// All state for one request: the module registry, the module-export
/// memo (seeded with built-in library exports), the message store, the
/// ambient environment object, and the cycle-detection stack.
///
/// Everything here is created when a request begins and dropped when it
/// ends; nothing is shared across requests.
pub struct ExecutionContext {
    modules: IndexMap<String, ModuleDefinition>,
    module_exports: RefCell<FxHashMap<String, Value>>,
    messages: Rc<RefCell<MessageStore>>,
    env: Value,
    loading: RefCell<Vec<String>>,
    require_failure: RefCell<Option<RenderError>>,
    expose_env: bool,
}

impl ExecutionContext {
    /// Builds the context for one request.
    pub fn new(modules: IndexMap<String, ModuleDefinition>, expose_env: bool) -> Rc<Self> {
        let messages = Rc::new(RefCell::new(MessageStore::new()));

        let mut memo = FxHashMap::default();
        for name in builtins::BUILTIN_MODULES {
            if let Some(exports) = builtins::builtin_exports(name, &messages) {
                memo.insert(name.to_string(), exports);
            }
        }

        let env = builtins::message_facade(&messages);

        Rc::new(Self {
            modules,
            module_exports: RefCell::new(memo),
            messages,
            env,
            loading: RefCell::new(Vec::new()),
            require_failure: RefCell::new(None),
            expose_env,
        })
    }

    /// Looks up a module definition in the registry.
    pub fn module(&self, name: &str) -> Option<&ModuleDefinition> {
        self.modules.get(name)
    }

    /// Returns the memoized export for a module (or built-in), if any.
    pub fn memoized(&self, name: &str) -> Option<Value> {
        self.module_exports.borrow().get(name).cloned()
    }

    /// Memoizes a module's export for the rest of the request.
    pub fn memoize(&self, name: &str, exports: Value) {
        self.module_exports
            .borrow_mut()
            .insert(name.to_string(), exports);
    }

    /// Merges a message catalog into the request's store.
    pub fn merge_messages(&self, catalog: &MessageCatalog) -> Result<()> {
        self.messages.borrow_mut().merge(catalog)
    }

    /// The shared message store.
    pub fn messages(&self) -> &Rc<RefCell<MessageStore>> {
        &self.messages
    }

    /// The ambient environment object injected into every executed file.
    pub fn env(&self) -> &Value {
        &self.env
    }

    /// Whether ambient members are also exposed as bare names.
    pub fn expose_env(&self) -> bool {
        self.expose_env
    }

    /// Returns true if the module is currently on the loading stack.
    pub fn is_loading(&self, name: &str) -> bool {
        self.loading.borrow().iter().any(|m| m == name)
    }

    /// Pushes a module onto the loading stack.
    pub fn push_loading(&self, name: &str) {
        self.loading.borrow_mut().push(name.to_string());
    }

    /// Pops the most recent module off the loading stack.
    pub fn pop_loading(&self) {
        self.loading.borrow_mut().pop();
    }

    /// Records a loader error about to cross the engine boundary as an
    /// opaque host error, so its kind can be restored on the way out.
    pub fn stash_require_failure(&self, error: RenderError) {
        *self.require_failure.borrow_mut() = Some(error);
    }

    /// Takes the most recently stashed loader error, if any.
    pub fn take_require_failure(&self) -> Option<RenderError> {
        self.require_failure.borrow_mut().take()
    }
}
