// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Vitro Contributors

//! The fixed built-in library table.
//!
//! Built-in exports are seeded into the module memo when a context is
//! created, so require() finds them before consulting the registry and
//! a request cannot shadow them.

use crate::messages::{format_message, MessageStore};
use std::cell::RefCell;
use std::rc::Rc;
use vitro_script::{Callable, Value};

/// Names resolvable by require() without a registry entry.
pub const BUILTIN_MODULES: &[&str] = &["i18n", "render-kit"];

/// Returns true if `name` is a built-in library.
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_MODULES.contains(&name)
}

/// Builds the export object for a built-in library. The `i18n` exports
/// are bound to the request's message store.
pub fn builtin_exports(name: &str, messages: &Rc<RefCell<MessageStore>>) -> Option<Value> {
    match name {
        "i18n" => Some(message_facade(messages)),
        "render-kit" => Some(render_kit()),
        _ => None,
    }
}

/// The message façade: `exists`, `getText`, and positional `format`.
/// Also used as the ambient environment object, which exposes the same
/// three operations.
pub fn message_facade(messages: &Rc<RefCell<MessageStore>>) -> Value {
    let facade = Value::object();

    let store = Rc::clone(messages);
    facade.set_property(
        "exists",
        Callable::native("exists", move |args| {
            let key = first_string(args);
            Ok(Value::Boolean(store.borrow().exists(&key)))
        }),
    );

    let store = Rc::clone(messages);
    facade.set_property(
        "getText",
        Callable::native("getText", move |args| {
            let key = first_string(args);
            // Missing keys fall back to the key itself
            let text = store
                .borrow()
                .get(&key)
                .map(str::to_string)
                .unwrap_or_else(|| key.clone());
            Ok(Value::String(text))
        }),
    );

    facade.set_property(
        "format",
        Callable::native("format", |args| {
            let text = first_string(args);
            let rest: Vec<String> = args
                .iter()
                .skip(1)
                .map(Value::to_display_string)
                .collect();
            Ok(Value::String(format_message(&text, &rest)))
        }),
    );

    facade
}

/// Helpers used by generated component code.
fn render_kit() -> Value {
    let kit = Value::object();

    kit.set_property(
        "escape",
        Callable::native("escape", |args| {
            let raw = first_string(args);
            let mut out = String::with_capacity(raw.len());
            for c in raw.chars() {
                match c {
                    '&' => out.push_str("&amp;"),
                    '<' => out.push_str("&lt;"),
                    '>' => out.push_str("&gt;"),
                    '"' => out.push_str("&quot;"),
                    '\'' => out.push_str("&#39;"),
                    other => out.push(other),
                }
            }
            Ok(Value::String(out))
        }),
    );

    kit.set_property(
        "classNames",
        Callable::native("classNames", |args| {
            let mut classes = Vec::new();
            for arg in args {
                collect_classes(arg, &mut classes);
            }
            Ok(Value::String(classes.join(" ")))
        }),
    );

    kit
}

fn collect_classes(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) if !s.is_empty() => out.push(s.clone()),
        Value::Array(items) => {
            for item in items.borrow().iter() {
                collect_classes(item, out);
            }
        }
        Value::Object(object) => {
            // Keys with truthy values become class names
            for (key, enabled) in object.borrow().entries() {
                if enabled.to_boolean() {
                    out.push(key.to_string());
                }
            }
        }
        _ => {}
    }
}

fn first_string(args: &[Value]) -> String {
    args.first().map(Value::to_display_string).unwrap_or_default()
}
