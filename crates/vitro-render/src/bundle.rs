// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Vitro Contributors

//! Request bundle types: modules, virtual files, render requests.

use crate::messages::MessageCatalog;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use vitro_script::Value;

/// A render request: the module registry plus rendering parameters.
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    /// Module name → definition
    pub modules: IndexMap<String, ModuleDefinition>,
    /// The module whose export is rendered
    #[serde(default = "default_target")]
    pub target: String,
    /// Optional field of the target export holding the actual component
    #[serde(default)]
    pub component: Option<String>,
    /// Properties passed through to rendering
    #[serde(default)]
    pub props: serde_json::Map<String, serde_json::Value>,
    /// Whether ambient environment members are also exposed as bare
    /// names inside executed files
    #[serde(default = "default_expose_env")]
    pub expose_env: bool,
}

fn default_target() -> String {
    "main".to_string()
}

fn default_expose_env() -> bool {
    true
}

/// One named module: virtual files, an entry path, declared
/// dependencies, and an optional message catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleDefinition {
    /// Virtual path → file
    pub files: IndexMap<String, VirtualFile>,
    /// Path into `files` whose export becomes the module's export
    pub entry: String,
    /// Module names loaded (for side effects) before the entry runs
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Messages merged into the request's store before the entry runs
    #[serde(default)]
    pub messages: Option<MessageCatalog>,
}

/// A virtual file: source text to execute, or a value exported as-is.
#[derive(Debug, Clone)]
pub enum VirtualFile {
    /// Script source text
    Source(String),
    /// A precomputed export, never executed
    Precomputed(Value),
}

// In JSON a string is source text; any other value is a precomputed
// export, converted to an engine value up front.
impl<'de> Deserialize<'de> for VirtualFile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = serde_json::Value::deserialize(deserializer)?;
        Ok(match json {
            serde_json::Value::String(source) => VirtualFile::Source(source),
            other => VirtualFile::Precomputed(json_to_value(&other)),
        })
    }
}

/// Converts a JSON value into an engine value. Object keys keep their
/// source order.
pub fn json_to_value(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            Value::array(items.iter().map(json_to_value).collect())
        }
        serde_json::Value::Object(map) => {
            let object = Value::object();
            for (key, value) in map {
                object.set_property(key.clone(), json_to_value(value));
            }
            object
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_files_deserialize_as_source() {
        let file: VirtualFile = serde_json::from_str(r#""exports.a = 1;""#).unwrap();
        assert!(matches!(file, VirtualFile::Source(s) if s == "exports.a = 1;"));
    }

    #[test]
    fn non_string_files_deserialize_as_precomputed() {
        let file: VirtualFile = serde_json::from_str(r#"{"value": 42}"#).unwrap();
        let VirtualFile::Precomputed(value) = file else {
            panic!("expected a precomputed file");
        };
        assert_eq!(value.get_property("value"), Some(Value::Number(42.0)));
    }

    #[test]
    fn request_defaults() {
        let request: RenderRequest = serde_json::from_str(
            r#"{"modules": {"main": {"files": {"index.js": "exports.x = 1;"}, "entry": "index.js"}}}"#,
        )
        .unwrap();
        assert_eq!(request.target, "main");
        assert!(request.component.is_none());
        assert!(request.expose_env);
        assert!(request.modules["main"].dependencies.is_empty());
    }

    #[test]
    fn json_conversion_covers_all_shapes() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"n": 1.5, "s": "x", "b": true, "z": null, "a": [1, 2]}"#)
                .unwrap();
        let value = json_to_value(&json);
        assert_eq!(value.get_property("n"), Some(Value::Number(1.5)));
        assert_eq!(value.get_property("s"), Some(Value::String("x".into())));
        assert_eq!(value.get_property("b"), Some(Value::Boolean(true)));
        assert_eq!(value.get_property("z"), Some(Value::Null));
        let Some(Value::Array(items)) = value.get_property("a") else {
            panic!("expected an array");
        };
        assert_eq!(items.borrow().len(), 2);
    }
}
