//! End-to-end loader tests: whole request bundles through the module
//! system and the rendering seam.

use vitro_render::module_system::load_module;
use vitro_render::{render_bundle_json, ExecutionContext, RenderError, RenderRequest};
use vitro_script::Value;

fn parse_request(json: &str) -> RenderRequest {
    serde_json::from_str(json).expect("request should parse")
}

fn load(json: &str, target: &str) -> Result<Value, RenderError> {
    let request = parse_request(json);
    let context = ExecutionContext::new(request.modules.clone(), request.expose_env);
    load_module(&context, target)
}

#[test]
fn repeated_requires_return_the_identical_export() {
    let exports = load(
        r#"{
            "modules": {
                "main": {
                    "entry": "index.js",
                    "files": {
                        "index.js": "const a = require('./lib.js'); const b = require('./lib.js'); exports.same = a === b;",
                        "lib.js": "exports.tag = 'lib';"
                    }
                }
            }
        }"#,
        "main",
    )
    .unwrap();
    assert_eq!(exports.get_property("same"), Some(Value::Boolean(true)));
}

#[test]
fn module_exports_are_memoized_per_request() {
    let request = parse_request(
        r#"{
            "modules": {
                "state": {
                    "entry": "state.js",
                    "files": { "state.js": "exports.runs = [];" }
                },
                "main": {
                    "entry": "index.js",
                    "files": {
                        "index.js": "const state = require('state'); state.runs.push('ran'); exports.value = 42;"
                    }
                }
            }
        }"#,
    );
    let context = ExecutionContext::new(request.modules.clone(), true);

    let first = load_module(&context, "main").unwrap();
    let second = load_module(&context, "main").unwrap();

    assert_eq!(first.get_property("value"), Some(Value::Number(42.0)));
    assert_eq!(first, second, "memo must return the same reference");

    // The entry ran exactly once, even though it was loaded twice
    let state = load_module(&context, "state").unwrap();
    let Some(Value::Array(runs)) = state.get_property("runs") else {
        panic!("expected runs array");
    };
    assert_eq!(runs.borrow().len(), 1);
}

#[test]
fn dependencies_load_in_declaration_order_before_the_entry() {
    let exports = load(
        r#"{
            "modules": {
                "log": {
                    "entry": "log.js",
                    "files": { "log.js": "exports.entries = [];" }
                },
                "a": {
                    "entry": "a.js",
                    "dependencies": ["log"],
                    "files": { "a.js": "require('log').entries.push('a');" }
                },
                "b": {
                    "entry": "b.js",
                    "dependencies": ["log"],
                    "files": { "b.js": "require('log').entries.push('b');" }
                },
                "main": {
                    "entry": "index.js",
                    "dependencies": ["a", "b"],
                    "files": {
                        "index.js": "exports.order = require('log').entries.join(',');"
                    }
                }
            }
        }"#,
        "main",
    )
    .unwrap();
    assert_eq!(
        exports.get_property("order"),
        Some(Value::String("a,b".into()))
    );
}

#[test]
fn dependency_messages_merge_with_later_keys_overwriting() {
    let exports = load(
        r#"{
            "modules": {
                "base": {
                    "entry": "noop.js",
                    "files": { "noop.js": "" },
                    "messages": { "title": "Base", "footer": "Footer" }
                },
                "main": {
                    "entry": "index.js",
                    "dependencies": ["base"],
                    "messages": { "title": "Override" },
                    "files": {
                        "index.js": "const i18n = require('i18n'); exports.title = i18n.getText('title'); exports.footer = i18n.getText('footer');"
                    }
                }
            }
        }"#,
        "main",
    )
    .unwrap();
    assert_eq!(
        exports.get_property("title"),
        Some(Value::String("Override".into()))
    );
    assert_eq!(
        exports.get_property("footer"),
        Some(Value::String("Footer".into()))
    );
}

#[test]
fn serialized_message_catalogs_are_decoded() {
    let exports = load(
        r#"{
            "modules": {
                "main": {
                    "entry": "index.js",
                    "messages": "{\"greet\": \"Hello $1\"}",
                    "files": {
                        "index.js": "const i18n = require('i18n'); exports.text = i18n.format(i18n.getText('greet'), 'World');"
                    }
                }
            }
        }"#,
        "main",
    )
    .unwrap();
    assert_eq!(
        exports.get_property("text"),
        Some(Value::String("Hello World".into()))
    );
}

#[test]
fn unknown_target_module_fails() {
    let error = load(
        r#"{"modules": {"main": {"entry": "index.js", "files": {"index.js": ""}}}}"#,
        "nope",
    )
    .unwrap_err();
    assert!(matches!(error, RenderError::UnknownModule(name) if name == "nope"));
}

#[test]
fn unknown_module_inside_a_script_fails() {
    let error = load(
        r#"{
            "modules": {
                "main": {
                    "entry": "index.js",
                    "files": { "index.js": "require('ghost');" }
                }
            }
        }"#,
        "main",
    )
    .unwrap_err();
    assert!(
        matches!(&error, RenderError::UnknownModule(name) if name == "ghost"),
        "got {}",
        error
    );
}

#[test]
fn relative_require_outside_the_file_set_fails() {
    let error = load(
        r#"{
            "modules": {
                "main": {
                    "entry": "index.js",
                    "files": { "index.js": "require('./missing.js');" }
                }
            }
        }"#,
        "main",
    )
    .unwrap_err();
    assert!(
        matches!(&error, RenderError::UnknownFile { path, module } if path == "missing.js" && module == "main"),
        "got {}",
        error
    );
}

#[test]
fn missing_entry_file_fails_with_unknown_file() {
    let error = load(
        r#"{"modules": {"main": {"entry": "gone.js", "files": {"index.js": ""}}}}"#,
        "main",
    )
    .unwrap_err();
    assert!(
        matches!(&error, RenderError::UnknownFile { path, module } if path == "gone.js" && module == "main"),
        "got {}",
        error
    );
}

#[test]
fn relative_requires_never_cross_modules() {
    // other declares shared.js, but main's relative require must not see it
    let error = load(
        r#"{
            "modules": {
                "other": {
                    "entry": "shared.js",
                    "files": { "shared.js": "exports.x = 1;" }
                },
                "main": {
                    "entry": "index.js",
                    "files": { "index.js": "require('./shared.js');" }
                }
            }
        }"#,
        "main",
    )
    .unwrap_err();
    assert!(
        matches!(&error, RenderError::UnknownFile { path, module } if path == "shared.js" && module == "main"),
        "got {}",
        error
    );
}

#[test]
fn nested_require_failures_keep_their_error_kind() {
    // The failure happens two engine boundaries down: the target's
    // entry requires a module whose own entry requires a missing file
    let error = load(
        r#"{
            "modules": {
                "mid": {
                    "entry": "mid.js",
                    "files": { "mid.js": "require('./missing.js');" }
                },
                "main": {
                    "entry": "index.js",
                    "files": { "index.js": "require('mid');" }
                }
            }
        }"#,
        "main",
    )
    .unwrap_err();
    assert!(
        matches!(&error, RenderError::UnknownFile { path, module } if path == "missing.js" && module == "mid"),
        "got {}",
        error
    );
}

#[test]
fn circular_dependencies_fail_fast() {
    let error = load(
        r#"{
            "modules": {
                "a": {
                    "entry": "a.js",
                    "dependencies": ["b"],
                    "files": { "a.js": "" }
                },
                "b": {
                    "entry": "b.js",
                    "dependencies": ["a"],
                    "files": { "b.js": "" }
                }
            }
        }"#,
        "a",
    )
    .unwrap_err();
    assert!(
        error.to_string().contains("Circular dependency"),
        "got {}",
        error
    );
}

#[test]
fn failed_modules_stay_unmemoized() {
    let request = parse_request(
        r#"{
            "modules": {
                "main": {
                    "entry": "index.js",
                    "files": { "index.js": "throw { message: 'boom' };" }
                }
            }
        }"#,
    );
    let context = ExecutionContext::new(request.modules.clone(), true);
    assert!(load_module(&context, "main").is_err());
    // A second attempt re-executes and fails again rather than
    // returning a cached partial export
    assert!(load_module(&context, "main").is_err());
}

#[test]
fn precomputed_files_export_without_execution() {
    let exports = load(
        r#"{
            "modules": {
                "main": {
                    "entry": "index.js",
                    "files": {
                        "index.js": "const cfg = require('./config.json'); const again = require('./config.json'); exports.port = cfg.port; exports.same = cfg === again;",
                        "config.json": { "port": 8080 }
                    }
                }
            }
        }"#,
        "main",
    )
    .unwrap();
    assert_eq!(exports.get_property("port"), Some(Value::Number(8080.0)));
    assert_eq!(exports.get_property("same"), Some(Value::Boolean(true)));
}

#[test]
fn component_files_split_script_from_template() {
    let exports = load(
        r#"{
            "modules": {
                "main": {
                    "entry": "card.comp",
                    "files": {
                        "card.comp": "<script>exports.label = 'card';</script>\n<template><div>{{ label }}</div></template>"
                    }
                }
            }
        }"#,
        "main",
    )
    .unwrap();
    assert_eq!(
        exports.get_property("label"),
        Some(Value::String("card".into()))
    );
    assert_eq!(
        exports.get_property("template"),
        Some(Value::String("<div>{{ label }}</div>".into()))
    );
}

#[test]
fn unterminated_component_markup_is_fatal() {
    let error = load(
        r#"{
            "modules": {
                "main": {
                    "entry": "bad.comp",
                    "files": { "bad.comp": "<script>exports.a = 1;" }
                }
            }
        }"#,
        "main",
    )
    .unwrap_err();
    assert!(matches!(error, RenderError::MarkupParse(_)), "got {}", error);
}

#[test]
fn ambient_members_are_bare_names_by_default() {
    let exports = load(
        r#"{
            "modules": {
                "main": {
                    "entry": "index.js",
                    "messages": { "k": "text" },
                    "files": { "index.js": "exports.found = exists('k');" }
                }
            }
        }"#,
        "main",
    )
    .unwrap();
    assert_eq!(exports.get_property("found"), Some(Value::Boolean(true)));
}

#[test]
fn expose_env_false_removes_bare_ambient_names() {
    let error = load(
        r#"{
            "expose_env": false,
            "modules": {
                "main": {
                    "entry": "index.js",
                    "files": { "index.js": "exports.found = exists('k');" }
                }
            }
        }"#,
        "main",
    )
    .unwrap_err();
    assert!(
        error.to_string().contains("exists is not defined"),
        "got {}",
        error
    );
}

#[test]
fn env_object_remains_available_when_bare_names_are_off() {
    let exports = load(
        r#"{
            "expose_env": false,
            "modules": {
                "main": {
                    "entry": "index.js",
                    "messages": { "k": "text" },
                    "files": { "index.js": "exports.found = env.exists('k');" }
                }
            }
        }"#,
        "main",
    )
    .unwrap();
    assert_eq!(exports.get_property("found"), Some(Value::Boolean(true)));
}

#[test]
fn module_exports_reassignment_is_honored() {
    let exports = load(
        r#"{
            "modules": {
                "main": {
                    "entry": "index.js",
                    "files": { "index.js": "module.exports = { whole: true };" }
                }
            }
        }"#,
        "main",
    )
    .unwrap();
    assert_eq!(exports.get_property("whole"), Some(Value::Boolean(true)));
}

#[test]
fn render_kit_builtin_escapes_markup() {
    let exports = load(
        r#"{
            "modules": {
                "main": {
                    "entry": "index.js",
                    "files": {
                        "index.js": "const kit = require('render-kit'); exports.safe = kit.escape('<x>');"
                    }
                }
            }
        }"#,
        "main",
    )
    .unwrap();
    assert_eq!(
        exports.get_property("safe"),
        Some(Value::String("&lt;x&gt;".into()))
    );
}

#[test]
fn render_bundle_with_template_interpolation() {
    let markup = render_bundle_json(
        r#"{
            "modules": {
                "main": {
                    "entry": "index.js",
                    "files": {
                        "index.js": "exports.template = '<p>{{ name }}</p>'; exports.data = { name: 'fallback' };"
                    }
                }
            },
            "props": { "name": "ada" }
        }"#,
    )
    .unwrap();
    assert_eq!(markup, "<p>ada</p>");
}

#[test]
fn render_bundle_with_render_function_and_component_selector() {
    let markup = render_bundle_json(
        r#"{
            "modules": {
                "main": {
                    "entry": "index.js",
                    "files": {
                        "index.js": "exports.widget = { render: function(props) { return '<b>' + props.n + '</b>'; } };"
                    }
                }
            },
            "component": "widget",
            "props": { "n": 3 }
        }"#,
    )
    .unwrap();
    assert_eq!(markup, "<b>3</b>");
}

#[test]
fn missing_component_selector_field_is_a_render_error() {
    let error = render_bundle_json(
        r#"{
            "modules": {
                "main": {
                    "entry": "index.js",
                    "files": { "index.js": "exports.a = 1;" }
                }
            },
            "component": "widget"
        }"#,
    )
    .unwrap_err();
    assert!(matches!(error, RenderError::Render(_)), "got {}", error);
}
