// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Vitro Contributors

//! The rendering seam: turns a resolved export into markup text.
//!
//! Rendering sits outside the loader core; the loader hands over the
//! resolved component and the request's props and takes no further
//! part. `BasicRenderer` covers the two shapes component modules
//! actually export: a `render` function, or a template with `{{ name }}`
//! placeholders.

use crate::error::{RenderError, Result};
use vitro_script::{Engine, Value};

/// Turns a resolved component export plus props into markup.
pub trait Renderer {
    /// Renders the component. Failures are render-specific errors.
    fn render(&self, component: &Value, props: &Value) -> Result<String>;
}

/// The default renderer.
pub struct BasicRenderer;

impl Renderer for BasicRenderer {
    fn render(&self, component: &Value, props: &Value) -> Result<String> {
        // A render function wins over template interpolation
        if let Some(render_fn) = component.get_property("render") {
            if render_fn.is_function() {
                let mut engine = Engine::new();
                let output = engine
                    .call_with_this(&render_fn, component.clone(), &[props.clone()])
                    .map_err(|e| RenderError::Render(e.to_string()))?;
                return Ok(output.to_display_string());
            }
        }

        let template = component
            .get_property("template")
            .map(|t| t.to_display_string())
            .unwrap_or_default();
        Ok(interpolate(&template, props, component.get_property("data")))
    }
}

/// Replaces `{{ name }}` placeholders from props, then from the
/// component's `data` object. Unresolved names render as empty text.
fn interpolate(template: &str, props: &Value, data: Option<Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        match after.find("}}") {
            Some(close) => {
                let name = after[..close].trim();
                let value = props
                    .get_property(name)
                    .or_else(|| data.as_ref().and_then(|d| d.get_property(name)));
                if let Some(value) = value {
                    if !value.is_nullish() {
                        out.push_str(&value.to_display_string());
                    }
                }
                rest = &after[close + 2..];
            }
            None => {
                // No closing braces; emit the rest verbatim
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitro_script::obj;

    #[test]
    fn template_interpolation_prefers_props_over_data() {
        let component = obj! {
            "template" => Value::String("<p>{{ greeting }}, {{ name }}</p>".into()),
            "data" => obj! {
                "greeting" => Value::String("hello".into()),
                "name" => Value::String("default".into()),
            },
        };
        let props = obj! { "name" => Value::String("ada".into()) };
        let output = BasicRenderer.render(&component, &props).unwrap();
        assert_eq!(output, "<p>hello, ada</p>");
    }

    #[test]
    fn unresolved_placeholders_render_empty() {
        let component = obj! {
            "template" => Value::String("[{{ missing }}]".into()),
        };
        let output = BasicRenderer.render(&component, &Value::object()).unwrap();
        assert_eq!(output, "[]");
    }

    #[test]
    fn render_function_receives_props() {
        let mut engine = Engine::new();
        let component = engine
            .eval(
                "const c = { render: function(props) { return '<b>' + props.n + '</b>'; } }; c;",
            )
            .unwrap();
        let props = obj! { "n" => Value::Number(7.0) };
        let output = BasicRenderer.render(&component, &props).unwrap();
        assert_eq!(output, "<b>7</b>");
    }

    #[test]
    fn render_failures_surface_as_render_errors() {
        let mut engine = Engine::new();
        let component = engine
            .eval("const c = { render: function() { throw { message: 'nope' }; } }; c;")
            .unwrap();
        let error = BasicRenderer
            .render(&component, &Value::object())
            .unwrap_err();
        assert!(matches!(error, RenderError::Render(_)), "got {}", error);
    }
}
