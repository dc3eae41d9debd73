// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Vitro Contributors

//! Splits component-definition files into script and template portions.

use crate::error::{RenderError, Result};

/// A component file split into its executable and retained parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitComponent {
    /// The script portion, executed as module source
    pub script: String,
    /// The template portion, attached to the export after execution
    pub template: String,
}

/// Splits raw component markup into a `<script>` block and a
/// `<template>` block. When no `<template>` tag is present, everything
/// outside the script block is the template. An opening tag without its
/// closing tag is a fatal parse error.
pub fn split(raw: &str) -> Result<SplitComponent> {
    let (script, remainder) = match extract_block(raw, "script")? {
        Some((inner, rest)) => (inner, rest),
        None => (String::new(), raw.to_string()),
    };

    let template = match extract_block(&remainder, "template")? {
        Some((inner, _)) => inner,
        None => remainder,
    };

    Ok(SplitComponent {
        script: script.trim().to_string(),
        template: template.trim().to_string(),
    })
}

/// Finds the first `<tag ...>...</tag>` block. Returns the block's inner
/// content and the input with the whole block removed.
fn extract_block(raw: &str, tag: &str) -> Result<Option<(String, String)>> {
    let open_marker = format!("<{}", tag);
    let close_marker = format!("</{}>", tag);

    let Some(open_at) = raw.find(&open_marker) else {
        return Ok(None);
    };
    let after_open = &raw[open_at + open_marker.len()..];
    let Some(gt) = after_open.find('>') else {
        return Err(RenderError::MarkupParse(format!(
            "unterminated <{}> opening tag",
            tag
        )));
    };
    let content_start = open_at + open_marker.len() + gt + 1;

    let Some(close_rel) = raw[content_start..].find(&close_marker) else {
        return Err(RenderError::MarkupParse(format!(
            "missing closing </{}> tag",
            tag
        )));
    };
    let content_end = content_start + close_rel;

    let inner = raw[content_start..content_end].to_string();
    let mut rest = String::with_capacity(raw.len());
    rest.push_str(&raw[..open_at]);
    rest.push_str(&raw[content_end + close_marker.len()..]);

    Ok(Some((inner, rest)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_script_and_template_blocks() {
        let raw = "<script>exports.a = 1;</script>\n<template><p>hi</p></template>";
        let parts = split(raw).unwrap();
        assert_eq!(parts.script, "exports.a = 1;");
        assert_eq!(parts.template, "<p>hi</p>");
    }

    #[test]
    fn content_outside_script_is_template_when_untagged() {
        let raw = "<div>before</div>\n<script>exports.a = 1;</script>\n<div>after</div>";
        let parts = split(raw).unwrap();
        assert_eq!(parts.script, "exports.a = 1;");
        assert_eq!(parts.template, "<div>before</div>\n\n<div>after</div>");
    }

    #[test]
    fn missing_script_block_yields_empty_script() {
        let parts = split("<template><p>static</p></template>").unwrap();
        assert_eq!(parts.script, "");
        assert_eq!(parts.template, "<p>static</p>");
    }

    #[test]
    fn unterminated_block_is_fatal() {
        let error = split("<script>exports.a = 1;").unwrap_err();
        assert!(matches!(error, RenderError::MarkupParse(_)));
        let error = split("<template><p>").unwrap_err();
        assert!(matches!(error, RenderError::MarkupParse(_)));
    }

    #[test]
    fn script_tag_attributes_are_tolerated() {
        let raw = r#"<script lang="js">exports.a = 1;</script>"#;
        let parts = split(raw).unwrap();
        assert_eq!(parts.script, "exports.a = 1;");
    }
}
