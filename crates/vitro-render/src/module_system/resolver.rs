// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Vitro Contributors

//! Virtual path resolution for relative requires.
//!
//! Only leading `./` and `../` runs mark a specifier as relative; there
//! are no absolute paths, no extension inference, and no package-style
//! lookup.

/// Resolves a relative specifier against the path of the requiring
/// file. Returns `None` when the specifier is not relative (the caller
/// then treats it as a module name).
///
/// Each leading `../` pops one directory segment off the base path.
/// Popping past the root is a silent no-op; existing bundles rely on
/// that.
pub fn resolve_relative(spec: &str, base: &str) -> Option<String> {
    if !spec.starts_with("./") && !spec.starts_with("../") {
        return None;
    }

    let mut dirs: Vec<&str> = base.split('/').collect();
    dirs.pop(); // the requiring file itself

    let mut rest = spec;
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("../") {
            dirs.pop();
            rest = stripped;
        } else {
            break;
        }
    }

    if dirs.is_empty() {
        Some(rest.to_string())
    } else {
        Some(format!("{}/{}", dirs.join("/"), rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_resolution() {
        assert_eq!(
            resolve_relative("./a.js", "dir/b.js"),
            Some("dir/a.js".to_string())
        );
    }

    #[test]
    fn parent_resolution() {
        assert_eq!(
            resolve_relative("../a.js", "dir/sub/b.js"),
            Some("dir/a.js".to_string())
        );
    }

    #[test]
    fn mixed_leading_run() {
        assert_eq!(
            resolve_relative(".././a.js", "dir/sub/b.js"),
            Some("dir/a.js".to_string())
        );
    }

    #[test]
    fn popping_past_the_root_is_a_silent_noop() {
        assert_eq!(
            resolve_relative("../../a.js", "b.js"),
            Some("a.js".to_string())
        );
    }

    #[test]
    fn bare_names_are_not_relative() {
        assert_eq!(resolve_relative("i18n", "dir/b.js"), None);
        assert_eq!(resolve_relative("widgets", "b.js"), None);
        assert_eq!(resolve_relative("/abs.js", "b.js"), None);
    }
}
