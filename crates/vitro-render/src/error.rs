// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Vitro Contributors

//! Error types for the loader core

use thiserror::Error;

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while loading or rendering a bundle
#[derive(Debug, Error)]
pub enum RenderError {
    /// A named module absent from the registry (including the target)
    #[error("Cannot find module '{0}'")]
    UnknownModule(String),

    /// A relative require resolved to a path outside the module's files
    #[error("Cannot find file '{path}' in module '{module}'")]
    UnknownFile {
        /// The resolved virtual path
        path: String,
        /// The module whose file set was searched
        module: String,
    },

    /// Script engine failure while executing a file
    #[error("{0}")]
    Script(#[from] vitro_script::Error),

    /// The markup splitter reported a fatal diagnostic
    #[error("Markup parse error: {0}")]
    MarkupParse(String),

    /// A module depends on itself, directly or transitively
    #[error("Circular dependency detected: {0}")]
    CircularDependency(String),

    /// Failure in the downstream rendering step
    #[error("Render error: {0}")]
    Render(String),

    /// Malformed request bundle or message catalog
    #[error("Bad request: {0}")]
    BadRequest(#[from] serde_json::Error),
}
