// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Error types.
//!
//! None of these reach callers of the detection API. Property and probe
//! failures are mapped to "absent" / "does not exist" where they occur;
//! the types exist so that mapping happens in one visible place.

use thiserror::Error;

/// Failure to read a single system property.
#[derive(Debug, Error)]
pub enum PropertyError {
    /// No source knows the property.
    #[error("property not set: {key}")]
    NotFound {
        /// The property key.
        key: String,
    },

    /// The property exists but holds an empty value.
    #[error("property is empty: {key}")]
    Empty {
        /// The property key.
        key: String,
    },

    /// `getprop` could not be spawned or exited with an error.
    #[error("getprop failed: {0}")]
    Getprop(#[source] std::io::Error),

    /// The property value was not valid UTF-8.
    #[error("property {key} is not valid UTF-8")]
    InvalidUtf8 {
        /// The property key.
        key: String,
    },

    /// The key cannot be passed to the property service.
    #[error("invalid property key: {key:?}")]
    InvalidKey {
        /// The property key.
        key: String,
    },

    /// `uname(2)` failed.
    #[error("uname failed: {0}")]
    Uname(#[source] std::io::Error),
}

/// Invalid detector configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration JSON could not be parsed.
    #[error("invalid detector config: {0}")]
    Json(#[from] serde_json::Error),
}
