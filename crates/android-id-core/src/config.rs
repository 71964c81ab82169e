// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Detector configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Build property files scanned when live properties are unavailable, in order.
pub const DEFAULT_BUILD_PROP_FILES: &[&str] = &[
    "/system/build.prop",
    "/default.prop",
    "/vendor/build.prop",
];

/// Detector configuration.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Directory emulator artifact paths are resolved under.
    /// `None` probes the live filesystem.
    pub artifact_root: Option<PathBuf>,
    /// `getprop` binary used by [`crate::SystemProperties`] off Android.
    pub getprop_path: PathBuf,
    /// Fallback `key=value` property files.
    pub build_prop_files: Vec<PathBuf>,
    /// Include the filesystem artifact checks.
    pub probe_files: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            artifact_root: None,
            getprop_path: PathBuf::from("getprop"),
            build_prop_files: DEFAULT_BUILD_PROP_FILES.iter().map(PathBuf::from).collect(),
            probe_files: true,
        }
    }
}

impl DetectorConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
