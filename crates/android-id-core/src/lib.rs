// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Android ID - emulator heuristics
//!
//! Best-effort detection of emulated Android environments from build
//! properties and known emulator files, plus a device information report
//! for diagnostics. This is a heuristic signal, not an anti-tamper control:
//! expect occasional false positives and negatives.
//!
//! ```rust,ignore
//! use android_id_core::{DetectorConfig, DeviceDescriptor, EmulatorDetector, SystemProperties};
//!
//! let config = DetectorConfig::default();
//! let descriptor = DeviceDescriptor::from_source(&SystemProperties::new(&config));
//! let detector = EmulatorDetector::new(&config);
//!
//! if detector.is_emulator(&descriptor) {
//!     // degrade gracefully
//! }
//! ```
//!
//! No operation here returns an error to the caller. Unreadable properties
//! are absent and unreadable paths do not exist.

pub mod artifacts;
pub mod config;
pub mod descriptor;
pub mod detector;
pub mod error;
pub mod info;
pub mod probe;
pub mod props;
pub mod rules;

pub use artifacts::{ArtifactPathSet, ALL_ARTIFACT_SETS};
pub use config::DetectorConfig;
pub use descriptor::{DeviceDescriptor, Field};
pub use detector::{EmulatorDetectionResult, EmulatorDetector};
pub use error::{ConfigError, PropertyError};
pub use info::{device_info, UNKNOWN};
pub use probe::{check_files_exist, FileProbe};
pub use props::{MapProperties, PropertySource, SystemProperties};

use serde_json::{Map, Value};

/// Snapshot of the running device with default settings.
pub fn current_device() -> DeviceDescriptor {
    DeviceDescriptor::from_source(&SystemProperties::default())
}

/// Whether the running device looks like an emulator.
pub fn is_emulator() -> bool {
    EmulatorDetector::default().is_emulator(&current_device())
}

/// Device information report for the running device.
pub fn get_device_info() -> Map<String, Value> {
    device_info(&current_device())
}
