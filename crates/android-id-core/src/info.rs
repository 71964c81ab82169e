// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Device information for diagnostic reports.

use serde_json::{Map, Value};

use crate::descriptor::{DeviceDescriptor, Field};

/// Placeholder for unavailable values.
pub const UNKNOWN: &str = "unknown";

/// Report keys and the descriptor field each one shows.
const STRING_KEYS: &[(&str, Field)] = &[
    ("manufacturer", Field::Manufacturer),
    ("brand", Field::Brand),
    ("model", Field::Model),
    ("device", Field::Device),
    ("product", Field::Product),
    ("board", Field::Board),
    ("hardware", Field::Hardware),
    ("host", Field::Host),
    ("fingerprint", Field::Fingerprint),
    ("bootloader", Field::Bootloader),
    ("osVersion", Field::OsVersion),
    ("incremental", Field::Incremental),
    ("codename", Field::Codename),
    ("architecture", Field::Architecture),
    ("javaVmName", Field::RuntimeName),
    ("javaVmVersion", Field::RuntimeVersion),
];

/// Project `descriptor` into the key/value report the host application shows.
///
/// Every key is always present. Unavailable strings read `"unknown"`,
/// except `radioVersion`, which is `null` on devices without a radio.
pub fn device_info(descriptor: &DeviceDescriptor) -> Map<String, Value> {
    let mut info = Map::new();

    for (key, field) in STRING_KEYS {
        let value = descriptor.field(*field).unwrap_or(UNKNOWN);
        info.insert((*key).to_string(), Value::from(value));
    }

    info.insert(
        "radioVersion".to_string(),
        descriptor
            .field(Field::RadioVersion)
            .map_or(Value::Null, Value::from),
    );
    info.insert(
        "sdkInt".to_string(),
        descriptor
            .sdk_int
            .map_or_else(|| Value::from(UNKNOWN), Value::from),
    );

    info
}
