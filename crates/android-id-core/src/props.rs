// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! System property sources.
//!
//! On Android, properties are read in-process from the property area with
//! `__system_property_get`. Elsewhere the `getprop` binary is asked instead.
//! When neither can be used (non-Android hosts, restricted sandboxes) the
//! `key=value` build property files are scanned.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use log::trace;

use crate::config::DetectorConfig;
use crate::error::PropertyError;

/// Read access to system properties.
pub trait PropertySource {
    /// Read a property, reporting why it is unavailable.
    fn try_get(&self, key: &str) -> Result<String, PropertyError>;

    /// Read a property; any failure is treated as "not set".
    fn get(&self, key: &str) -> Option<String> {
        match self.try_get(key) {
            Ok(value) => Some(value),
            Err(err) => {
                trace!("property {} unavailable: {}", key, err);
                None
            }
        }
    }
}

/// Live system properties, falling back to build property files.
#[derive(Debug, Clone)]
pub struct SystemProperties {
    getprop_path: PathBuf,
    build_prop_files: Vec<PathBuf>,
}

impl SystemProperties {
    /// Source configured from a [`DetectorConfig`].
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            getprop_path: config.getprop_path.clone(),
            build_prop_files: config.build_prop_files.clone(),
        }
    }

    #[cfg(target_os = "android")]
    fn read_live(&self, key: &str) -> Result<String, PropertyError> {
        system_property_get(key)
    }

    #[cfg(not(target_os = "android"))]
    fn read_live(&self, key: &str) -> Result<String, PropertyError> {
        self.getprop(key)
    }

    #[cfg_attr(target_os = "android", allow(dead_code))]
    fn getprop(&self, key: &str) -> Result<String, PropertyError> {
        let output = Command::new(&self.getprop_path)
            .arg(key)
            .output()
            .map_err(PropertyError::Getprop)?;

        if !output.status.success() {
            return Err(PropertyError::Getprop(std::io::Error::other(format!(
                "exited with {}",
                output.status
            ))));
        }

        let value = String::from_utf8(output.stdout).map_err(|_| PropertyError::InvalidUtf8 {
            key: key.to_string(),
        })?;
        non_empty(key, value.trim())
    }

    fn from_build_props(&self, key: &str) -> Result<String, PropertyError> {
        for path in &self.build_prop_files {
            let Ok(content) = fs::read_to_string(path) else {
                continue;
            };
            if let Some(value) = find_property(&content, key) {
                return non_empty(key, value);
            }
        }

        Err(PropertyError::NotFound {
            key: key.to_string(),
        })
    }
}

impl Default for SystemProperties {
    fn default() -> Self {
        Self::new(&DetectorConfig::default())
    }
}

impl PropertySource for SystemProperties {
    fn try_get(&self, key: &str) -> Result<String, PropertyError> {
        match self.read_live(key) {
            Err(err @ (PropertyError::Getprop(_) | PropertyError::InvalidUtf8 { .. })) => {
                trace!("reading {} failed ({}), scanning build props", key, err);
                self.from_build_props(key)
            }
            // An empty value from a working reader is final
            result => result,
        }
    }
}

/// `PROP_VALUE_MAX` from `<sys/system_properties.h>`.
#[cfg(target_os = "android")]
const PROP_VALUE_MAX: usize = 92;

/// Read `key` from the property area of this process.
#[cfg(target_os = "android")]
fn system_property_get(key: &str) -> Result<String, PropertyError> {
    use std::ffi::{CStr, CString};

    let name = CString::new(key).map_err(|_| PropertyError::InvalidKey {
        key: key.to_string(),
    })?;
    let mut value = [0 as libc::c_char; PROP_VALUE_MAX];

    // SAFETY: `name` is NUL-terminated and `value` holds PROP_VALUE_MAX bytes,
    // the most the call writes including the terminator.
    let len = unsafe { libc::__system_property_get(name.as_ptr(), value.as_mut_ptr()) };
    if len <= 0 {
        return Err(PropertyError::Empty {
            key: key.to_string(),
        });
    }

    // SAFETY: the call NUL-terminates what it writes.
    let value = unsafe { CStr::from_ptr(value.as_ptr()) };
    let value = value.to_str().map_err(|_| PropertyError::InvalidUtf8 {
        key: key.to_string(),
    })?;
    non_empty(key, value.trim())
}

/// In-memory property source.
#[derive(Debug, Clone, Default)]
pub struct MapProperties {
    values: HashMap<String, String>,
}

impl MapProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapProperties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl PropertySource for MapProperties {
    fn try_get(&self, key: &str) -> Result<String, PropertyError> {
        match self.values.get(key) {
            Some(value) => non_empty(key, value),
            None => Err(PropertyError::NotFound {
                key: key.to_string(),
            }),
        }
    }
}

/// Find `key` in `key=value` formatted content. Last assignment wins.
fn find_property<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    content
        .lines()
        .filter_map(parse_prop_line)
        .filter(|(k, _)| *k == key)
        .map(|(_, v)| v)
        .last()
}

fn parse_prop_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), value.trim()))
}

fn non_empty(key: &str, value: &str) -> Result<String, PropertyError> {
    if value.is_empty() {
        Err(PropertyError::Empty {
            key: key.to_string(),
        })
    } else {
        Ok(value.to_string())
    }
}

/// Machine hardware name as reported by `uname(2)`, e.g. `aarch64` or `i686`.
///
/// This is the value the managed runtime reports as `os.arch`.
#[cfg(unix)]
pub fn machine_architecture() -> Result<String, PropertyError> {
    use std::ffi::CStr;

    // SAFETY: utsname is plain old data; uname fills it in place.
    let mut uts: libc::utsname = unsafe { std::mem::zeroed() };
    // SAFETY: `uts` is a valid, writable utsname.
    if unsafe { libc::uname(&mut uts) } != 0 {
        return Err(PropertyError::Uname(std::io::Error::last_os_error()));
    }

    // SAFETY: uname NUL-terminates every field it writes.
    let machine = unsafe { CStr::from_ptr(uts.machine.as_ptr()) };
    let machine = machine.to_str().map_err(|_| PropertyError::InvalidUtf8 {
        key: "uname.machine".to_string(),
    })?;
    non_empty("uname.machine", machine)
}

#[cfg(not(unix))]
pub fn machine_architecture() -> Result<String, PropertyError> {
    Ok(std::env::consts::ARCH.to_string())
}
