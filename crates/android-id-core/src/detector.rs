// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Emulator detection.
//!
//! The verdict is a plain disjunction over the property signatures, the
//! per-product checks (LDPlayer, MEmu, BlueStacks), the CPU architecture
//! and the emulator artifact files. Nothing here mutates state, so a
//! detector can be shared freely between threads.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::artifacts::{self, ArtifactPathSet, ALL_ARTIFACT_SETS};
use crate::config::DetectorConfig;
use crate::descriptor::DeviceDescriptor;
use crate::probe::FileProbe;
use crate::rules::{
    all_matches, first_match, is_x86_architecture, NamedRule, BLUESTACKS_RULES, LDPLAYER_RULES,
    MEMU_RULES, SIGNATURE_RULES,
};

/// Emulator detection result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmulatorDetectionResult {
    pub is_emulator: bool,
    pub detection_method_names: Vec<String>, // Non-PII identifiers
}

/// Evaluates the emulator heuristics against a [`DeviceDescriptor`].
#[derive(Debug, Clone)]
pub struct EmulatorDetector {
    probe: FileProbe,
    probe_files: bool,
}

impl Default for EmulatorDetector {
    fn default() -> Self {
        Self::new(&DetectorConfig::default())
    }
}

impl EmulatorDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        let probe = match &config.artifact_root {
            Some(root) => FileProbe::with_root(root),
            None => FileProbe::new(),
        };
        Self {
            probe,
            probe_files: config.probe_files,
        }
    }

    /// Whether `descriptor` (and the local filesystem) look like an emulator.
    pub fn is_emulator(&self, descriptor: &DeviceDescriptor) -> bool {
        if let Some(rule) = first_match(SIGNATURE_RULES, descriptor) {
            debug!("emulator signature matched: {}", rule.name);
            return true;
        }

        self.is_ldplayer(descriptor)
            || self.is_memu(descriptor)
            || self.is_bluestacks(descriptor)
            || is_x86_architecture(descriptor.architecture.as_deref())
            || self.check_emulator_files()
    }

    /// Evaluate every heuristic and name the ones that fired.
    ///
    /// `detect(d).is_emulator == is_emulator(d)` for every descriptor.
    pub fn detect(&self, descriptor: &DeviceDescriptor) -> EmulatorDetectionResult {
        let mut methods = Vec::new();

        let groups: [(&str, &[NamedRule]); 4] = [
            ("SIGNATURE", SIGNATURE_RULES),
            ("LDPLAYER", LDPLAYER_RULES),
            ("MEMU", MEMU_RULES),
            ("BLUESTACKS", BLUESTACKS_RULES),
        ];
        for (group, rules) in groups {
            methods.extend(
                all_matches(rules, descriptor).map(|r| format!("{}:{}", group, r.name)),
            );
        }

        if is_x86_architecture(descriptor.architecture.as_deref()) {
            methods.push("ARCH_X86".to_string());
        }

        if self.probe_files {
            for set in ALL_ARTIFACT_SETS {
                if self.probe.any_present(set) {
                    methods.push(format!("FILE:{}", set.name));
                }
            }
        }

        if !methods.is_empty() {
            debug!("emulator detected by {:?}", methods);
        }

        EmulatorDetectionResult {
            is_emulator: !methods.is_empty(),
            detection_method_names: methods,
        }
    }

    /// LDPlayer properties or files.
    pub fn is_ldplayer(&self, descriptor: &DeviceDescriptor) -> bool {
        self.matches_product(LDPLAYER_RULES, Some(&artifacts::LDPLAYER), descriptor)
    }

    /// MEmu properties or files.
    pub fn is_memu(&self, descriptor: &DeviceDescriptor) -> bool {
        self.matches_product(MEMU_RULES, Some(&artifacts::MEMU), descriptor)
    }

    /// BlueStacks properties.
    pub fn is_bluestacks(&self, descriptor: &DeviceDescriptor) -> bool {
        self.matches_product(BLUESTACKS_RULES, None, descriptor)
    }

    /// Whether any known emulator artifact exists.
    pub fn check_emulator_files(&self) -> bool {
        self.probe_files && ALL_ARTIFACT_SETS.iter().any(|set| self.probe.any_present(set))
    }

    fn matches_product(
        &self,
        rules: &[NamedRule],
        files: Option<&ArtifactPathSet>,
        descriptor: &DeviceDescriptor,
    ) -> bool {
        if let Some(rule) = first_match(rules, descriptor) {
            debug!("emulator product rule matched: {}", rule.name);
            return true;
        }
        match files {
            Some(set) if self.probe_files => self.probe.any_present(set),
            _ => false,
        }
    }
}
