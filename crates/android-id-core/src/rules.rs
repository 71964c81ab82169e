// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Build property signatures of emulated devices.
//!
//! Rules are plain data: a field, a match kind, a literal and a case mode.
//! [`Check::matches`] is the only evaluator. A field that is absent never
//! matches, so an `Unless` exclusion on an absent field does not suppress
//! its rule.

use crate::descriptor::{DeviceDescriptor, Field};

/// How a field value is compared with a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Equals,
    StartsWith,
    Contains,
}

/// Case handling for a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Sensitive,
    /// Both operands are lower-cased before comparing.
    Insensitive,
}

/// A single field comparison.
#[derive(Debug, Clone, Copy)]
pub struct Check {
    pub field: Field,
    pub op: Op,
    pub literal: &'static str,
    pub case: Case,
}

impl Check {
    pub const fn new(field: Field, op: Op, literal: &'static str, case: Case) -> Self {
        Self {
            field,
            op,
            literal,
            case,
        }
    }

    pub fn matches(&self, descriptor: &DeviceDescriptor) -> bool {
        let Some(value) = descriptor.field(self.field) else {
            return false;
        };

        match self.case {
            Case::Sensitive => compare(self.op, value, self.literal),
            Case::Insensitive => compare(
                self.op,
                &value.to_lowercase(),
                &self.literal.to_lowercase(),
            ),
        }
    }
}

fn compare(op: Op, value: &str, literal: &str) -> bool {
    match op {
        Op::Equals => value == literal,
        Op::StartsWith => value.starts_with(literal),
        Op::Contains => value.contains(literal),
    }
}

/// Combination of checks forming one signal.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Is(Check),
    /// Every check matches.
    All(&'static [Check]),
    /// The first check matches and the second does not.
    Unless(Check, Check),
}

impl Rule {
    pub fn matches(&self, descriptor: &DeviceDescriptor) -> bool {
        match self {
            Rule::Is(check) => check.matches(descriptor),
            Rule::All(checks) => checks.iter().all(|c| c.matches(descriptor)),
            Rule::Unless(check, exclusion) => {
                check.matches(descriptor) && !exclusion.matches(descriptor)
            }
        }
    }
}

/// A rule with a stable, non-PII name for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct NamedRule {
    pub name: &'static str,
    pub rule: Rule,
}

impl NamedRule {
    pub fn matches(&self, descriptor: &DeviceDescriptor) -> bool {
        self.rule.matches(descriptor)
    }
}

/// First rule in `rules` that fires.
pub fn first_match<'a>(
    rules: &'a [NamedRule],
    descriptor: &DeviceDescriptor,
) -> Option<&'a NamedRule> {
    rules.iter().find(|r| r.matches(descriptor))
}

/// Every rule in `rules` that fires, in table order.
pub fn all_matches<'a>(
    rules: &'a [NamedRule],
    descriptor: &'a DeviceDescriptor,
) -> impl Iterator<Item = &'a NamedRule> + 'a {
    rules.iter().filter(move |r| r.matches(descriptor))
}

use Case::{Insensitive, Sensitive};
use Field::*;
use Op::{Contains, Equals, StartsWith};

const fn is(
    name: &'static str,
    field: Field,
    op: Op,
    literal: &'static str,
    case: Case,
) -> NamedRule {
    NamedRule {
        name,
        rule: Rule::Is(Check::new(field, op, literal, case)),
    }
}

const XIAOMI: Check = Check::new(Manufacturer, Equals, "xiaomi", Insensitive);

const GENERIC_BRAND_AND_DEVICE: &[Check] = &[
    Check::new(Brand, StartsWith, "generic", Sensitive),
    Check::new(Device, StartsWith, "generic", Sensitive),
];

/// Generic emulator signatures: Android SDK images, Genymotion, VirtualBox,
/// Nox, Droid4x and qemu kernels.
pub const SIGNATURE_RULES: &[NamedRule] = &[
    is("FINGERPRINT_GENERIC", Fingerprint, StartsWith, "generic", Sensitive),
    is("FINGERPRINT_UNKNOWN", Fingerprint, StartsWith, "unknown", Sensitive),
    is("MODEL_GOOGLE_SDK", Model, Contains, "google_sdk", Sensitive),
    is("MODEL_EMULATOR", Model, Contains, "Emulator", Sensitive),
    is("MODEL_SDK_X86", Model, Contains, "Android SDK built for x86", Sensitive),
    is("MANUFACTURER_GENYMOTION", Manufacturer, Contains, "Genymotion", Sensitive),
    is("MODEL_SDK_PREFIX", Model, StartsWith, "sdk_", Sensitive),
    is("DEVICE_EMULATOR", Device, StartsWith, "emulator", Sensitive),
    NamedRule {
        name: "BRAND_DEVICE_GENERIC",
        rule: Rule::All(GENERIC_BRAND_AND_DEVICE),
    },
    is("PRODUCT_GOOGLE_SDK", Product, Equals, "google_sdk", Sensitive),
    NamedRule {
        name: "HOST_BUILD",
        rule: Rule::Unless(
            Check::new(Host, StartsWith, "Build", Sensitive),
            Check::new(Manufacturer, Equals, "sony", Insensitive),
        ),
    },
    is("KERNEL_QEMU", KernelQemu, Equals, "1", Sensitive),
    is("HARDWARE_GOLDFISH", Hardware, Contains, "goldfish", Sensitive),
    is("HARDWARE_RANCHU", Hardware, Contains, "ranchu", Sensitive),
    is("PRODUCT_VBOX86P", Product, Contains, "vbox86p", Sensitive),
    is("PRODUCT_NOX", Product, Contains, "nox", Insensitive),
    is("BOARD_NOX", Board, Contains, "nox", Insensitive),
    is("HARDWARE_NOX", Hardware, Contains, "nox", Insensitive),
    is("MODEL_DROID4X", Model, Contains, "droid4x", Insensitive),
    is("HARDWARE_VBOX86", Hardware, Equals, "vbox86", Sensitive),
];

/// LDPlayer (Changwan) property signatures.
pub const LDPLAYER_RULES: &[NamedRule] = &[
    is("MANUFACTURER_CHANGWAN", Manufacturer, Contains, "changwan", Insensitive),
    is("BRAND_CHANGWAN", Brand, Contains, "changwan", Insensitive),
    is("MODEL_CHANGWAN", Model, Contains, "changwan", Insensitive),
    is("DEVICE_CHANGWAN", Device, Contains, "changwan", Insensitive),
    is("PRODUCT_CHANGWAN", Product, Contains, "changwan", Insensitive),
    is("FINGERPRINT_CHANGWAN", Fingerprint, Contains, "changwan", Insensitive),
    is("MANUFACTURER_LDPLAYER", Manufacturer, Contains, "ldplayer", Insensitive),
    is("BRAND_LDPLAYER", Brand, Contains, "ldplayer", Insensitive),
    is("MODEL_LDPLAYER", Model, Contains, "ldplayer", Insensitive),
    is("HARDWARE_LKM", Hardware, Contains, "lkm", Insensitive),
    is("HARDWARE_TTVM", Hardware, Contains, "ttvm", Insensitive),
    is("MODEL_IS_LDPLAYER", Model, Equals, "LDPlayer", Sensitive),
    is("MANUFACTURER_IS_CHANG_WAN", Manufacturer, Equals, "Chang Wan", Sensitive),
    is("DEVICE_IS_TTVM_HDRAGON", Device, Equals, "ttVM_Hdragon", Sensitive),
    is("FINGERPRINT_LDPLAYER", Fingerprint, Contains, "LDPlayer", Sensitive),
];

/// MEmu (Microvirt) property signatures.
pub const MEMU_RULES: &[NamedRule] = &[
    is("MANUFACTURER_MEMU", Manufacturer, Contains, "memu", Insensitive),
    is("BRAND_MEMU", Brand, Contains, "memu", Insensitive),
    is("MODEL_MEMU", Model, Contains, "memu", Insensitive),
    is("DEVICE_MEMU", Device, Contains, "memu", Insensitive),
    is("PRODUCT_MEMU", Product, Contains, "memu", Insensitive),
    is("MANUFACTURER_IS_MICROVIRT", Manufacturer, Equals, "Microvirt", Sensitive),
    is("MODEL_IS_MEMU", Model, Equals, "MEmu", Sensitive),
    is("HARDWARE_MEMU", Hardware, Contains, "memu", Insensitive),
];

/// BlueStacks property signatures. BlueStacks ships no distinctive files.
pub const BLUESTACKS_RULES: &[NamedRule] = &[
    is("MANUFACTURER_BLUESTACKS", Manufacturer, Contains, "bluestacks", Insensitive),
    is("BRAND_BLUESTACKS", Brand, Contains, "bluestacks", Insensitive),
    is("MODEL_BLUESTACKS", Model, Contains, "bluestacks", Insensitive),
    is("DEVICE_BLUESTACKS", Device, Contains, "bluestacks", Insensitive),
    is("PRODUCT_BLUESTACKS", Product, Contains, "bluestacks", Insensitive),
    is("MANUFACTURER_IS_BLUESTACKS", Manufacturer, Equals, "BlueStacks", Sensitive),
    NamedRule {
        name: "BOARD_QC_REFERENCE_PHONE",
        rule: Rule::Unless(
            Check::new(Board, Equals, "QC_Reference_Phone", Sensitive),
            XIAOMI,
        ),
    },
];

/// x86 CPU architecture, as emulator images usually are.
///
/// Case-sensitive on purpose: `uname` reports lower-case machine names.
pub fn is_x86_architecture(architecture: Option<&str>) -> bool {
    architecture.is_some_and(|arch| arch.contains("x86") || arch.contains("i686"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn descriptor(field: Field, value: &str) -> DeviceDescriptor {
        let mut d = DeviceDescriptor::default();
        d.set(field, value);
        d
    }

    fn fires(rules: &[NamedRule], d: &DeviceDescriptor) -> bool {
        first_match(rules, d).is_some()
    }

    #[rstest]
    #[case(Fingerprint, "generic/sdk_gphone_x86/generic_x86:11/RSR1")]
    #[case(Fingerprint, "unknown/vbox86p/vbox86p:9")]
    #[case(Model, "Android SDK built for x86_64")]
    #[case(Model, "google_sdk")]
    #[case(Model, "My Emulator")]
    #[case(Model, "sdk_gphone64_arm64")]
    #[case(Manufacturer, "Genymotion")]
    #[case(Device, "emulator64_x86_64_arm64")]
    #[case(Product, "google_sdk")]
    #[case(Host, "Build2")]
    #[case(KernelQemu, "1")]
    #[case(Hardware, "goldfish_arm64")]
    #[case(Hardware, "ranchu")]
    #[case(Hardware, "vbox86")]
    #[case(Product, "vbox86p")]
    #[case(Product, "NOX_Player")]
    #[case(Board, "nox")]
    #[case(Hardware, "Nox")]
    #[case(Model, "Droid4X-MAC")]
    fn test_signature_rule_fires(#[case] field: Field, #[case] value: &str) {
        assert!(fires(SIGNATURE_RULES, &descriptor(field, value)), "{:?}={}", field, value);
    }

    #[rstest]
    #[case(Fingerprint, "GENERIC/foo")]
    #[case(Fingerprint, "google/oriole/oriole:14/UQ1A")]
    #[case(Model, "emulator")]
    #[case(Model, "SDK_phone")]
    #[case(Manufacturer, "genymotion")]
    #[case(Device, "Emulator")]
    #[case(Product, "google_sdk_x86")]
    #[case(Host, "abfarm-release-2004-0152")]
    #[case(KernelQemu, "0")]
    #[case(Hardware, "Goldfish")]
    #[case(Hardware, "vbox86_64")]
    #[case(Hardware, "qcom")]
    fn test_signature_rule_does_not_fire(#[case] field: Field, #[case] value: &str) {
        assert!(!fires(SIGNATURE_RULES, &descriptor(field, value)), "{:?}={}", field, value);
    }

    #[test]
    fn test_brand_and_device_both_generic() {
        let mut d = descriptor(Brand, "generic_x86");
        assert!(!fires(SIGNATURE_RULES, &d));
        d.device = Some("generic_x86_64".to_string());
        assert!(fires(SIGNATURE_RULES, &d));
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some("Google"), true)]
    #[case(Some("Sony"), false)]
    #[case(Some("SONY"), false)]
    fn test_host_build_excludes_sony(#[case] manufacturer: Option<&str>, #[case] expected: bool) {
        let mut d = descriptor(Host, "BuildHost");
        d.manufacturer = manufacturer.map(str::to_string);
        assert_eq!(fires(SIGNATURE_RULES, &d), expected);
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some("samsung"), true)]
    #[case(Some("xiaomi"), false)]
    #[case(Some("Xiaomi"), false)]
    #[case(Some("XIAOMI"), false)]
    fn test_qc_reference_board_excludes_xiaomi(
        #[case] manufacturer: Option<&str>,
        #[case] expected: bool,
    ) {
        let mut d = descriptor(Board, "QC_Reference_Phone");
        d.manufacturer = manufacturer.map(str::to_string);
        assert_eq!(fires(BLUESTACKS_RULES, &d), expected);
    }

    #[rstest]
    #[case(Manufacturer, "ChangWan")]
    #[case(Fingerprint, "changwan/foo")]
    #[case(Brand, "LDPlayer")]
    #[case(Model, "LDPlayer")]
    #[case(Hardware, "LKM")]
    #[case(Hardware, "ttVM_x86")]
    #[case(Manufacturer, "Chang Wan")]
    #[case(Device, "ttVM_Hdragon")]
    #[case(Fingerprint, "xx/LDPlayer/yy")]
    fn test_ldplayer_rules(#[case] field: Field, #[case] value: &str) {
        assert!(fires(LDPLAYER_RULES, &descriptor(field, value)));
    }

    #[rstest]
    #[case(Manufacturer, "Microvirt")]
    #[case(Model, "MEmu")]
    #[case(Device, "memu_x86")]
    #[case(Hardware, "MEMU")]
    #[case(Product, "Memu")]
    fn test_memu_rules(#[case] field: Field, #[case] value: &str) {
        assert!(fires(MEMU_RULES, &descriptor(field, value)));
    }

    #[rstest]
    #[case(Manufacturer, "BlueStacks")]
    #[case(Brand, "bluestacks")]
    #[case(Product, "BLUESTACKS_X")]
    fn test_bluestacks_rules(#[case] field: Field, #[case] value: &str) {
        assert!(fires(BLUESTACKS_RULES, &descriptor(field, value)));
    }

    #[test]
    fn test_absent_fields_never_match() {
        let d = DeviceDescriptor::default();
        for rules in [SIGNATURE_RULES, LDPLAYER_RULES, MEMU_RULES, BLUESTACKS_RULES] {
            assert!(!fires(rules, &d));
        }
    }

    #[test]
    fn test_all_matches_reports_every_rule() {
        let mut d = descriptor(Hardware, "goldfish_ranchu");
        d.kernel_qemu = Some("1".to_string());
        let names: Vec<_> = all_matches(SIGNATURE_RULES, &d).map(|r| r.name).collect();
        assert_eq!(names, ["KERNEL_QEMU", "HARDWARE_GOLDFISH", "HARDWARE_RANCHU"]);
    }

    #[test]
    fn test_rule_names_are_unique() {
        for rules in [SIGNATURE_RULES, LDPLAYER_RULES, MEMU_RULES, BLUESTACKS_RULES] {
            let mut names: Vec<_> = rules.iter().map(|r| r.name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), rules.len());
        }
    }

    #[rstest]
    #[case(Some("x86_64"), true)]
    #[case(Some("x86"), true)]
    #[case(Some("i686"), true)]
    #[case(Some("arm64-v8a"), false)]
    #[case(Some("aarch64"), false)]
    #[case(Some("X86_64"), false)]
    #[case(None, false)]
    fn test_x86_architecture(#[case] arch: Option<&str>, #[case] expected: bool) {
        assert_eq!(is_x86_architecture(arch), expected);
    }
}
