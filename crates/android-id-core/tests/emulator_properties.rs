// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

use std::fs;

use android_id_core::rules::{Rule, BLUESTACKS_RULES, LDPLAYER_RULES, MEMU_RULES};
use android_id_core::{
    check_files_exist, device_info, DetectorConfig, DeviceDescriptor, EmulatorDetector, Field,
    UNKNOWN,
};
use proptest::option;
use proptest::prelude::*;
use tempfile::TempDir;

/// Detector whose file probes only see an empty scratch directory.
fn isolated() -> (TempDir, EmulatorDetector) {
    let root = tempfile::tempdir().unwrap();
    let detector = EmulatorDetector::new(&DetectorConfig {
        artifact_root: Some(root.path().to_path_buf()),
        ..Default::default()
    });
    (root, detector)
}

fn text() -> impl Strategy<Value = Option<String>> {
    option::of("[A-Za-z0-9_ ./:-]{0,24}")
}

prop_compose! {
    fn descriptors()(
        (manufacturer, brand, model, device, product, board) in
            (text(), text(), text(), text(), text(), text()),
        (hardware, fingerprint, host, architecture, kernel_qemu) in
            (text(), text(), text(), text(), option::of("[01]"))
    ) -> DeviceDescriptor {
        DeviceDescriptor {
            manufacturer,
            brand,
            model,
            device,
            product,
            board,
            hardware,
            fingerprint,
            host,
            architecture,
            kernel_qemu,
            ..Default::default()
        }
    }
}

/// Field and literal of every single-check product rule.
fn product_triggers() -> Vec<(Field, &'static str)> {
    [LDPLAYER_RULES, MEMU_RULES, BLUESTACKS_RULES]
        .into_iter()
        .flatten()
        .filter_map(|named| match named.rule {
            Rule::Is(check) => Some((check.field, check.literal)),
            _ => None,
        })
        .collect()
}

proptest! {
    #[test]
    fn generic_or_unknown_fingerprint_is_emulator(
        d in descriptors(),
        prefix in prop_oneof![Just("generic"), Just("unknown")],
        rest in "[a-z0-9/:_]{0,20}"
    ) {
        let (_root, detector) = isolated();
        let d = DeviceDescriptor { fingerprint: Some(format!("{}{}", prefix, rest)), ..d };
        prop_assert!(detector.is_emulator(&d));
    }

    #[test]
    fn goldfish_anywhere_in_hardware_is_emulator(
        d in descriptors(),
        before in "[a-z_]{0,8}",
        after in "[a-z_]{0,8}"
    ) {
        let (_root, detector) = isolated();
        let d = DeviceDescriptor { hardware: Some(format!("{}goldfish{}", before, after)), ..d };
        prop_assert!(detector.is_emulator(&d));
    }

    #[test]
    fn qc_reference_board_depends_on_manufacturer(
        d in descriptors(),
        manufacturer in "[A-Za-z]{1,10}"
    ) {
        let (_root, detector) = isolated();
        let d = DeviceDescriptor {
            board: Some("QC_Reference_Phone".to_string()),
            manufacturer: Some(manufacturer.clone()),
            ..d
        };
        let fired = detector
            .detect(&d)
            .detection_method_names
            .iter()
            .any(|n| n == "BLUESTACKS:BOARD_QC_REFERENCE_PHONE");

        if manufacturer.eq_ignore_ascii_case("xiaomi") {
            prop_assert!(!fired);
        } else {
            prop_assert!(fired);
            prop_assert!(detector.is_emulator(&d));
        }
    }

    #[test]
    fn detect_agrees_with_is_emulator(d in descriptors()) {
        let (_root, detector) = isolated();
        let first = detector.is_emulator(&d);
        prop_assert_eq!(detector.detect(&d).is_emulator, first);
        prop_assert_eq!(detector.is_emulator(&d), first);
    }

    #[test]
    fn product_checks_imply_emulator(
        d in descriptors(),
        (field, literal) in prop::sample::select(product_triggers())
    ) {
        let (_root, detector) = isolated();
        let mut d = d;
        d.set(field, literal);

        prop_assert!(
            detector.is_ldplayer(&d) || detector.is_memu(&d) || detector.is_bluestacks(&d)
        );
        prop_assert!(detector.is_emulator(&d));
        prop_assert!(detector.detect(&d).is_emulator);
    }

    #[test]
    fn device_info_is_total(d in descriptors()) {
        let info = device_info(&d);
        prop_assert_eq!(info.len(), 18);
        for (key, value) in &info {
            if key != "radioVersion" {
                prop_assert!(!value.is_null(), "{} is null", key);
            }
        }
    }
}

#[test]
fn xiaomi_reference_board_is_not_flagged_by_board_alone() {
    let (_root, detector) = isolated();
    let d = DeviceDescriptor {
        manufacturer: Some("XIAOMI".to_string()),
        board: Some("QC_Reference_Phone".to_string()),
        architecture: Some("arm64-v8a".to_string()),
        ..Default::default()
    };
    assert!(!detector.is_emulator(&d));
}

#[test]
fn architecture_rule() {
    let (_root, detector) = isolated();
    let x86 = DeviceDescriptor {
        architecture: Some("x86_64".to_string()),
        ..Default::default()
    };
    let arm = DeviceDescriptor {
        architecture: Some("arm64-v8a".to_string()),
        ..Default::default()
    };
    assert!(detector.is_emulator(&x86));
    assert!(!detector.is_emulator(&arm));
}

#[test]
fn empty_descriptor_reports_unknown() {
    let info = device_info(&DeviceDescriptor::default());
    assert_eq!(info["model"], UNKNOWN);
    assert_eq!(info["architecture"], UNKNOWN);
    assert!(info["radioVersion"].is_null());
}

#[test]
fn check_files_exist_filters_missing_paths() {
    let dir = tempfile::tempdir().unwrap();
    let present = dir.path().join("fstab.nox");
    fs::write(&present, "").unwrap();
    let present = present.to_string_lossy().to_string();
    let missing = dir.path().join("init.nox.rc").to_string_lossy().to_string();

    assert_eq!(
        check_files_exist([missing.as_str(), present.as_str()]),
        vec![present.clone()]
    );
}

#[test]
fn artifact_files_flag_otherwise_physical_device() {
    let (root, detector) = isolated();
    let pixel = DeviceDescriptor {
        manufacturer: Some("Google".to_string()),
        model: Some("Pixel 8".to_string()),
        hardware: Some("shiba".to_string()),
        architecture: Some("aarch64".to_string()),
        ..Default::default()
    };
    assert!(!detector.is_emulator(&pixel));

    fs::create_dir_all(root.path().join("dev")).unwrap();
    fs::write(root.path().join("dev/qemu_pipe"), "").unwrap();
    assert!(detector.is_emulator(&pixel));
    assert_eq!(
        detector.detect(&pixel).detection_method_names,
        ["FILE:QEMU_PIPES"]
    );
}
