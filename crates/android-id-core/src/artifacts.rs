// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Files installed by specific emulator products.
//!
//! Relative entries are looked up from the process working directory,
//! which is `/` for Android application processes.

/// Named list of paths belonging to one emulator product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactPathSet {
    pub name: &'static str,
    pub paths: &'static [&'static str],
}

/// Genymotion daemon sockets
pub const GENYMOTION: ArtifactPathSet = ArtifactPathSet {
    name: "GENYMOTION",
    paths: &["/dev/socket/genyd", "/dev/socket/baseband_genyd"],
};

/// QEMU pipes present on Android SDK emulator images
pub const QEMU_PIPES: ArtifactPathSet = ArtifactPathSet {
    name: "QEMU_PIPES",
    paths: &["/dev/socket/qemud", "/dev/qemu_pipe"],
};

/// x86 emulator image init and fstab files
pub const X86: ArtifactPathSet = ArtifactPathSet {
    name: "X86",
    paths: &[
        "ueventd.android_x86.rc",
        "x86.prop",
        "ueventd.ttVM_x86.rc",
        "init.ttVM_x86.rc",
        "fstab.ttVM_x86",
        "fstab.vbox86",
        "init.vbox86.rc",
        "ueventd.vbox86.rc",
    ],
};

/// Andy
pub const ANDY: ArtifactPathSet = ArtifactPathSet {
    name: "ANDY",
    paths: &["fstab.andy", "ueventd.andy.rc"],
};

/// Nox
pub const NOX: ArtifactPathSet = ArtifactPathSet {
    name: "NOX",
    paths: &["fstab.nox", "init.nox.rc", "ueventd.nox.rc"],
};

/// LDPlayer
pub const LDPLAYER: ArtifactPathSet = ArtifactPathSet {
    name: "LDPLAYER",
    paths: &[
        "/system/lib/libc_malloc_debug_qemu.so",
        "/system/bin/microvirt-prop",
        "/system/bin/microvirt-uiautomator",
        "/system/bin/microvirtd",
        "/system/xbin/microvirt-prop",
    ],
};

/// MEmu
pub const MEMU: ArtifactPathSet = ArtifactPathSet {
    name: "MEMU",
    paths: &["fstab.memu", "init.memu.rc", "ueventd.memu.rc"],
};

/// Every set, in the order the aggregate file check probes them.
pub const ALL_ARTIFACT_SETS: &[ArtifactPathSet] =
    &[GENYMOTION, ANDY, NOX, X86, QEMU_PIPES, LDPLAYER, MEMU];
