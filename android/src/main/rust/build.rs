// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

// Build script for the emulator check bridge
// Links liblog so android_logger output reaches logcat

fn main() {
    // cfg!(target_os) would describe the build host here, not the target
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("android") {
        println!("cargo:rustc-link-lib=log");
    }
}
