// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Android ID Emulator Check - JNI bridge
//!
//! Native half of `dev.fluttercommunity.android_id.EmulatorCheck`.
//! Arguments arrive as JSON strings (or `String[]`), results leave as JSON
//! strings. All detection logic lives in `android_id_core`; this crate only
//! marshals values across JNI and never throws into the JVM.

use android_id_core::{
    check_files_exist, device_info, DetectorConfig, DeviceDescriptor, EmulatorDetectionResult,
    EmulatorDetector, PropertySource, SystemProperties,
};
use jni::objects::{JClass, JObject, JObjectArray, JString, JValue};
use jni::sys::{jboolean, jstring, JNI_FALSE, JNI_TRUE};
use jni::JNIEnv;
use log::warn;

#[cfg(target_os = "android")]
use android_logger::Config;
#[cfg(target_os = "android")]
use log::LevelFilter;

const FALLBACK_DETECTION_JSON: &str = r#"{"is_emulator":false,"detection_method_names":[]}"#;

/// Parse the optional config JSON; anything invalid falls back to defaults.
pub fn resolve_config(config_json: Option<&str>) -> DetectorConfig {
    match config_json.map(DetectorConfig::from_json) {
        Some(Ok(config)) => config,
        Some(Err(err)) => {
            warn!("Ignoring detector config: {}", err);
            DetectorConfig::default()
        }
        None => DetectorConfig::default(),
    }
}

/// Host-supplied descriptor fields, with the fields the host left out read
/// from `system`.
pub fn resolve_descriptor(
    descriptor_json: Option<&str>,
    system: &dyn PropertySource,
) -> DeviceDescriptor {
    let host = match descriptor_json.map(serde_json::from_str::<DeviceDescriptor>) {
        Some(Ok(host)) => host,
        Some(Err(err)) => {
            warn!("Ignoring host descriptor: {}", err);
            DeviceDescriptor::default()
        }
        None => DeviceDescriptor::default(),
    };
    host.filled_from(system)
}

/// Detection result as JSON.
pub fn detect_json(descriptor: &DeviceDescriptor, config: &DetectorConfig) -> String {
    let result: EmulatorDetectionResult = EmulatorDetector::new(config).detect(descriptor);
    serde_json::to_string(&result).unwrap_or_else(|_| FALLBACK_DETECTION_JSON.to_string())
}

/// Device information report as a JSON object.
pub fn device_info_json(descriptor: &DeviceDescriptor) -> String {
    serde_json::to_string(&device_info(descriptor)).unwrap_or_else(|_| "{}".to_string())
}

/// Existing paths among `paths` as a JSON array.
pub fn existing_paths_json(paths: &[String]) -> String {
    serde_json::to_string(&check_files_exist(paths)).unwrap_or_else(|_| "[]".to_string())
}

// ============================================================================
// JNI Bindings
// ============================================================================

fn optional_string(env: &mut JNIEnv, value: &JString) -> Option<String> {
    if value.is_null() {
        return None;
    }
    env.get_string(value).ok().map(String::from)
}

fn string_array(env: &mut JNIEnv, array: &JObjectArray) -> Vec<String> {
    if array.is_null() {
        return Vec::new();
    }

    let len = env.get_array_length(array).unwrap_or(0);
    let mut result = Vec::with_capacity(len.max(0) as usize);
    for i in 0..len {
        let Ok(element) = env.get_object_array_element(array, i) else {
            continue;
        };
        let element = JString::from(element);
        if let Some(value) = optional_string(env, &element) {
            result.push(value);
        }
        // Keep the local reference table bounded for long arrays
        let _ = env.delete_local_ref(element);
    }
    result
}

/// `Settings.Secure.ANDROID_ID`
const ANDROID_ID_SETTING: &str = "android_id";
const SETTINGS_SECURE_CLASS: &str = "android/provider/Settings$Secure";
const SETTINGS_GET_STRING_SIG: &str =
    "(Landroid/content/ContentResolver;Ljava/lang/String;)Ljava/lang/String;";

/// `Settings.Secure.getString(resolver, ANDROID_ID)`; `None` on any JNI error
/// or pending exception.
fn secure_android_id<'local>(
    env: &mut JNIEnv<'local>,
    content_resolver: &JObject,
) -> Option<JObject<'local>> {
    let name = env.new_string(ANDROID_ID_SETTING).ok()?;
    let result = env
        .call_static_method(
            SETTINGS_SECURE_CLASS,
            "getString",
            SETTINGS_GET_STRING_SIG,
            &[JValue::Object(content_resolver), JValue::Object(&name)],
        )
        .and_then(|value| value.l());

    match result {
        Ok(id) if !id.is_null() => Some(id),
        Ok(_) => None,
        Err(err) => {
            warn!("Settings.Secure.getString failed: {}", err);
            if env.exception_check().unwrap_or(false) {
                let _ = env.exception_clear();
            }
            None
        }
    }
}

fn to_jstring(env: &mut JNIEnv, json: &str, fallback: &str) -> jstring {
    match env.new_string(json) {
        Ok(jstr) => jstr.into_raw(),
        Err(_) => match env.new_string(fallback) {
            Ok(jstr) => jstr.into_raw(),
            Err(_) => std::ptr::null_mut(),
        },
    }
}

/// Initialize logging for the emulator check
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "C" fn Java_dev_fluttercommunity_android_1id_EmulatorCheck_nativeInit(
    _env: JNIEnv,
    _class: JClass,
) {
    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Info)
            .with_tag("AndroidIdEmulatorCheck"),
    );
}

#[cfg(not(target_os = "android"))]
#[no_mangle]
pub extern "C" fn Java_dev_fluttercommunity_android_1id_EmulatorCheck_nativeInit(
    _env: JNIEnv,
    _class: JClass,
) {
    // No-op for non-Android platforms
}

/// `static native boolean nativeIsEmulator(String descriptorJson, String configJson)`
#[no_mangle]
pub extern "C" fn Java_dev_fluttercommunity_android_1id_EmulatorCheck_nativeIsEmulator(
    mut env: JNIEnv,
    _class: JClass,
    descriptor_json: JString,
    config_json: JString,
) -> jboolean {
    let config = resolve_config(optional_string(&mut env, &config_json).as_deref());
    let descriptor_json = optional_string(&mut env, &descriptor_json);
    let system = SystemProperties::new(&config);
    let descriptor = resolve_descriptor(descriptor_json.as_deref(), &system);

    if EmulatorDetector::new(&config).is_emulator(&descriptor) {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}

/// `static native String nativeDetectEmulator(String descriptorJson, String configJson)`
///
/// Returns JSON with `is_emulator` and `detection_method_names`.
#[no_mangle]
pub extern "C" fn Java_dev_fluttercommunity_android_1id_EmulatorCheck_nativeDetectEmulator(
    mut env: JNIEnv,
    _class: JClass,
    descriptor_json: JString,
    config_json: JString,
) -> jstring {
    let config = resolve_config(optional_string(&mut env, &config_json).as_deref());
    let descriptor_json = optional_string(&mut env, &descriptor_json);
    let system = SystemProperties::new(&config);
    let descriptor = resolve_descriptor(descriptor_json.as_deref(), &system);

    let json = detect_json(&descriptor, &config);
    to_jstring(&mut env, &json, FALLBACK_DETECTION_JSON)
}

/// `static native String nativeGetDeviceInfo(String descriptorJson)`
///
/// The host passes the values only it can read (`java.vm.name`,
/// `Build.getRadioVersion()`, ...); everything else comes from system properties.
#[no_mangle]
pub extern "C" fn Java_dev_fluttercommunity_android_1id_EmulatorCheck_nativeGetDeviceInfo(
    mut env: JNIEnv,
    _class: JClass,
    descriptor_json: JString,
) -> jstring {
    let config = DetectorConfig::default();
    let descriptor_json = optional_string(&mut env, &descriptor_json);
    let system = SystemProperties::new(&config);
    let descriptor = resolve_descriptor(descriptor_json.as_deref(), &system);

    let json = device_info_json(&descriptor);
    to_jstring(&mut env, &json, "{}")
}

/// `static native String nativeGetAndroidId(ContentResolver resolver)`
///
/// The `ANDROID_ID` secure setting, or null when the resolver is null or the
/// lookup fails.
#[no_mangle]
pub extern "C" fn Java_dev_fluttercommunity_android_1id_EmulatorCheck_nativeGetAndroidId(
    mut env: JNIEnv,
    _class: JClass,
    content_resolver: JObject,
) -> jstring {
    if content_resolver.is_null() {
        return std::ptr::null_mut();
    }
    match secure_android_id(&mut env, &content_resolver) {
        Some(id) => JString::from(id).into_raw(),
        None => std::ptr::null_mut(),
    }
}

/// `static native String nativeCheckFilesExist(String[] paths)`
///
/// Returns a JSON array of the paths that exist, in input order.
#[no_mangle]
pub extern "C" fn Java_dev_fluttercommunity_android_1id_EmulatorCheck_nativeCheckFilesExist(
    mut env: JNIEnv,
    _class: JClass,
    paths: JObjectArray,
) -> jstring {
    let paths = string_array(&mut env, &paths);
    let json = existing_paths_json(&paths);
    to_jstring(&mut env, &json, "[]")
}
