// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Device descriptor snapshot.

use serde::{Deserialize, Serialize};

use crate::props::{machine_architecture, PropertySource};

/// A descriptor field the rules can inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Manufacturer,
    Brand,
    Model,
    Device,
    Product,
    Board,
    Hardware,
    Fingerprint,
    Host,
    Bootloader,
    RadioVersion,
    OsVersion,
    Incremental,
    Codename,
    Architecture,
    KernelQemu,
    RuntimeName,
    RuntimeVersion,
}

impl Field {
    /// Every field, in descriptor order.
    pub const ALL: [Field; 18] = [
        Field::Manufacturer,
        Field::Brand,
        Field::Model,
        Field::Device,
        Field::Product,
        Field::Board,
        Field::Hardware,
        Field::Fingerprint,
        Field::Host,
        Field::Bootloader,
        Field::RadioVersion,
        Field::OsVersion,
        Field::Incremental,
        Field::Codename,
        Field::Architecture,
        Field::KernelQemu,
        Field::RuntimeName,
        Field::RuntimeVersion,
    ];

    /// System property backing this field, if any.
    pub fn property_key(self) -> Option<&'static str> {
        match self {
            Field::Manufacturer => Some("ro.product.manufacturer"),
            Field::Brand => Some("ro.product.brand"),
            Field::Model => Some("ro.product.model"),
            Field::Device => Some("ro.product.device"),
            Field::Product => Some("ro.product.name"),
            Field::Board => Some("ro.product.board"),
            Field::Hardware => Some("ro.hardware"),
            Field::Fingerprint => Some("ro.build.fingerprint"),
            Field::Host => Some("ro.build.host"),
            Field::Bootloader => Some("ro.bootloader"),
            Field::RadioVersion => Some("gsm.version.baseband"),
            Field::OsVersion => Some("ro.build.version.release"),
            Field::Incremental => Some("ro.build.version.incremental"),
            Field::Codename => Some("ro.build.version.codename"),
            Field::KernelQemu => Some("ro.kernel.qemu"),
            Field::Architecture | Field::RuntimeName | Field::RuntimeVersion => None,
        }
    }
}

/// `ro.build.version.sdk`, the numeric SDK level kept in
/// [`DeviceDescriptor::sdk_int`] rather than behind a [`Field`].
pub const SDK_INT_PROPERTY: &str = "ro.build.version.sdk";

/// Device and build properties captured for one check.
///
/// Every field is optional; an absent field never matches a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceDescriptor {
    pub manufacturer: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub device: Option<String>,
    pub product: Option<String>,
    pub board: Option<String>,
    pub hardware: Option<String>,
    pub fingerprint: Option<String>,
    pub host: Option<String>,
    pub bootloader: Option<String>,
    pub radio_version: Option<String>,
    pub os_version: Option<String>,
    pub sdk_int: Option<u32>,
    pub incremental: Option<String>,
    pub codename: Option<String>,
    pub architecture: Option<String>,
    pub kernel_qemu: Option<String>,
    pub runtime_name: Option<String>,
    pub runtime_version: Option<String>,
}

impl DeviceDescriptor {
    /// Snapshot the running device from `source` plus `uname(2)`.
    pub fn from_source(source: &dyn PropertySource) -> Self {
        Self::default().filled_from(source)
    }

    /// Read the fields that are still absent from `source`.
    ///
    /// Present fields are kept as they are and their properties are never
    /// read, so a fully populated descriptor costs no property reads.
    pub fn filled_from(mut self, source: &dyn PropertySource) -> Self {
        for field in Field::ALL {
            let Some(key) = field.property_key() else {
                continue;
            };
            let slot = self.slot_mut(field);
            if slot.is_none() {
                *slot = source.get(key);
            }
        }

        if self.sdk_int.is_none() {
            self.sdk_int = source
                .get(SDK_INT_PROPERTY)
                .and_then(|sdk| sdk.trim().parse().ok());
        }
        if self.architecture.is_none() {
            self.architecture = machine_architecture().ok();
        }
        self
    }

    /// Value of `field`; empty strings count as absent.
    pub fn field(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref().filter(|v| !v.is_empty())
    }

    /// Set `field` to `value`.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::Manufacturer => &self.manufacturer,
            Field::Brand => &self.brand,
            Field::Model => &self.model,
            Field::Device => &self.device,
            Field::Product => &self.product,
            Field::Board => &self.board,
            Field::Hardware => &self.hardware,
            Field::Fingerprint => &self.fingerprint,
            Field::Host => &self.host,
            Field::Bootloader => &self.bootloader,
            Field::RadioVersion => &self.radio_version,
            Field::OsVersion => &self.os_version,
            Field::Incremental => &self.incremental,
            Field::Codename => &self.codename,
            Field::Architecture => &self.architecture,
            Field::KernelQemu => &self.kernel_qemu,
            Field::RuntimeName => &self.runtime_name,
            Field::RuntimeVersion => &self.runtime_version,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Manufacturer => &mut self.manufacturer,
            Field::Brand => &mut self.brand,
            Field::Model => &mut self.model,
            Field::Device => &mut self.device,
            Field::Product => &mut self.product,
            Field::Board => &mut self.board,
            Field::Hardware => &mut self.hardware,
            Field::Fingerprint => &mut self.fingerprint,
            Field::Host => &mut self.host,
            Field::Bootloader => &mut self.bootloader,
            Field::RadioVersion => &mut self.radio_version,
            Field::OsVersion => &mut self.os_version,
            Field::Incremental => &mut self.incremental,
            Field::Codename => &mut self.codename,
            Field::Architecture => &mut self.architecture,
            Field::KernelQemu => &mut self.kernel_qemu,
            Field::RuntimeName => &mut self.runtime_name,
            Field::RuntimeVersion => &mut self.runtime_version,
        }
    }

    /// Overlay `self` on `base`: fields present here win.
    pub fn merged_over(self, base: DeviceDescriptor) -> DeviceDescriptor {
        DeviceDescriptor {
            manufacturer: self.manufacturer.or(base.manufacturer),
            brand: self.brand.or(base.brand),
            model: self.model.or(base.model),
            device: self.device.or(base.device),
            product: self.product.or(base.product),
            board: self.board.or(base.board),
            hardware: self.hardware.or(base.hardware),
            fingerprint: self.fingerprint.or(base.fingerprint),
            host: self.host.or(base.host),
            bootloader: self.bootloader.or(base.bootloader),
            radio_version: self.radio_version.or(base.radio_version),
            os_version: self.os_version.or(base.os_version),
            sdk_int: self.sdk_int.or(base.sdk_int),
            incremental: self.incremental.or(base.incremental),
            codename: self.codename.or(base.codename),
            architecture: self.architecture.or(base.architecture),
            kernel_qemu: self.kernel_qemu.or(base.kernel_qemu),
            runtime_name: self.runtime_name.or(base.runtime_name),
            runtime_version: self.runtime_version.or(base.runtime_version),
        }
    }
}
