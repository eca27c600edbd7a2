// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Adapter identity and the backend-neutral adapter record.

use std::fmt;

/// PCI vendor id for AMD/ATI.
pub const VENDOR_AMD: i32 = 0x1002;
/// PCI vendor id for NVIDIA.
pub const VENDOR_NVIDIA: i32 = 0x10DE;
/// PCI vendor id for Intel.
pub const VENDOR_INTEL: i32 = 0x8086;

/// An opaque, stable identifier for an adapter.
///
/// Callers may compare and display it; the encoding is owned by the registry
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdapterId(String);

impl AdapterId {
    /// Wraps a raw id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AdapterId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Provides standardized, backend-agnostic information about a graphics adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterIdentity {
    /// Stable identifier, derived from the backend's own adapter index.
    pub id: AdapterId,
    /// Human-readable vendor name (e.g., "AMD").
    pub vendor: String,
    /// The name of the adapter (e.g., "AMD Radeon RX 7900 XTX").
    pub name: String,
    /// `true` if the adapter is integrated into the CPU package.
    pub is_integrated: bool,
}

impl fmt::Display for AdapterIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.vendor)
    }
}

/// One adapter record as reported by a backend, copied out of the driver's
/// fixed-layout structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAdapterRecord {
    /// The driver-assigned adapter index used for every later property call.
    pub index: i32,
    /// Unique device id string. Several records may share it when the driver
    /// reports one logical adapter per output.
    pub udid: String,
    /// PCI bus number.
    pub bus_number: i32,
    /// PCI device number.
    pub device_number: i32,
    /// PCI function number.
    pub function_number: i32,
    /// PCI vendor id.
    pub vendor_id: i32,
    /// Adapter (product) name.
    pub adapter_name: String,
    /// OS display device name.
    pub display_name: String,
    /// Whether the adapter is present.
    pub present: bool,
    /// Whether the adapter exists from the OS point of view.
    pub exists: bool,
    /// Integrated/discrete classification, when the backend can tell.
    pub integrated: Option<bool>,
}

/// Returns a human-readable vendor name for a PCI vendor id.
pub fn vendor_name(vendor_id: i32) -> String {
    match vendor_id {
        VENDOR_AMD => "AMD".to_string(),
        VENDOR_NVIDIA => "NVIDIA".to_string(),
        VENDOR_INTEL => "Intel".to_string(),
        other => format!("Unknown (0x{other:04X})"),
    }
}
