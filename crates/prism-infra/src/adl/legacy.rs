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

//! Binding to the legacy (`ADL_*`) driver generation.
//!
//! The legacy API keeps its state inside the driver and has no handle. The
//! session stands in for that state: it exists between a successful create
//! and the matching destroy. This generation can only enumerate adapters;
//! every property call reports `CapabilityUnsupported`.

use super::convert;
use super::ffi;
use super::library::{default_library_names, DriverLibrary};
use prism_core::{
    BackendDriver, BackendError, BackendKind, BackendSession, CapabilitySet, RawAdapterRecord,
    SettingKey, SettingValue,
};
use std::os::raw::c_int;

/// Opens sessions against the legacy driver API.
#[derive(Debug, Clone)]
pub struct LegacyDriver {
    library_names: Vec<String>,
    enumerate_connected_only: bool,
}

impl LegacyDriver {
    /// Creates a driver that tries `library_names` in order.
    pub fn new(library_names: Vec<String>, enumerate_connected_only: bool) -> Self {
        Self {
            library_names,
            enumerate_connected_only,
        }
    }
}

impl Default for LegacyDriver {
    fn default() -> Self {
        Self::new(default_library_names(), true)
    }
}

impl BackendDriver for LegacyDriver {
    fn kind(&self) -> BackendKind {
        BackendKind::Legacy
    }

    fn open(&self) -> Result<Box<dyn BackendSession>, BackendError> {
        let library = DriverLibrary::load(&self.library_names)?;
        let api = LegacyApi {
            create: library.require("ADL_Main_Control_Create")?,
            destroy: library.require("ADL_Main_Control_Destroy")?,
            adapter_count: library.require("ADL_Adapter_NumberOfAdapters_Get")?,
            adapter_info: library.require("ADL_Adapter_AdapterInfo_Get")?,
        };

        // SAFETY: `create` was resolved from the loaded library with its C signature.
        let status =
            unsafe { (api.create)(ffi::adl_malloc, c_int::from(self.enumerate_connected_only)) };
        if status != ffi::ADL_OK {
            log::warn!("ADL_Main_Control_Create returned status {status}.");
            return Err(BackendError::Rejected { status });
        }

        log::info!("Legacy driver session opened via '{}'.", library.name());
        Ok(Box::new(LegacySession {
            api,
            released: false,
            _library: library,
        }))
    }
}

#[derive(Clone, Copy)]
struct LegacyApi {
    create: ffi::MainControlCreate,
    destroy: ffi::MainControlDestroy,
    adapter_count: ffi::NumberOfAdaptersGet,
    adapter_info: ffi::AdapterInfoGet,
}

struct LegacySession {
    api: LegacyApi,
    released: bool,
    _library: DriverLibrary,
}

impl LegacySession {
    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        // SAFETY: paired with the successful create in `open`.
        let status = unsafe { (self.api.destroy)() };
        if !ffi::succeeded(status) {
            log::warn!("ADL_Main_Control_Destroy returned status {status}.");
        }
        log::info!("Legacy driver session closed.");
    }
}

impl BackendSession for LegacySession {
    fn kind(&self) -> BackendKind {
        BackendKind::Legacy
    }

    fn list_adapters(&mut self) -> Vec<RawAdapterRecord> {
        let api = self.api;
        let records = convert::read_adapter_records(
            // SAFETY: the driver is initialised; out-pointer and buffer are owned by the caller.
            |count| unsafe { (api.adapter_count)(count) },
            |buffer, size| unsafe { (api.adapter_info)(buffer, size) },
        );
        log::debug!("Legacy driver reported {} adapter record(s).", records.len());
        records
    }

    fn capabilities(&mut self, _adapter_index: i32) -> CapabilitySet {
        CapabilitySet::none()
    }

    fn get_property(
        &mut self,
        _adapter_index: i32,
        key: SettingKey,
    ) -> Result<Option<SettingValue>, BackendError> {
        Err(BackendError::CapabilityUnsupported(key))
    }

    fn set_property(
        &mut self,
        _adapter_index: i32,
        key: SettingKey,
        _value: &SettingValue,
    ) -> Result<(), BackendError> {
        Err(BackendError::CapabilityUnsupported(key))
    }

    fn close(mut self: Box<Self>) {
        self.release();
    }
}

impl Drop for LegacySession {
    fn drop(&mut self) {
        self.release();
    }
}
