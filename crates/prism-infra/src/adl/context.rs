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

//! Binding to the context-based (`ADL2_*`) driver generation.

use super::convert;
use super::ffi::{self, AdlContext};
use super::library::{default_library_names, DriverLibrary};
use prism_core::{
    BackendDriver, BackendError, BackendKind, BackendSession, CapabilitySet, RawAdapterRecord,
    SettingKey, SettingValue,
};
use std::os::raw::c_int;
use std::ptr;

/// Opens sessions against the context-based driver API.
#[derive(Debug, Clone)]
pub struct ContextDriver {
    library_names: Vec<String>,
    enumerate_connected_only: bool,
}

impl ContextDriver {
    /// Creates a driver that tries `library_names` in order.
    pub fn new(library_names: Vec<String>, enumerate_connected_only: bool) -> Self {
        Self {
            library_names,
            enumerate_connected_only,
        }
    }
}

impl Default for ContextDriver {
    fn default() -> Self {
        Self::new(default_library_names(), true)
    }
}

impl BackendDriver for ContextDriver {
    fn kind(&self) -> BackendKind {
        BackendKind::Context
    }

    fn open(&self) -> Result<Box<dyn BackendSession>, BackendError> {
        let library = DriverLibrary::load(&self.library_names)?;
        let api = ContextApi {
            create: library.require("ADL2_Main_Control_Create")?,
            destroy: library.require("ADL2_Main_Control_Destroy")?,
            adapter_count: library.require("ADL2_Adapter_NumberOfAdapters_Get")?,
            adapter_info: library.require("ADL2_Adapter_AdapterInfo_Get")?,
            asic_family: library.optional("ADL2_Adapter_ASICFamilyType_Get"),
            setting_get: library.optional("ADL2_Adapter_3DSetting_Get"),
            setting_set: library.optional("ADL2_Adapter_3DSetting_Set"),
        };

        let mut context: AdlContext = ptr::null_mut();
        // SAFETY: `create` was resolved from the loaded library with its C
        // signature; `context` is a valid out-pointer.
        let status = unsafe {
            (api.create)(
                ffi::adl_malloc,
                c_int::from(self.enumerate_connected_only),
                &mut context,
            )
        };
        if status != ffi::ADL_OK {
            log::warn!("ADL2_Main_Control_Create returned status {status}.");
            return Err(BackendError::Rejected { status });
        }
        if context.is_null() {
            log::warn!("ADL2_Main_Control_Create succeeded without a context.");
            return Err(BackendError::Rejected { status: ffi::ADL_ERR });
        }

        log::info!(
            "Context driver session opened via '{}' (properties: {}).",
            library.name(),
            if api.setting_get.is_some() && api.setting_set.is_some() {
                "available"
            } else {
                "not exported"
            }
        );

        Ok(Box::new(ContextSession {
            context,
            api,
            released: false,
            _library: library,
        }))
    }
}

#[derive(Clone, Copy)]
struct ContextApi {
    create: ffi::Main2ControlCreate,
    destroy: ffi::Main2ControlDestroy,
    adapter_count: ffi::NumberOfAdapters2Get,
    adapter_info: ffi::AdapterInfo2Get,
    asic_family: Option<ffi::AsicFamilyType2Get>,
    setting_get: Option<ffi::Setting3D2Get>,
    setting_set: Option<ffi::Setting3D2Set>,
}

/// An open driver context. Destroyed exactly once, on close or drop.
struct ContextSession {
    context: AdlContext,
    api: ContextApi,
    released: bool,
    // Unloaded only after `Drop` has run `destroy`.
    _library: DriverLibrary,
}

// SAFETY: the context is only ever used through `&mut self`, so the foreign
// handle is never touched from two threads at once.
unsafe impl Send for ContextSession {}

impl ContextSession {
    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        // SAFETY: the context came from a successful create and has not been destroyed.
        let status = unsafe { (self.api.destroy)(self.context) };
        if !ffi::succeeded(status) {
            log::warn!("ADL2_Main_Control_Destroy returned status {status}.");
        }
        self.context = ptr::null_mut();
        log::info!("Context driver session closed.");
    }

    fn is_integrated(&self, adapter_index: c_int) -> Option<bool> {
        let asic_family = self.api.asic_family?;
        let mut types: c_int = 0;
        let mut valids: c_int = 0;
        // SAFETY: live context, valid out-pointers.
        let status = unsafe { asic_family(self.context, adapter_index, &mut types, &mut valids) };
        if !ffi::succeeded(status) || valids & ffi::ADL_ASIC_INTEGRATED == 0 {
            return None;
        }
        Some(types & ffi::ADL_ASIC_INTEGRATED != 0)
    }

    fn read_raw(&self, adapter_index: i32, key: SettingKey) -> Result<c_int, BackendError> {
        let setting_get = self
            .api
            .setting_get
            .ok_or(BackendError::CapabilityUnsupported(key))?;
        let mut raw: c_int = 0;
        // SAFETY: live context, valid out-pointer.
        let status = unsafe {
            setting_get(
                self.context,
                adapter_index,
                convert::setting_id(key),
                &mut raw,
            )
        };
        convert::check_status("ADL2_Adapter_3DSetting_Get", key, status)?;
        Ok(raw)
    }

    fn has_property_entry_points(&self) -> bool {
        self.api.setting_get.is_some() && self.api.setting_set.is_some()
    }
}

impl BackendSession for ContextSession {
    fn kind(&self) -> BackendKind {
        BackendKind::Context
    }

    fn list_adapters(&mut self) -> Vec<RawAdapterRecord> {
        let context = self.context;
        let api = self.api;
        let mut records = convert::read_adapter_records(
            // SAFETY: live context; the out-pointer and the buffer are owned by the caller.
            |count| unsafe { (api.adapter_count)(context, count) },
            |buffer, size| unsafe { (api.adapter_info)(context, buffer, size) },
        );
        for record in &mut records {
            record.integrated = self.is_integrated(record.index);
        }
        log::debug!("Context driver reported {} adapter record(s).", records.len());
        records
    }

    fn capabilities(&mut self, adapter_index: i32) -> CapabilitySet {
        if !self.has_property_entry_points() {
            return CapabilitySet::none();
        }
        let probe = |key| convert::probe_grants(&self.read_raw(adapter_index, key));
        CapabilitySet {
            supports_anisotropic: probe(SettingKey::AnisotropicFiltering),
            supports_tessellation_control: probe(SettingKey::TessellationLevel),
            supports_shader_cache: probe(SettingKey::ShaderCache),
            supports_power_profiles: probe(SettingKey::PowerProfile),
        }
    }

    fn supports(&mut self, adapter_index: i32, key: SettingKey) -> bool {
        self.has_property_entry_points()
            && convert::probe_grants(&self.read_raw(adapter_index, key))
    }

    fn get_property(
        &mut self,
        adapter_index: i32,
        key: SettingKey,
    ) -> Result<Option<SettingValue>, BackendError> {
        let raw = self.read_raw(adapter_index, key)?;
        match convert::decode(key, raw) {
            Some(value) => Ok(Some(value)),
            None => {
                log::warn!("Driver returned out-of-domain value {raw} for {key}.");
                Err(BackendError::CallFailed {
                    call: "ADL2_Adapter_3DSetting_Get",
                    status: ffi::ADL_ERR,
                })
            }
        }
    }

    fn set_property(
        &mut self,
        adapter_index: i32,
        key: SettingKey,
        value: &SettingValue,
    ) -> Result<(), BackendError> {
        let setting_set = self
            .api
            .setting_set
            .ok_or(BackendError::CapabilityUnsupported(key))?;
        let raw = convert::encode(key, value).ok_or(BackendError::CallFailed {
            call: "ADL2_Adapter_3DSetting_Set",
            status: ffi::ADL_ERR_INVALID_PARAM,
        })?;
        // SAFETY: live context; plain integer arguments.
        let status =
            unsafe { setting_set(self.context, adapter_index, convert::setting_id(key), raw) };
        convert::check_status("ADL2_Adapter_3DSetting_Set", key, status)
    }

    fn close(mut self: Box<Self>) {
        self.release();
    }
}

impl Drop for ContextSession {
    fn drop(&mut self) {
        self.release();
    }
}
