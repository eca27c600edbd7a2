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

//! A deterministic in-memory backend.
//!
//! It never fails to open, always reports the same two adapters with every
//! capability granted, and stores written values in memory for the lifetime
//! of the session.

use crate::adl::ffi::{ADL_ERR_INVALID_ADL_IDX, ADL_ERR_INVALID_PARAM};
use prism_core::adapter::{VENDOR_AMD, VENDOR_INTEL};
use prism_core::{
    BackendDriver, BackendError, BackendKind, BackendSession, CapabilitySet, RawAdapterRecord,
    SettingKey, SettingValue,
};
use std::collections::HashMap;

const STATUS_INVALID_PARAM: i32 = ADL_ERR_INVALID_PARAM;
const STATUS_INVALID_ADAPTER: i32 = ADL_ERR_INVALID_ADL_IDX;

/// Opens simulated sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationDriver;

impl SimulationDriver {
    /// Creates the simulation driver.
    pub fn new() -> Self {
        Self
    }
}

impl BackendDriver for SimulationDriver {
    fn kind(&self) -> BackendKind {
        BackendKind::Simulation
    }

    fn open(&self) -> Result<Box<dyn BackendSession>, BackendError> {
        log::info!("Simulation session opened.");
        Ok(Box::new(SimulationSession::new()))
    }
}

fn simulated_adapter(index: i32, vendor_id: i32, name: &str, udid: &str) -> RawAdapterRecord {
    RawAdapterRecord {
        index,
        udid: udid.to_string(),
        vendor_id,
        adapter_name: name.to_string(),
        display_name: format!(r"\\.\DISPLAY{}", index + 1),
        present: true,
        exists: true,
        integrated: Some(true),
        ..RawAdapterRecord::default()
    }
}

fn default_settings() -> [(SettingKey, SettingValue); 7] {
    [
        (SettingKey::AnisotropicFiltering, SettingValue::Bool(true)),
        (SettingKey::AnisotropicLevel, SettingValue::Int(8)),
        (SettingKey::TextureQuality, SettingValue::from("Balanced")),
        (SettingKey::TessellationLevel, SettingValue::Int(2)),
        (SettingKey::ShaderCache, SettingValue::Bool(true)),
        (SettingKey::VSync, SettingValue::Bool(false)),
        (SettingKey::PowerProfile, SettingValue::from("Balanced")),
    ]
}

struct SimulationSession {
    adapters: Vec<RawAdapterRecord>,
    store: HashMap<(i32, SettingKey), SettingValue>,
}

impl SimulationSession {
    fn new() -> Self {
        let adapters = vec![
            simulated_adapter(0, VENDOR_INTEL, "Intel(R) UHD Graphics 620", "SIM-INTEL-0"),
            simulated_adapter(1, VENDOR_AMD, "Radeon Vega 3 (Simulated)", "SIM-AMD-1"),
        ];
        let store = adapters
            .iter()
            .flat_map(|adapter| {
                default_settings()
                    .into_iter()
                    .map(move |(key, value)| ((adapter.index, key), value))
            })
            .collect();
        Self { adapters, store }
    }

    fn check_adapter(&self, adapter_index: i32, call: &'static str) -> Result<(), BackendError> {
        if self.adapters.iter().any(|a| a.index == adapter_index) {
            Ok(())
        } else {
            Err(BackendError::CallFailed {
                call,
                status: STATUS_INVALID_ADAPTER,
            })
        }
    }
}

impl BackendSession for SimulationSession {
    fn kind(&self) -> BackendKind {
        BackendKind::Simulation
    }

    fn list_adapters(&mut self) -> Vec<RawAdapterRecord> {
        self.adapters.clone()
    }

    fn capabilities(&mut self, adapter_index: i32) -> CapabilitySet {
        match self.check_adapter(adapter_index, "capabilities") {
            Ok(()) => CapabilitySet::all(),
            Err(_) => CapabilitySet::none(),
        }
    }

    fn get_property(
        &mut self,
        adapter_index: i32,
        key: SettingKey,
    ) -> Result<Option<SettingValue>, BackendError> {
        self.check_adapter(adapter_index, "get_property")?;
        Ok(self.store.get(&(adapter_index, key)).cloned())
    }

    fn set_property(
        &mut self,
        adapter_index: i32,
        key: SettingKey,
        value: &SettingValue,
    ) -> Result<(), BackendError> {
        self.check_adapter(adapter_index, "set_property")?;
        if !key.domain().accepts(value) {
            return Err(BackendError::CallFailed {
                call: "set_property",
                status: STATUS_INVALID_PARAM,
            });
        }
        log::debug!("Simulation: adapter {adapter_index} {key} = {value}");
        self.store.insert((adapter_index, key), value.clone());
        Ok(())
    }

    fn close(self: Box<Self>) {
        log::info!("Simulation session closed.");
    }
}
