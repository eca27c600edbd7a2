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

//! The contract every driver generation implements.
//!
//! A [`BackendDriver`] is cheap to construct and does nothing until
//! [`open`](BackendDriver::open) is called. A successful `open` hands back an
//! owned [`BackendSession`] which holds the foreign resource; every adapter or
//! property call goes through that session, so no driver keeps ambient state.

use crate::adapter::RawAdapterRecord;
use crate::capability::CapabilitySet;
use crate::error::BackendError;
use crate::setting::{SettingKey, SettingValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of driver generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    /// Modern context-based driver API with per-adapter properties.
    Context,
    /// Legacy global-state driver API. Enumeration only.
    Legacy,
    /// Deterministic in-memory backend that never fails.
    Simulation,
}

impl BackendKind {
    /// The fixed priority order tried at initialization.
    pub const PRIORITY: [BackendKind; 3] = [
        BackendKind::Context,
        BackendKind::Legacy,
        BackendKind::Simulation,
    ];

    /// Short, stable tag used when encoding adapter ids.
    pub fn tag(self) -> &'static str {
        match self {
            BackendKind::Context => "ctx",
            BackendKind::Legacy => "legacy",
            BackendKind::Simulation => "sim",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Context => write!(f, "context driver"),
            BackendKind::Legacy => write!(f, "legacy driver"),
            BackendKind::Simulation => write!(f, "simulation"),
        }
    }
}

/// A factory for sessions of one driver generation.
pub trait BackendDriver: Send {
    /// The generation this driver binds to.
    fn kind(&self) -> BackendKind;

    /// Performs the driver's startup handshake.
    ///
    /// # Errors
    ///
    /// [`BackendError::Unavailable`] if the driver library cannot be loaded,
    /// [`BackendError::Rejected`] if the handshake returns a nonzero status.
    fn open(&self) -> Result<Box<dyn BackendSession>, BackendError>;
}

/// An open connection to a driver, owning the foreign resource.
///
/// Adapter indices passed in must come from this session's own
/// [`list_adapters`](BackendSession::list_adapters).
pub trait BackendSession: Send {
    /// The generation that produced this session.
    fn kind(&self) -> BackendKind;

    /// Enumerates adapters. Returns an empty list on any driver failure:
    /// zero adapters is a legitimate outcome.
    fn list_adapters(&mut self) -> Vec<RawAdapterRecord>;

    /// Computes the capability flags of one adapter. Never cached.
    fn capabilities(&mut self, adapter_index: i32) -> CapabilitySet;

    /// Whether the flag gating `key` is granted on one adapter.
    ///
    /// Sessions that can answer for a single key more cheaply than with a
    /// full [`capabilities`](Self::capabilities) query override this.
    fn supports(&mut self, adapter_index: i32, key: SettingKey) -> bool {
        self.capabilities(adapter_index).permits(key)
    }

    /// Reads one property. `Ok(None)` means supported but not currently set.
    fn get_property(
        &mut self,
        adapter_index: i32,
        key: SettingKey,
    ) -> Result<Option<SettingValue>, BackendError>;

    /// Writes one property in a single driver call.
    fn set_property(
        &mut self,
        adapter_index: i32,
        key: SettingKey,
        value: &SettingValue,
    ) -> Result<(), BackendError>;

    /// Releases the foreign resource. Consumes the session.
    fn close(self: Box<Self>);
}
