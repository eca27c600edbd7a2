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

//! # Prism Service
//!
//! The settings facade consumed by host shells, together with the pieces it
//! is assembled from: the backend fallback chain, the adapter registry and the
//! service configuration.
//!
//! ```no_run
//! use prism_core::{SettingKey, SettingValue};
//! use prism_service::{ServiceConfig, SettingsService};
//!
//! let service = SettingsService::new(&ServiceConfig::default());
//! service.initialize()?;
//! for adapter in service.list_adapters() {
//!     service.apply_setting(&adapter.id, SettingKey::VSync, SettingValue::Bool(true))?;
//! }
//! service.shutdown();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod registry;
pub mod selector;
pub mod service;

pub use config::ServiceConfig;
pub use registry::{adapter_id, AdapterRegistry, RegistryEntry};
pub use selector::{BackendSelector, Selection, SelectorState};
pub use service::SettingsService;
