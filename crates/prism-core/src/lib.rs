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

//! # Prism Core
//!
//! Foundational crate containing the capability model, setting metadata, the
//! error taxonomy and the backend contracts shared by every driver binding.
//!
//! Concrete driver bindings live in `prism-infra`; the selector, the adapter
//! registry and the settings facade live in `prism-service`.

#![warn(missing_docs)]

pub mod adapter;
pub mod backend;
pub mod capability;
pub mod error;
pub mod event;
pub mod setting;

pub use adapter::{vendor_name, AdapterId, AdapterIdentity, RawAdapterRecord};
pub use backend::{BackendDriver, BackendKind, BackendSession};
pub use capability::CapabilitySet;
pub use error::{BackendAttempt, BackendError, InitError, SettingError};
pub use event::{ErrorNotification, EventBus, Operation};
pub use setting::{SettingKey, SettingValue, ValueDomain};
