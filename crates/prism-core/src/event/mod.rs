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

//! Error notifications published by the settings facade.

mod bus;

pub use self::bus::EventBus;

use crate::error::SettingError;
use std::fmt;

/// The facade operation that produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `initialize`.
    Initialize,
    /// `list_adapters`.
    ListAdapters,
    /// `refresh_adapters`.
    RefreshAdapters,
    /// `get_capabilities`.
    GetCapabilities,
    /// `get_setting`.
    GetSetting,
    /// `apply_setting`.
    ApplySetting,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Initialize => "initialize",
            Operation::ListAdapters => "list_adapters",
            Operation::RefreshAdapters => "refresh_adapters",
            Operation::GetCapabilities => "get_capabilities",
            Operation::GetSetting => "get_setting",
            Operation::ApplySetting => "apply_setting",
        };
        f.write_str(name)
    }
}

/// A recoverable failure, mirrored from a facade return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotification {
    /// Where the failure happened.
    pub operation: Operation,
    /// The error also returned to the caller.
    pub error: SettingError,
}

impl fmt::Display for ErrorNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.operation, self.error)
    }
}
