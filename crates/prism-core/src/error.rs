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

//! Defines the hierarchy of error types for the settings service.
//!
//! [`BackendError`] stays local to a driver binding and the selector.
//! [`SettingError`] is the uniform taxonomy returned by the facade, and
//! [`InitError`] reports a fallback chain that ran out of backends.

use crate::adapter::AdapterId;
use crate::backend::BackendKind;
use crate::setting::{SettingKey, SettingValue, ValueDomain};
use std::fmt;

/// An error raised by one driver binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The driver library or one of its mandatory entry points is missing.
    Unavailable(String),
    /// The startup handshake returned a nonzero status.
    Rejected {
        /// The status returned by the handshake.
        status: i32,
    },
    /// The backend does not implement this key.
    CapabilityUnsupported(SettingKey),
    /// A driver call returned a failure status.
    CallFailed {
        /// Name of the failing entry point.
        call: &'static str,
        /// The status it returned.
        status: i32,
    },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Unavailable(msg) => write!(f, "Driver backend unavailable: {msg}"),
            BackendError::Rejected { status } => {
                write!(f, "Driver handshake rejected with status {status}")
            }
            BackendError::CapabilityUnsupported(key) => {
                write!(f, "Setting {key} is not supported by this backend")
            }
            BackendError::CallFailed { call, status } => {
                write!(f, "Driver call {call} failed with status {status}")
            }
        }
    }
}

impl std::error::Error for BackendError {}

/// One failed step of the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendAttempt {
    /// The backend that was tried.
    pub kind: BackendKind,
    /// Why it did not become active.
    pub error: BackendError,
}

/// The fallback chain could not activate any backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    /// Every configured backend failed to open.
    Exhausted {
        /// The failures, in the order the backends were tried.
        attempts: Vec<BackendAttempt>,
    },
    /// The chain was empty.
    NoBackendsConfigured,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Exhausted { attempts } => {
                write!(f, "All driver backends failed:")?;
                for attempt in attempts {
                    write!(f, " [{}: {}]", attempt.kind, attempt.error)?;
                }
                Ok(())
            }
            InitError::NoBackendsConfigured => write!(f, "No driver backends are configured."),
        }
    }
}

impl std::error::Error for InitError {}

/// The uniform error taxonomy returned by the settings facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingError {
    /// The operation ran before `initialize` or after `shutdown`.
    ServiceNotInitialized,
    /// No driver backend could be used.
    BackendUnavailable(String),
    /// The driver refused the call.
    BackendRejected {
        /// The driver's status code.
        status: i32,
    },
    /// The id is not in the adapter registry.
    AdapterNotFound(AdapterId),
    /// The active backend or the adapter does not support this key.
    CapabilityUnsupported {
        /// The adapter the call targeted.
        adapter: AdapterId,
        /// The unsupported key.
        key: SettingKey,
    },
    /// The value's tag or range does not match the key's domain.
    ValueDomainMismatch {
        /// The key being written.
        key: SettingKey,
        /// The key's declared domain.
        expected: ValueDomain,
        /// The rejected value.
        found: SettingValue,
    },
    /// The key is supported but the backend holds no value for it.
    ValueNotSet {
        /// The adapter the call targeted.
        adapter: AdapterId,
        /// The key with no value.
        key: SettingKey,
    },
}

impl SettingError {
    /// Translates a backend error raised while serving `adapter`.
    pub fn from_backend(err: BackendError, adapter: &AdapterId) -> Self {
        match err {
            BackendError::Unavailable(msg) => SettingError::BackendUnavailable(msg),
            BackendError::Rejected { status } | BackendError::CallFailed { status, .. } => {
                SettingError::BackendRejected { status }
            }
            BackendError::CapabilityUnsupported(key) => SettingError::CapabilityUnsupported {
                adapter: adapter.clone(),
                key,
            },
        }
    }
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::ServiceNotInitialized => {
                write!(f, "The settings service is not initialized.")
            }
            SettingError::BackendUnavailable(msg) => {
                write!(f, "No usable driver backend: {msg}")
            }
            SettingError::BackendRejected { status } => {
                write!(f, "The driver rejected the call with status {status}")
            }
            SettingError::AdapterNotFound(id) => write!(f, "Adapter not found: {id}"),
            SettingError::CapabilityUnsupported { adapter, key } => {
                write!(f, "Setting {key} is not supported on adapter {adapter}")
            }
            SettingError::ValueDomainMismatch {
                key,
                expected,
                found,
            } => write!(
                f,
                "Value '{found}' ({}) does not fit {key}, expected {expected}",
                found.tag()
            ),
            SettingError::ValueNotSet { adapter, key } => {
                write!(f, "Setting {key} has no value on adapter {adapter}")
            }
        }
    }
}

impl std::error::Error for SettingError {}

impl From<InitError> for SettingError {
    fn from(err: InitError) -> Self {
        SettingError::BackendUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_backend_error_keeps_adapter_and_key() {
        let id = AdapterId::new("legacy:0");
        let err = SettingError::from_backend(
            BackendError::CapabilityUnsupported(SettingKey::VSync),
            &id,
        );
        assert_eq!(
            err,
            SettingError::CapabilityUnsupported {
                adapter: id,
                key: SettingKey::VSync
            }
        );
    }

    #[test]
    fn failed_calls_surface_the_driver_status() {
        let err = SettingError::from_backend(
            BackendError::CallFailed {
                call: "ADL2_Adapter_3DSetting_Set",
                status: -3,
            },
            &AdapterId::new("ctx:0"),
        );
        assert_eq!(err, SettingError::BackendRejected { status: -3 });
        assert_eq!(
            format!("{err}"),
            "The driver rejected the call with status -3"
        );
    }

    #[test]
    fn domain_mismatch_display() {
        let err = SettingError::ValueDomainMismatch {
            key: SettingKey::AnisotropicFiltering,
            expected: SettingKey::AnisotropicFiltering.domain(),
            found: SettingValue::from("not-a-bool"),
        };
        assert_eq!(
            format!("{err}"),
            "Value 'not-a-bool' (choice) does not fit AnisotropicFiltering, expected boolean"
        );
    }

    #[test]
    fn init_error_lists_every_attempt() {
        let err = InitError::Exhausted {
            attempts: vec![
                BackendAttempt {
                    kind: BackendKind::Context,
                    error: BackendError::Unavailable("atiadlxx.dll".to_string()),
                },
                BackendAttempt {
                    kind: BackendKind::Legacy,
                    error: BackendError::Rejected { status: -1 },
                },
            ],
        };
        assert_eq!(
            format!("{err}"),
            "All driver backends failed: [context driver: Driver backend unavailable: atiadlxx.dll] [legacy driver: Driver handshake rejected with status -1]"
        );
    }
}
