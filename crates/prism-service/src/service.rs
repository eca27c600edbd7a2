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

//! The settings facade consumed by host shells.

use crate::config::ServiceConfig;
use crate::registry::{AdapterRegistry, RegistryEntry};
use crate::selector::{BackendSelector, SelectorState};
use prism_core::{
    AdapterId, AdapterIdentity, BackendDriver, BackendKind, BackendSession, CapabilitySet,
    ErrorNotification, EventBus, InitError, Operation, SettingError, SettingKey, SettingValue,
};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The session and the registry it produced. Replaced together, never apart.
struct ActiveBackend {
    session: Box<dyn BackendSession>,
    registry: AdapterRegistry,
}

struct ServiceState {
    selector: BackendSelector,
    active: Option<ActiveBackend>,
}

/// Uniform get/set/capability access to per-adapter rendering settings.
///
/// Every driver call goes through one session guarded by an internal mutex,
/// so the service can be shared between threads. Every recoverable failure is
/// returned to the caller and also published to
/// [`subscribe`](Self::subscribe) receivers.
pub struct SettingsService {
    state: Mutex<ServiceState>,
    notifications: EventBus<ErrorNotification>,
}

impl SettingsService {
    /// Creates a service over the fallback chain described by `config`.
    pub fn new(config: &ServiceConfig) -> Self {
        Self::with_drivers(config.build_drivers(), config.notification_capacity)
    }

    /// Creates a service over an explicit chain, highest priority first.
    pub fn with_drivers(
        drivers: Vec<Box<dyn BackendDriver>>,
        notification_capacity: usize,
    ) -> Self {
        Self {
            state: Mutex::new(ServiceState {
                selector: BackendSelector::new(drivers),
                active: None,
            }),
            notifications: EventBus::bounded(notification_capacity.max(1)),
        }
    }

    /// Returns a receiver for error notifications.
    pub fn subscribe(&self) -> flume::Receiver<ErrorNotification> {
        self.notifications.subscribe()
    }

    /// Runs the fallback chain. A no-op if a backend is already active.
    pub fn initialize(&self) -> Result<(), InitError> {
        let mut state = self.lock();
        if let Some(active) = &state.active {
            log::debug!(
                "initialize() called while the {} backend is active; nothing to do.",
                active.session.kind()
            );
            return Ok(());
        }

        match state.selector.select() {
            Ok(selection) => {
                let mut session = selection.session;
                let registry = AdapterRegistry::build(session.as_mut());
                state.active = Some(ActiveBackend { session, registry });
                Ok(())
            }
            Err(err) => {
                log::error!("Settings service initialization failed: {err}");
                self.publish(Operation::Initialize, SettingError::from(err.clone()));
                Err(err)
            }
        }
    }

    /// The backend currently serving requests.
    pub fn active_backend(&self) -> Option<BackendKind> {
        match self.lock().selector.state() {
            SelectorState::Active(kind) => Some(kind),
            SelectorState::Uninitialized | SelectorState::Exhausted => None,
        }
    }

    /// Snapshot of the registered adapters. Does not touch the driver.
    pub fn list_adapters(&self) -> Vec<AdapterIdentity> {
        let state = self.lock();
        match &state.active {
            Some(active) => active.registry.identities(),
            None => {
                self.publish(Operation::ListAdapters, SettingError::ServiceNotInitialized);
                Vec::new()
            }
        }
    }

    /// Re-enumerates adapters on the active session and rebuilds the registry.
    pub fn refresh_adapters(&self) -> Result<usize, SettingError> {
        let mut state = self.lock();
        let result = match state.active.as_mut() {
            Some(active) => {
                active.registry = AdapterRegistry::build(active.session.as_mut());
                Ok(active.registry.len())
            }
            None => Err(SettingError::ServiceNotInitialized),
        };
        self.report(Operation::RefreshAdapters, result)
    }

    /// Capability flags of one adapter, freshly queried.
    ///
    /// Advisory: any failure is published and an all-false set is returned.
    pub fn get_capabilities(&self, adapter_id: &AdapterId) -> CapabilitySet {
        let mut state = self.lock();
        let result = state
            .active
            .as_mut()
            .ok_or(SettingError::ServiceNotInitialized)
            .and_then(|active| {
                let index = resolve(&active.registry, adapter_id)?.index;
                Ok(active.session.capabilities(index))
            });
        self.report(Operation::GetCapabilities, result)
            .unwrap_or_else(|_| CapabilitySet::none())
    }

    /// Reads one setting from the active backend.
    pub fn get_setting(
        &self,
        adapter_id: &AdapterId,
        key: SettingKey,
    ) -> Result<SettingValue, SettingError> {
        let mut state = self.lock();
        let result = state
            .active
            .as_mut()
            .ok_or(SettingError::ServiceNotInitialized)
            .and_then(|active| {
                let index = resolve(&active.registry, adapter_id)?.index;
                ensure_permitted(active.session.as_mut(), index, adapter_id, key)?;
                match active.session.get_property(index, key) {
                    Ok(Some(value)) => Ok(value),
                    Ok(None) => Err(SettingError::ValueNotSet {
                        adapter: adapter_id.clone(),
                        key,
                    }),
                    Err(err) => Err(SettingError::from_backend(err, adapter_id)),
                }
            });
        self.report(Operation::GetSetting, result)
    }

    /// Writes one setting in a single driver call.
    ///
    /// The value is checked against the key's domain before the driver is
    /// involved.
    pub fn apply_setting(
        &self,
        adapter_id: &AdapterId,
        key: SettingKey,
        value: SettingValue,
    ) -> Result<(), SettingError> {
        let mut state = self.lock();
        let result = state
            .active
            .as_mut()
            .ok_or(SettingError::ServiceNotInitialized)
            .and_then(|active| {
                let expected = key.domain();
                if !expected.accepts(&value) {
                    return Err(SettingError::ValueDomainMismatch {
                        key,
                        expected,
                        found: value.clone(),
                    });
                }
                let index = resolve(&active.registry, adapter_id)?.index;
                ensure_permitted(active.session.as_mut(), index, adapter_id, key)?;
                active
                    .session
                    .set_property(index, key, &value)
                    .map_err(|err| SettingError::from_backend(err, adapter_id))?;
                log::info!("Applied {key} = {value} on adapter {adapter_id}.");
                Ok(())
            });
        self.report(Operation::ApplySetting, result)
    }

    /// Releases the active session and clears the registry.
    ///
    /// Later calls fail with `ServiceNotInitialized` until `initialize` runs again.
    pub fn shutdown(&self) {
        let mut state = self.lock();
        if let Some(active) = state.active.take() {
            let kind = active.session.kind();
            active.session.close();
            log::info!("Settings service shut down ({kind} session released).");
        }
        state.selector.reset();
    }

    fn lock(&self) -> MutexGuard<'_, ServiceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, operation: Operation, error: SettingError) {
        log::warn!("{operation}: {error}");
        self.notifications.publish(ErrorNotification { operation, error });
    }

    /// Mirrors a failed result to the notification stream.
    fn report<T>(
        &self,
        operation: Operation,
        result: Result<T, SettingError>,
    ) -> Result<T, SettingError> {
        if let Err(err) = &result {
            if !matches!(err, SettingError::ValueNotSet { .. }) {
                self.publish(operation, err.clone());
            }
        }
        result
    }
}

impl Drop for SettingsService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn resolve<'a>(
    registry: &'a AdapterRegistry,
    adapter_id: &AdapterId,
) -> Result<&'a RegistryEntry, SettingError> {
    registry
        .resolve(adapter_id)
        .ok_or_else(|| SettingError::AdapterNotFound(adapter_id.clone()))
}

/// Rejects keys whose capability flag is cleared before calling the driver.
///
/// Keys no flag covers are left to the backend to accept or refuse.
fn ensure_permitted(
    session: &mut dyn BackendSession,
    index: i32,
    adapter_id: &AdapterId,
    key: SettingKey,
) -> Result<(), SettingError> {
    let gated = CapabilitySet::all().gate(key).is_some();
    if gated && !session.supports(index, key) {
        return Err(SettingError::CapabilityUnsupported {
            adapter: adapter_id.clone(),
            key,
        });
    }
    Ok(())
}
