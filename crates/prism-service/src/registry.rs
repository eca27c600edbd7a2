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

//! Maps stable adapter ids to backend adapter indices.

use prism_core::{
    vendor_name, AdapterId, AdapterIdentity, BackendKind, BackendSession, RawAdapterRecord,
};

/// One registered adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// What callers see.
    pub identity: AdapterIdentity,
    /// The backend index used for property calls.
    pub index: i32,
}

/// The adapters enumerated by one backend session.
///
/// Ids encode the backend and the driver-assigned index, so enumerating the
/// same driver twice yields the same ids.
#[derive(Debug, Clone, Default)]
pub struct AdapterRegistry {
    backend: Option<BackendKind>,
    entries: Vec<RegistryEntry>,
}

impl AdapterRegistry {
    /// Enumerates `session` and registers what it reports.
    pub fn build(session: &mut dyn BackendSession) -> Self {
        let kind = session.kind();
        Self::from_records(kind, session.list_adapters())
    }

    /// Registers already enumerated records.
    ///
    /// Records sharing a UDID with an earlier record are collapsed into it.
    pub fn from_records(kind: BackendKind, records: Vec<RawAdapterRecord>) -> Self {
        let mut entries: Vec<RegistryEntry> = Vec::with_capacity(records.len());
        let mut seen_udids: Vec<String> = Vec::new();

        for record in records {
            if !record.udid.is_empty() {
                if seen_udids.contains(&record.udid) {
                    log::trace!(
                        "Collapsing adapter record {} into an earlier one.",
                        record.index
                    );
                    continue;
                }
                seen_udids.push(record.udid.clone());
            }
            if entries.iter().any(|e| e.index == record.index) {
                log::warn!("Driver reported adapter index {} twice.", record.index);
                continue;
            }
            entries.push(RegistryEntry {
                identity: identity_for(kind, &record),
                index: record.index,
            });
        }

        log::info!(
            "Adapter registry built with {} adapter(s) from the {kind} backend.",
            entries.len()
        );
        Self {
            backend: Some(kind),
            entries,
        }
    }

    /// Looks an id up. Never falls back to another adapter.
    pub fn resolve(&self, id: &AdapterId) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| &e.identity.id == id)
    }

    /// Snapshot of every registered identity.
    pub fn identities(&self) -> Vec<AdapterIdentity> {
        self.entries.iter().map(|e| e.identity.clone()).collect()
    }

    /// The backend whose session produced this registry.
    pub fn backend(&self) -> Option<BackendKind> {
        self.backend
    }

    /// Number of registered adapters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no adapters are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Stable id for an adapter index on a backend.
pub fn adapter_id(kind: BackendKind, index: i32) -> AdapterId {
    AdapterId::new(format!("{}:{index}", kind.tag()))
}

fn identity_for(kind: BackendKind, record: &RawAdapterRecord) -> AdapterIdentity {
    let name = if !record.adapter_name.is_empty() {
        record.adapter_name.clone()
    } else if !record.display_name.is_empty() {
        record.display_name.clone()
    } else {
        format!("Adapter {}", record.index)
    };
    AdapterIdentity {
        id: adapter_id(kind, record.index),
        vendor: vendor_name(record.vendor_id),
        name,
        is_integrated: record.integrated.unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: i32, udid: &str, name: &str) -> RawAdapterRecord {
        RawAdapterRecord {
            index,
            udid: udid.to_string(),
            vendor_id: 0x1002,
            adapter_name: name.to_string(),
            exists: true,
            present: true,
            ..RawAdapterRecord::default()
        }
    }

    #[test]
    fn ids_derive_from_backend_and_index() {
        let registry = AdapterRegistry::from_records(
            BackendKind::Context,
            vec![record(0, "A", "First"), record(3, "B", "Second")],
        );
        let ids: Vec<_> = registry
            .identities()
            .into_iter()
            .map(|i| i.id.to_string())
            .collect();
        assert_eq!(ids, vec!["ctx:0", "ctx:3"]);
        assert_eq!(registry.resolve(&AdapterId::from("ctx:3")).unwrap().index, 3);
    }

    #[test]
    fn outputs_of_one_adapter_are_collapsed() {
        let registry = AdapterRegistry::from_records(
            BackendKind::Legacy,
            vec![
                record(0, "PCI-1", "Radeon"),
                record(1, "PCI-1", "Radeon"),
                record(2, "PCI-2", "Radeon Pro"),
            ],
        );
        assert_eq!(registry.len(), 2);
        assert!(registry.resolve(&AdapterId::from("legacy:1")).is_none());
    }

    #[test]
    fn unknown_id_is_not_found() {
        let registry =
            AdapterRegistry::from_records(BackendKind::Simulation, vec![record(0, "", "Only")]);
        assert!(registry.resolve(&AdapterId::from("no-such-id")).is_none());
        assert!(registry.resolve(&AdapterId::from("ctx:0")).is_none());
    }

    #[test]
    fn identity_fills_vendor_and_fallback_name() {
        let mut unnamed = record(4, "", "");
        unnamed.vendor_id = 0x8086;
        unnamed.integrated = Some(true);
        let registry = AdapterRegistry::from_records(BackendKind::Context, vec![unnamed]);
        let identity = &registry.identities()[0];
        assert_eq!(identity.vendor, "Intel");
        assert_eq!(identity.name, "Adapter 4");
        assert!(identity.is_integrated);
    }

    #[test]
    fn empty_enumeration_is_a_valid_registry() {
        let registry = AdapterRegistry::from_records(BackendKind::Legacy, Vec::new());
        assert!(registry.is_empty());
        assert_eq!(registry.backend(), Some(BackendKind::Legacy));
    }
}
