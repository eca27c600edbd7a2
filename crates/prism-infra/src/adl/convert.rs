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

//! Conversions between driver records/integers and the core types.

use super::ffi::{self, AdapterInfo};
use bytemuck::Zeroable;
use prism_core::{BackendError, RawAdapterRecord, SettingKey, SettingValue, ValueDomain};
use std::mem;
use std::os::raw::{c_char, c_int};

/// Upper bound on the adapter count a driver may announce.
pub(crate) const MAX_ADAPTER_RECORDS: usize = 1024;

/// Reads a NUL-terminated fixed-capacity ASCII field.
pub(crate) fn fixed_str(field: &[c_char]) -> String {
    let bytes: Vec<u8> = field
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).trim_end().to_string()
}

/// Copies one driver record into the backend-neutral form.
pub(crate) fn record_from_info(info: &AdapterInfo) -> RawAdapterRecord {
    RawAdapterRecord {
        index: info.adapter_index,
        udid: fixed_str(&info.udid),
        bus_number: info.bus_number,
        device_number: info.device_number,
        function_number: info.function_number,
        vendor_id: info.vendor_id,
        adapter_name: fixed_str(&info.adapter_name),
        display_name: fixed_str(&info.display_name),
        present: info.present != 0,
        exists: info.exist != 0,
        integrated: None,
    }
}

/// Count-then-fetch enumeration shared by both driver generations.
///
/// Any failing status yields an empty list. Records the OS reports as
/// nonexistent are skipped.
pub(crate) fn read_adapter_records(
    mut count_adapters: impl FnMut(&mut c_int) -> c_int,
    mut fetch: impl FnMut(*mut AdapterInfo, c_int) -> c_int,
) -> Vec<RawAdapterRecord> {
    let mut count: c_int = 0;
    let status = count_adapters(&mut count);
    if !ffi::succeeded(status) {
        log::warn!("Adapter count query failed with status {status}.");
        return Vec::new();
    }
    let Ok(count) = usize::try_from(count) else {
        log::warn!("Driver announced a negative adapter count ({count}).");
        return Vec::new();
    };
    if count == 0 {
        return Vec::new();
    }
    if count > MAX_ADAPTER_RECORDS {
        log::warn!("Driver announced {count} adapters; refusing to fetch that many.");
        return Vec::new();
    }

    let record_size = mem::size_of::<AdapterInfo>();
    let Some(input_size) = record_size
        .checked_mul(count)
        .and_then(|bytes| c_int::try_from(bytes).ok())
    else {
        log::warn!("Adapter count {count} is too large to fetch.");
        return Vec::new();
    };

    let mut buffer = vec![AdapterInfo::zeroed(); count];
    for info in &mut buffer {
        info.size = record_size as c_int;
    }

    let status = fetch(buffer.as_mut_ptr(), input_size);
    if !ffi::succeeded(status) {
        log::warn!("Adapter info query failed with status {status}.");
        return Vec::new();
    }

    buffer
        .iter()
        .map(record_from_info)
        .filter(|record| record.exists)
        .collect()
}

/// Maps a property call status onto the backend error taxonomy.
///
/// Positive statuses are warnings and count as success.
pub(crate) fn check_status(
    call: &'static str,
    key: SettingKey,
    status: c_int,
) -> Result<(), BackendError> {
    match status {
        ffi::ADL_ERR_NOT_SUPPORTED => Err(BackendError::CapabilityUnsupported(key)),
        s if ffi::succeeded(s) => Ok(()),
        s => Err(BackendError::CallFailed { call, status: s }),
    }
}

/// Whether a probe read leaves the capability granted.
///
/// Only "not supported" clears a flag. Any other failure is left for the
/// real call to report with its status.
pub(crate) fn probe_grants<T>(result: &Result<T, BackendError>) -> bool {
    !matches!(result, Err(BackendError::CapabilityUnsupported(_)))
}

/// Driver property id for each key.
pub(crate) fn setting_id(key: SettingKey) -> c_int {
    match key {
        SettingKey::AnisotropicFiltering => 1,
        SettingKey::AnisotropicLevel => 2,
        SettingKey::TextureQuality => 3,
        SettingKey::TessellationLevel => 4,
        SettingKey::ShaderCache => 5,
        SettingKey::VSync => 6,
        SettingKey::PowerProfile => 7,
    }
}

/// Marshals a value into the driver's integer form.
pub(crate) fn encode(key: SettingKey, value: &SettingValue) -> Option<c_int> {
    let domain = key.domain();
    if !domain.accepts(value) {
        return None;
    }
    match value {
        SettingValue::Bool(v) => Some(c_int::from(*v)),
        SettingValue::Int(v) => Some(*v),
        SettingValue::Choice(choice) => domain
            .choice_index(choice)
            .and_then(|i| c_int::try_from(i).ok()),
    }
}

/// Unmarshals the driver's integer form. `None` if it falls outside the domain.
pub(crate) fn decode(key: SettingKey, raw: c_int) -> Option<SettingValue> {
    let domain = key.domain();
    let value = match domain {
        ValueDomain::Boolean => match raw {
            0 => SettingValue::Bool(false),
            1 => SettingValue::Bool(true),
            _ => return None,
        },
        ValueDomain::Integer { .. } => SettingValue::Int(raw),
        ValueDomain::Choice(_) => {
            let index = usize::try_from(raw).ok()?;
            SettingValue::Choice(domain.choice_at(index)?.to_string())
        }
    };
    domain.accepts(&value).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_str(field: &mut [c_char], s: &str) {
        for (dst, src) in field.iter_mut().zip(s.bytes()) {
            *dst = src as c_char;
        }
    }

    fn sample_info(index: c_int, name: &str) -> AdapterInfo {
        let mut info = AdapterInfo::zeroed();
        info.adapter_index = index;
        info.vendor_id = 0x1002;
        info.exist = 1;
        info.present = 1;
        write_str(&mut info.udid, "PCI_VEN_1002&DEV_15D8");
        write_str(&mut info.adapter_name, name);
        info
    }

    #[test]
    fn fixed_str_stops_at_nul() {
        let mut field = [0 as c_char; ffi::ADL_MAX_PATH];
        write_str(&mut field, "Radeon Vega 3");
        assert_eq!(fixed_str(&field), "Radeon Vega 3");
    }

    #[test]
    fn full_field_without_nul_is_read_whole() {
        let field = [b'A' as c_char; ffi::ADL_MAX_PATH];
        assert_eq!(fixed_str(&field).len(), ffi::ADL_MAX_PATH);
    }

    #[test]
    fn record_copies_identity_fields() {
        let record = record_from_info(&sample_info(3, "Radeon Vega 3"));
        assert_eq!(record.index, 3);
        assert_eq!(record.vendor_id, 0x1002);
        assert_eq!(record.adapter_name, "Radeon Vega 3");
        assert_eq!(record.udid, "PCI_VEN_1002&DEV_15D8");
        assert!(record.exists);
        assert_eq!(record.integrated, None);
    }

    #[test]
    fn enumeration_fetches_count_records() {
        let records = read_adapter_records(
            |count| {
                *count = 2;
                ffi::ADL_OK
            },
            |buffer, size| {
                assert_eq!(size as usize, 2 * mem::size_of::<AdapterInfo>());
                // SAFETY: the buffer holds the two records announced above.
                let slice = unsafe { std::slice::from_raw_parts_mut(buffer, 2) };
                slice[0] = sample_info(0, "First");
                slice[1] = sample_info(1, "Second");
                slice[1].exist = 0;
                ffi::ADL_OK
            },
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].adapter_name, "First");
    }

    #[test]
    fn failed_count_yields_no_adapters() {
        let records = read_adapter_records(
            |_| ffi::ADL_ERR,
            |_, _| panic!("must not fetch after a failed count"),
        );
        assert!(records.is_empty());
    }

    #[test]
    fn zero_adapters_skips_the_fetch() {
        let records = read_adapter_records(
            |count| {
                *count = 0;
                ffi::ADL_OK
            },
            |_, _| panic!("must not fetch zero records"),
        );
        assert!(records.is_empty());
    }

    #[test]
    fn absurd_adapter_count_yields_no_adapters() {
        let records = read_adapter_records(
            |count| {
                *count = c_int::MAX;
                ffi::ADL_OK
            },
            |_, _| panic!("must not fetch an absurd record count"),
        );
        assert!(records.is_empty());
    }

    #[test]
    fn negative_adapter_count_yields_no_adapters() {
        let records = read_adapter_records(
            |count| {
                *count = -3;
                ffi::ADL_OK
            },
            |_, _| panic!("must not fetch a negative record count"),
        );
        assert!(records.is_empty());
    }

    #[test]
    fn property_statuses_map_to_backend_errors() {
        let call = "ADL2_Adapter_3DSetting_Get";
        assert_eq!(check_status(call, SettingKey::VSync, ffi::ADL_OK), Ok(()));
        // Warnings are successes.
        assert_eq!(check_status(call, SettingKey::VSync, 1), Ok(()));
        assert_eq!(
            check_status(call, SettingKey::ShaderCache, ffi::ADL_ERR_NOT_SUPPORTED),
            Err(BackendError::CapabilityUnsupported(SettingKey::ShaderCache))
        );
        assert_eq!(
            check_status(call, SettingKey::VSync, ffi::ADL_ERR),
            Err(BackendError::CallFailed {
                call,
                status: ffi::ADL_ERR
            })
        );
    }

    #[test]
    fn only_unsupported_probes_clear_a_capability() {
        let unsupported: Result<c_int, _> =
            Err(BackendError::CapabilityUnsupported(SettingKey::PowerProfile));
        let failed: Result<c_int, _> = Err(BackendError::CallFailed {
            call: "ADL2_Adapter_3DSetting_Get",
            status: ffi::ADL_ERR,
        });
        assert!(!probe_grants(&unsupported));
        assert!(probe_grants(&failed));
        assert!(probe_grants(&Ok(0)));
    }

    #[test]
    fn values_marshal_to_driver_integers() {
        assert_eq!(encode(SettingKey::VSync, &SettingValue::Bool(true)), Some(1));
        assert_eq!(encode(SettingKey::AnisotropicLevel, &SettingValue::Int(8)), Some(8));
        assert_eq!(
            encode(SettingKey::TextureQuality, &SettingValue::from("Quality")),
            Some(2)
        );
        assert_eq!(encode(SettingKey::VSync, &SettingValue::Int(1)), None);
    }

    #[test]
    fn driver_integers_outside_the_domain_are_rejected() {
        assert_eq!(decode(SettingKey::ShaderCache, 1), Some(SettingValue::Bool(true)));
        assert_eq!(decode(SettingKey::ShaderCache, 7), None);
        assert_eq!(decode(SettingKey::AnisotropicLevel, 99), None);
        assert_eq!(
            decode(SettingKey::PowerProfile, 0),
            Some(SettingValue::from("PowerSaving"))
        );
        assert_eq!(decode(SettingKey::PowerProfile, -1), None);
    }

    #[test]
    fn setting_ids_are_unique() {
        let mut ids: Vec<_> = SettingKey::ALL.iter().map(|k| setting_id(*k)).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), SettingKey::ALL.len());
    }
}
