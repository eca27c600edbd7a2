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

//! Raw foreign surface: record layout, status codes and entry point types.
//!
//! Nothing in here may change shape. [`AdapterInfo`] mirrors the driver's
//! documented memory layout field for field.

use bytemuck::{Pod, Zeroable};
use std::os::raw::{c_char, c_int, c_void};

/// Capacity of every fixed-length string field.
pub const ADL_MAX_PATH: usize = 256;

/// Call succeeded.
pub const ADL_OK: c_int = 0;
/// Generic failure.
pub const ADL_ERR: c_int = -1;
/// An argument was invalid.
pub const ADL_ERR_INVALID_PARAM: c_int = -3;
/// The adapter index is not valid.
pub const ADL_ERR_INVALID_ADL_IDX: c_int = -5;
/// The call is not supported by the driver or the adapter.
pub const ADL_ERR_NOT_SUPPORTED: c_int = -8;

/// ASIC family bit: integrated GPU.
pub const ADL_ASIC_INTEGRATED: c_int = 1 << 1;

/// One adapter record, as filled by `*_Adapter_AdapterInfo_Get`.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct AdapterInfo {
    /// Size of the structure.
    pub size: c_int,
    /// Driver-assigned adapter index.
    pub adapter_index: c_int,
    /// Unique device id.
    pub udid: [c_char; ADL_MAX_PATH],
    /// PCI bus number.
    pub bus_number: c_int,
    /// PCI device number.
    pub device_number: c_int,
    /// PCI function number.
    pub function_number: c_int,
    /// PCI vendor id.
    pub vendor_id: c_int,
    /// Adapter name.
    pub adapter_name: [c_char; ADL_MAX_PATH],
    /// OS display name.
    pub display_name: [c_char; ADL_MAX_PATH],
    /// Present flag.
    pub present: c_int,
    /// Exist flag.
    pub exist: c_int,
    /// Driver registry path.
    pub driver_path: [c_char; ADL_MAX_PATH],
    /// Driver registry path extension.
    pub driver_path_ext: [c_char; ADL_MAX_PATH],
    /// Plug-and-play string.
    pub pnp_string: [c_char; ADL_MAX_PATH],
    /// OS display index.
    pub os_display_index: c_int,
}

/// Opaque context returned by the context-based handshake.
pub type AdlContext = *mut c_void;

/// Allocation callback handed to the driver at startup.
pub type MallocCallback = extern "C" fn(c_int) -> *mut c_void;

/// `ADL_Main_Control_Create`.
pub type MainControlCreate = unsafe extern "C" fn(MallocCallback, c_int) -> c_int;
/// `ADL_Main_Control_Destroy`.
pub type MainControlDestroy = unsafe extern "C" fn() -> c_int;
/// `ADL_Adapter_NumberOfAdapters_Get`.
pub type NumberOfAdaptersGet = unsafe extern "C" fn(*mut c_int) -> c_int;
/// `ADL_Adapter_AdapterInfo_Get`.
pub type AdapterInfoGet = unsafe extern "C" fn(*mut AdapterInfo, c_int) -> c_int;

/// `ADL2_Main_Control_Create`.
pub type Main2ControlCreate =
    unsafe extern "C" fn(MallocCallback, c_int, *mut AdlContext) -> c_int;
/// `ADL2_Main_Control_Destroy`.
pub type Main2ControlDestroy = unsafe extern "C" fn(AdlContext) -> c_int;
/// `ADL2_Adapter_NumberOfAdapters_Get`.
pub type NumberOfAdapters2Get = unsafe extern "C" fn(AdlContext, *mut c_int) -> c_int;
/// `ADL2_Adapter_AdapterInfo_Get`.
pub type AdapterInfo2Get = unsafe extern "C" fn(AdlContext, *mut AdapterInfo, c_int) -> c_int;
/// `ADL2_Adapter_ASICFamilyType_Get`.
pub type AsicFamilyType2Get =
    unsafe extern "C" fn(AdlContext, c_int, *mut c_int, *mut c_int) -> c_int;
/// `ADL2_Adapter_3DSetting_Get`: reads one per-adapter 3D property.
pub type Setting3D2Get = unsafe extern "C" fn(AdlContext, c_int, c_int, *mut c_int) -> c_int;
/// `ADL2_Adapter_3DSetting_Set`: writes one per-adapter 3D property.
pub type Setting3D2Set = unsafe extern "C" fn(AdlContext, c_int, c_int, c_int) -> c_int;

/// Allocator the driver uses for buffers it hands back to us.
/// Such buffers are released with [`adl_free`].
pub extern "C" fn adl_malloc(size: c_int) -> *mut c_void {
    let size = usize::try_from(size).unwrap_or(0);
    // SAFETY: malloc accepts any size; a null return is passed through to the driver.
    unsafe { libc::malloc(size) }
}

/// Releases a buffer obtained through [`adl_malloc`].
///
/// # Safety
///
/// `ptr` must be null or come from [`adl_malloc`], and must not be used afterwards.
pub unsafe fn adl_free(ptr: *mut c_void) {
    libc::free(ptr);
}

/// Positive statuses are "OK with a warning" and count as success.
pub fn succeeded(status: c_int) -> bool {
    status >= ADL_OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    #[test]
    fn adapter_info_layout_is_bit_exact() {
        let int = mem::size_of::<c_int>();
        assert_eq!(
            mem::size_of::<AdapterInfo>(),
            int * 9 + ADL_MAX_PATH * 6,
            "AdapterInfo must match the driver's layout with no padding"
        );
        assert_eq!(mem::align_of::<AdapterInfo>(), mem::align_of::<c_int>());
    }

    #[test]
    fn allocator_round_trip() {
        let ptr = adl_malloc(64);
        assert!(!ptr.is_null());
        unsafe { adl_free(ptr) };
    }

    #[test]
    fn warning_statuses_count_as_success() {
        assert!(succeeded(ADL_OK));
        assert!(succeeded(1));
        assert!(!succeeded(ADL_ERR_NOT_SUPPORTED));
    }
}
